use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::users::models::{User, UserType};

/// Profile of the authenticated account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponseDto {
    pub id: i64,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub user_type: UserType,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfileResponseDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            nickname: user.nickname,
            email: user.email,
            profile_picture: user.profile_picture,
            user_type: user.user_type,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

/// Partial update of the editable profile fields
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 255, message = "Full name must be 1-255 characters"))]
    pub full_name: Option<String>,

    #[validate(length(max = 100, message = "Nickname must be at most 100 characters"))]
    pub nickname: Option<String>,

    #[validate(url(message = "Profile picture must be a valid URL"))]
    pub profile_picture: Option<String>,
}

impl UpdateProfileDto {
    /// Trim the free-text fields so validation sees what would be stored.
    /// A blank nickname means "leave unchanged".
    pub fn normalized(self) -> Self {
        Self {
            full_name: self.full_name.map(|n| n.trim().to_string()),
            nickname: self
                .nickname
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            profile_picture: self.profile_picture.map(|p| p.trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_validation() {
        let ok = UpdateProfileDto {
            full_name: Some("River Keeper".to_string()),
            nickname: None,
            profile_picture: Some("https://cdn.example.com/me.png".to_string()),
        };
        assert!(ok.validate().is_ok());

        let bad = UpdateProfileDto {
            full_name: Some(String::new()),
            nickname: None,
            profile_picture: Some("not a url".to_string()),
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("full_name"));
        assert!(errors.field_errors().contains_key("profile_picture"));
    }

    #[test]
    fn test_blank_full_name_fails_after_normalizing() {
        let dto = UpdateProfileDto {
            full_name: Some("   ".to_string()),
            nickname: Some("  ".to_string()),
            profile_picture: None,
        }
        .normalized();

        assert_eq!(dto.full_name.as_deref(), Some(""));
        assert_eq!(dto.nickname, None);
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("full_name"));
    }
}
