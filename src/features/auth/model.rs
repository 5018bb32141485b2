use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::models::UserType;

/// Identity decoded from a validated access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    #[serde(rename = "role")]
    pub user_type: UserType,
}

impl AuthenticatedUser {
    pub fn new(user_id: i64, user_type: UserType) -> Self {
        Self { user_id, user_type }
    }

    /// Encode the identity as a token subject, `"<id>-<role>"`
    pub fn to_subject(&self) -> String {
        format!("{}-{}", self.user_id, self.user_type)
    }

    /// Decode a token subject produced by [`AuthenticatedUser::to_subject`]
    pub fn from_subject(subject: &str) -> Option<Self> {
        let (id, role) = subject.split_once('-')?;
        let user_id = id.parse::<i64>().ok()?;
        let user_type = role.parse::<UserType>().ok()?;
        Some(Self { user_id, user_type })
    }

    pub fn is_general(&self) -> bool {
        self.user_type == UserType::General
    }

    /// NGO or Government
    pub fn is_organization(&self) -> bool {
        self.user_type.is_organization()
    }

    pub fn is_government(&self) -> bool {
        self.user_type == UserType::Government
    }
}

/// Registered claims carried in the access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub iat: u64,
    pub exp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_round_trip() {
        for user_type in [UserType::General, UserType::Ngo, UserType::Government] {
            let user = AuthenticatedUser::new(17, user_type);
            assert_eq!(
                AuthenticatedUser::from_subject(&user.to_subject()),
                Some(user)
            );
        }
    }

    #[test]
    fn test_subject_format() {
        assert_eq!(
            AuthenticatedUser::new(5, UserType::Ngo).to_subject(),
            "5-NGO"
        );
    }

    #[test]
    fn test_malformed_subjects_are_rejected() {
        assert_eq!(AuthenticatedUser::from_subject("5"), None);
        assert_eq!(AuthenticatedUser::from_subject("abc-general"), None);
        assert_eq!(AuthenticatedUser::from_subject("5-admin"), None);
        assert_eq!(AuthenticatedUser::from_subject("5-general-extra"), None);
        assert_eq!(AuthenticatedUser::from_subject("-general"), None);
    }

    #[test]
    fn test_role_helpers() {
        let general = AuthenticatedUser::new(1, UserType::General);
        let ngo = AuthenticatedUser::new(2, UserType::Ngo);
        let gov = AuthenticatedUser::new(3, UserType::Government);

        assert!(general.is_general() && !general.is_organization());
        assert!(ngo.is_organization() && !ngo.is_government());
        assert!(gov.is_organization() && gov.is_government());
    }
}
