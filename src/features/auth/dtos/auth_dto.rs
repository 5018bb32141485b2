use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::users::models::UserType;

/// Request DTO for registration.
///
/// `password` is required for general accounts and ignored for organization
/// accounts, which receive a role code by email instead.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignupRequestDto {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: Option<String>,

    #[validate(length(max = 100, message = "Nickname must be at most 100 characters"))]
    pub nickname: Option<String>,
}

impl SignupRequestDto {
    /// Trim names, lower-case the email and drop an empty nickname
    pub fn normalized(self) -> Self {
        Self {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password: self.password,
            nickname: self
                .nickname
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
        }
    }

    pub fn is_missing_required(&self) -> bool {
        self.full_name.is_empty() || self.email.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupResponseDto {
    pub user_id: i64,
    pub email: String,
    pub user_type: UserType,
}

/// Request DTO for login. General accounts send `password`, organization
/// accounts send `role_code`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequestDto {
    #[serde(default)]
    pub email: String,
    pub password: Option<String>,
    pub role_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    /// Signed HS256 access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    pub role: UserType,
    pub user_id: i64,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct VerifyEmailQuery {
    /// Token from the verification email
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyEmailResponseDto {
    pub user_id: i64,
    pub email: String,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResendVerificationRequestDto {
    #[serde(default)]
    pub email: String,
}
