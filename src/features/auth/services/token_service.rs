use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Claims};
use crate::features::users::models::UserType;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::{SystemTime, UNIX_EPOCH};

/// A freshly signed access token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Issues and validates HS256 access tokens whose subject encodes the
/// user's id and role
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl_secs: u64,
    leeway_secs: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl_secs: config.token_ttl.as_secs(),
            leeway_secs: config.jwt_leeway.as_secs(),
        }
    }

    pub fn issue_token(&self, user_id: i64, user_type: UserType) -> Result<IssuedToken> {
        let now = now_secs()?;
        self.sign(user_id, user_type, now, now + self.ttl_secs)
    }

    fn sign(&self, user_id: i64, user_type: UserType, iat: u64, exp: u64) -> Result<IssuedToken> {
        let claims = Claims {
            sub: AuthenticatedUser::new(user_id, user_type).to_subject(),
            iss: self.issuer.clone(),
            iat,
            exp,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            access_token,
            expires_in: exp.saturating_sub(iat) as i64,
        })
    }

    /// Validate signature, issuer and expiry, then decode the subject
    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        AuthenticatedUser::from_subject(&token_data.claims.sub)
            .ok_or_else(|| AppError::Unauthorized("Invalid token subject".to_string()))
    }
}

fn now_secs() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| AppError::Internal(format!("System clock error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            issuer: "wastewatch-test".to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
            bcrypt_cost: 4,
        }
    }

    #[test]
    fn test_issue_then_validate() {
        let service = TokenService::new(&config("a-very-long-test-secret"));
        let issued = service.issue_token(9, UserType::Ngo).unwrap();
        assert_eq!(issued.expires_in, 3600);

        let user = service.validate_token(&issued.access_token).unwrap();
        assert_eq!(user, AuthenticatedUser::new(9, UserType::Ngo));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = TokenService::new(&config("a-very-long-test-secret"));
        let now = now_secs().unwrap();
        let issued = service
            .sign(9, UserType::General, now - 7200, now - 3600)
            .unwrap();

        let err = service.validate_token(&issued.access_token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = TokenService::new(&config("a-very-long-test-secret"));
        let other = TokenService::new(&config("another-long-test-secret"));
        let issued = issuer.issue_token(9, UserType::General).unwrap();

        assert!(matches!(
            other.validate_token(&issued.access_token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = TokenService::new(&config("a-very-long-test-secret"));
        let issued = service.issue_token(9, UserType::General).unwrap();

        let mut parts: Vec<String> = issued.access_token.split('.').map(String::from).collect();
        // Swap in a payload claiming a Government identity
        let forged = TokenService::new(&config("attacker-controlled-secret"))
            .issue_token(9, UserType::Government)
            .unwrap();
        parts[1] = forged.access_token.split('.').nth(1).unwrap().to_string();

        assert!(service.validate_token(&parts.join(".")).is_err());
    }
}
