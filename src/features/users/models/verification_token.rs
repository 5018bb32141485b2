use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::{AppError, Result};

/// Single-use token mailed to a user to confirm their address
#[derive(Debug, Clone, FromRow)]
pub struct EmailVerificationToken {
    pub token: Uuid,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
}

impl EmailVerificationToken {
    /// Check that the token can still be redeemed at `now`
    pub fn ensure_redeemable(&self, now: DateTime<Utc>) -> Result<()> {
        if self.consumed_at.is_some() {
            return Err(AppError::Conflict(
                "This verification link has already been used".to_string(),
            ));
        }
        if self.expires_at <= now {
            return Err(AppError::BadRequest(
                "This verification link has expired".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(expires_in: Duration, consumed: bool) -> EmailVerificationToken {
        let now = Utc::now();
        EmailVerificationToken {
            token: Uuid::new_v4(),
            user_id: 1,
            expires_at: now + expires_in,
            consumed_at: consumed.then_some(now),
        }
    }

    #[test]
    fn test_fresh_token_is_redeemable() {
        assert!(token(Duration::hours(1), false)
            .ensure_redeemable(Utc::now())
            .is_ok());
    }

    #[test]
    fn test_consumed_token_conflicts() {
        let err = token(Duration::hours(1), true)
            .ensure_redeemable(Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let err = token(Duration::hours(-1), false)
            .ensure_redeemable(Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
