use chrono::Utc;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use crate::core::error::{conflict_on_unique, AppError, Result};
use crate::features::users::dtos::UpdateProfileDto;
use crate::features::users::models::{CreateUser, EmailVerificationToken, User};

const USER_COLUMNS: &str = "id, full_name, nickname, email, password_hash, profile_picture, \
     user_type, role_code, is_verified, created_at, updated_at";

/// Persistence for accounts and their email verification tokens
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by (already normalized) email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Insert the user and its first verification token in one transaction.
    ///
    /// A duplicate email surfaces as 409 whether it is caught by the UNIQUE
    /// constraint or by a concurrent registration.
    pub async fn create_with_verification(
        &self,
        data: CreateUser,
        token_ttl: Duration,
    ) -> Result<(User, Uuid)> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO users (full_name, nickname, email, password_hash, user_type, role_code)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&data.full_name)
            .bind(&data.nickname)
            .bind(&data.email)
            .bind(&data.password_hash)
            .bind(data.user_type)
            .bind(&data.role_code)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, "Email already registered"))?;

        let token = Self::insert_token(&mut tx, user.id, token_ttl).await?;

        tx.commit().await?;

        tracing::info!(
            "User registered: id={}, user_type={}",
            user.id,
            user.user_type
        );

        Ok((user, token))
    }

    /// Issue a fresh verification token for an existing user
    pub async fn issue_verification_token(&self, user_id: i64, ttl: Duration) -> Result<Uuid> {
        let mut tx = self.pool.begin().await?;
        let token = Self::insert_token(&mut tx, user_id, ttl).await?;
        tx.commit().await?;
        Ok(token)
    }

    /// Redeem a verification token: the token is consumed and the user marked
    /// verified atomically. The row lock serializes concurrent redemptions.
    pub async fn verify_email(&self, token: Uuid) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, EmailVerificationToken>(
            r#"
            SELECT token, user_id, expires_at, consumed_at
            FROM email_verification_tokens
            WHERE token = $1
            FOR UPDATE
            "#,
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Verification token not found".to_string()))?;

        record.ensure_redeemable(Utc::now())?;

        sqlx::query("UPDATE email_verification_tokens SET consumed_at = NOW() WHERE token = $1")
            .bind(record.token)
            .execute(&mut *tx)
            .await?;

        let sql = format!(
            "UPDATE users SET is_verified = TRUE, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(record.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tx.commit().await?;

        tracing::info!("Email verified for user id={}", user.id);

        Ok(user)
    }

    /// Apply a partial profile update; absent fields keep their value
    pub async fn update_profile(&self, id: i64, dto: UpdateProfileDto) -> Result<User> {
        let sql = format!(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                nickname = COALESCE($3, nickname),
                profile_picture = COALESCE($4, profile_picture),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(dto.full_name)
            .bind(dto.nickname)
            .bind(dto.profile_picture)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn insert_token(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: i64,
        ttl: Duration,
    ) -> Result<Uuid> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::Internal(format!("Invalid verification TTL: {}", e)))?;
        let token = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO email_verification_tokens (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(Utc::now() + ttl)
        .execute(&mut **tx)
        .await?;

        Ok(token)
    }
}
