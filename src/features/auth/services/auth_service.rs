use crate::core::config::RegistrationConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    LoginRequestDto, LoginResponseDto, SignupRequestDto, SignupResponseDto,
    VerifyEmailResponseDto,
};
use crate::features::auth::services::password::{
    generate_role_code, hash_password, verify_password,
};
use crate::features::auth::services::token_service::TokenService;
use crate::features::users::models::{CreateUser, User, UserType};
use crate::features::users::UserService;
use crate::modules::mail::{templates, EmailMessage, Mailer};
use crate::shared::constants::MIN_PASSWORD_LENGTH;
use crate::shared::validation::ROLE_CODE_REGEX;
use std::sync::Arc;
use uuid::Uuid;

/// Registration, verification and login against local accounts
pub struct AuthService {
    users: Arc<UserService>,
    tokens: Arc<TokenService>,
    mailer: Arc<dyn Mailer>,
    registration: RegistrationConfig,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        users: Arc<UserService>,
        tokens: Arc<TokenService>,
        mailer: Arc<dyn Mailer>,
        registration: RegistrationConfig,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            tokens,
            mailer,
            registration,
            bcrypt_cost,
        }
    }

    /// Register a new account.
    ///
    /// The account type follows the email domain. General accounts must supply
    /// a password; organization accounts get a generated role code mailed to
    /// them. Mail goes out only after the user row is committed.
    pub async fn signup(&self, dto: SignupRequestDto) -> Result<SignupResponseDto> {
        let user_type = UserType::from_email(
            &dto.email,
            &self.registration.ngo_domains,
            &self.registration.government_domains,
        );

        let (password_hash, role_code) = match user_type {
            UserType::General => {
                let password = dto
                    .password
                    .filter(|p| p.chars().count() as u64 >= MIN_PASSWORD_LENGTH)
                    .ok_or_else(|| {
                        AppError::BadRequest(format!(
                            "Password must be at least {} characters",
                            MIN_PASSWORD_LENGTH
                        ))
                    })?;
                (hash_password(password, self.bcrypt_cost).await?, None)
            }
            UserType::Ngo | UserType::Government => (String::new(), Some(generate_role_code())),
        };

        if self.users.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let (user, token) = self
            .users
            .create_with_verification(
                CreateUser {
                    full_name: dto.full_name,
                    nickname: dto.nickname,
                    email: dto.email,
                    password_hash,
                    user_type,
                    role_code,
                },
                self.registration.verification_ttl,
            )
            .await?;

        self.send_verification_email(&user, token);
        if let Some(code) = &user.role_code {
            self.send_role_code_email(&user, code);
        }

        Ok(SignupResponseDto {
            user_id: user.id,
            email: user.email,
            user_type: user.user_type,
        })
    }

    /// Exchange credentials for an access token.
    ///
    /// Unknown emails and wrong secrets produce the same 401 so that account
    /// existence is not revealed.
    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginResponseDto> {
        let email = dto.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::BadRequest("Email is required".to_string()));
        }

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if user.user_type.is_organization() {
            let role_code = dto
                .role_code
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .ok_or_else(|| AppError::BadRequest("Role code is required".to_string()))?;

            if !ROLE_CODE_REGEX.is_match(&role_code)
                || user.role_code.as_deref() != Some(role_code.as_str())
            {
                tracing::info!("Rejected role code login for user id={}", user.id);
                return Err(invalid_credentials());
            }
        } else {
            let password = dto
                .password
                .filter(|p| !p.is_empty())
                .ok_or_else(|| AppError::BadRequest("Password is required".to_string()))?;

            if !verify_password(password, user.password_hash.clone()).await? {
                tracing::info!("Rejected password login for user id={}", user.id);
                return Err(invalid_credentials());
            }
        }

        let issued = self.tokens.issue_token(user.id, user.user_type)?;
        tracing::info!("User logged in: id={}, role={}", user.id, user.user_type);

        Ok(LoginResponseDto {
            access_token: issued.access_token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
            role: user.user_type,
            user_id: user.id,
            is_verified: user.is_verified,
        })
    }

    /// Redeem a verification token from the link in the email
    pub async fn verify_email(&self, raw_token: Option<&str>) -> Result<VerifyEmailResponseDto> {
        let raw_token = raw_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::BadRequest("Verification token is required".to_string()))?;
        let token = Uuid::parse_str(raw_token)
            .map_err(|_| AppError::BadRequest("Invalid verification token".to_string()))?;

        let user = self.users.verify_email(token).await?;

        Ok(VerifyEmailResponseDto {
            user_id: user.id,
            email: user.email,
            is_verified: user.is_verified,
        })
    }

    /// Issue and mail a fresh verification link when the account exists and
    /// is still unverified. Silent otherwise.
    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AppError::BadRequest("Email is required".to_string()));
        }

        match self.users.find_by_email(&email).await? {
            Some(user) if !user.is_verified => {
                let token = self
                    .users
                    .issue_verification_token(user.id, self.registration.verification_ttl)
                    .await?;
                self.send_verification_email(&user, token);
            }
            Some(_) => tracing::debug!("Resend requested for an already verified account"),
            None => tracing::debug!("Resend requested for an unknown email"),
        }

        Ok(())
    }

    fn send_verification_email(&self, user: &User, token: Uuid) {
        let link = verification_link(&self.registration.verify_email_url, token);
        let ttl_hours = self.registration.verification_ttl.as_secs() / 3600;

        match templates::render_verify_email(&user.full_name, &link, ttl_hours) {
            Ok(body) => self.dispatch(EmailMessage {
                to: user.email.clone(),
                subject: "Verify your email address".to_string(),
                body,
            }),
            Err(e) => tracing::error!("Failed to render verification email: {}", e),
        }
    }

    fn send_role_code_email(&self, user: &User, role_code: &str) {
        match templates::render_role_code(&user.full_name, user.user_type.as_str(), role_code) {
            Ok(body) => self.dispatch(EmailMessage {
                to: user.email.clone(),
                subject: "Your organization role code".to_string(),
                body,
            }),
            Err(e) => tracing::error!("Failed to render role code email: {}", e),
        }
    }

    /// Send on a detached task; delivery failures are logged only
    fn dispatch(&self, message: EmailMessage) {
        let mailer = Arc::clone(&self.mailer);
        tokio::spawn(async move {
            let to = message.to.clone();
            if let Err(e) = mailer.send(message).await {
                tracing::warn!("Failed to send email to {}: {}", to, e);
            }
        });
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}

/// Append the token to the configured verification URL
pub fn verification_link(base_url: &str, token: Uuid) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}token={}", base_url, separator, token)
}
