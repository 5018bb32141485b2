use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    LoginRequestDto, LoginResponseDto, ResendVerificationRequestDto, SignupRequestDto,
    SignupResponseDto, VerifyEmailQuery, VerifyEmailResponseDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<SignupResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered"),
        (status = 415, description = "Request must be JSON")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<SignupRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<SignupResponseDto>>)> {
    let dto = dto.normalized();
    if dto.is_missing_required() {
        return Err(AppError::BadRequest(
            "Missing required fields: full_name, email".to_string(),
        ));
    }
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = service.signup(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(created),
            Some("User registered successfully".to_string()),
            None,
        )),
    ))
}

/// Login with a password (general accounts) or a role code (organizations)
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Missing email, password or role code"),
        (status = 401, description = "Invalid credentials"),
        (status = 415, description = "Request must be JSON")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    let response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Confirm an email address with the token from the verification email
#[utoipa::path(
    get,
    path = "/auth/verify-email",
    params(VerifyEmailQuery),
    responses(
        (status = 200, description = "Email verified", body = ApiResponse<VerifyEmailResponseDto>),
        (status = 400, description = "Missing, malformed or expired token"),
        (status = 404, description = "Unknown token"),
        (status = 409, description = "Token already used")
    ),
    tag = "auth"
)]
pub async fn verify_email(
    State(service): State<Arc<AuthService>>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Json<ApiResponse<VerifyEmailResponseDto>>> {
    let verified = service.verify_email(query.token.as_deref()).await?;
    Ok(Json(ApiResponse::success(
        Some(verified),
        Some("Email verified successfully".to_string()),
        None,
    )))
}

/// Send a new verification link
#[utoipa::path(
    post,
    path = "/auth/resend-verification",
    request_body = ResendVerificationRequestDto,
    responses(
        (status = 200, description = "Request accepted"),
        (status = 400, description = "Email is required")
    ),
    tag = "auth"
)]
pub async fn resend_verification(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<ResendVerificationRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    service.resend_verification(&dto.email).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some(
            "If the account exists and is not yet verified, a new verification email has been sent"
                .to_string(),
        ),
        None,
    )))
}

/// Identity carried by the presented access token
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current identity", body = ApiResponse<AuthenticatedUser>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(user: AuthenticatedUser) -> Json<ApiResponse<AuthenticatedUser>> {
    Json(ApiResponse::success(Some(user), None, None))
}

#[cfg(test)]
mod tests {
    use crate::features::auth::routes;
    use crate::features::users::models::UserType;
    use crate::shared::test_helpers::{test_auth_service, test_token_service};
    use axum::http::StatusCode;
    use axum::Router;
    use axum_test::TestServer;
    use serde_json::json;

    fn public_server() -> TestServer {
        TestServer::new(routes::public_routes(test_auth_service())).unwrap()
    }

    #[tokio::test]
    async fn test_signup_requires_json() {
        let response = public_server()
            .post("/auth/signup")
            .text("full_name=Ada&email=ada@example.com")
            .await;
        response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_signup_missing_fields() {
        let response = public_server()
            .post("/auth/signup")
            .json(&json!({ "full_name": "Ada" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Missing required fields: full_name, email");
    }

    #[tokio::test]
    async fn test_signup_invalid_email() {
        let response = public_server()
            .post("/auth/signup")
            .json(&json!({ "full_name": "Ada", "email": "ada-at-example", "password": "password123" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_signup_general_password_too_short() {
        let response = public_server()
            .post("/auth/signup")
            .json(&json!({ "full_name": "Ada", "email": "ada@example.com", "password": "short" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Password must be at least 8 characters");
    }

    #[tokio::test]
    async fn test_login_requires_json_and_email() {
        let server = public_server();
        server
            .post("/auth/login")
            .text("email=ada@example.com")
            .await
            .assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let response = server
            .post("/auth/login")
            .json(&json!({ "password": "password123" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Email is required");
    }

    #[tokio::test]
    async fn test_verify_email_requires_token() {
        let server = public_server();
        server
            .get("/auth/verify-email")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .get("/auth/verify-email")
            .add_query_param("token", "garbage")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_me_returns_token_identity() {
        let tokens = test_token_service();
        let issued = tokens.issue_token(12, UserType::Ngo).unwrap();

        let app: Router = routes::protected_routes().route_layer(
            axum::middleware::from_fn_with_state(tokens, crate::core::middleware::auth_middleware),
        );
        let server = TestServer::new(app).unwrap();

        let response = server
            .get("/auth/me")
            .authorization_bearer(issued.access_token)
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["user_id"], 12);
        assert_eq!(body["data"]["role"], "NGO");

        server
            .get("/auth/me")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
