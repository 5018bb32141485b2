//! Role-based authorization guards.
//!
//! Each guard extracts the authenticated user placed in the request
//! extensions by the auth middleware and checks the account type:
//! - `RequireGeneral`: general (individual) accounts, who organize volunteer movements
//! - `RequireOrganization`: NGO or Government accounts, who claim and resolve reports
//! - `RequireGovernment`: Government accounts, who moderate volunteer movements
//!
//! A missing identity is rejected with 401, the wrong account type with 403.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn authenticated(parts: &Parts) -> Result<AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Guard for general user accounts.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireGeneral(user): RequireGeneral) { ... }
/// ```
pub struct RequireGeneral(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireGeneral
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.is_general() {
            return Err(AppError::Forbidden(
                "Only general users can perform this action".to_string(),
            ));
        }

        Ok(RequireGeneral(user))
    }
}

/// Guard for organization accounts (NGO or Government).
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireOrganization(user): RequireOrganization) { ... }
/// ```
pub struct RequireOrganization(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireOrganization
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.is_organization() {
            return Err(AppError::Forbidden(
                "Only NGO or Government users can perform this action".to_string(),
            ));
        }

        Ok(RequireOrganization(user))
    }
}

/// Guard for Government accounts.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireGovernment(user): RequireGovernment) { ... }
/// ```
pub struct RequireGovernment(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireGovernment
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.is_government() {
            return Err(AppError::Forbidden(
                "Only Government users can perform this action".to_string(),
            ));
        }

        Ok(RequireGovernment(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserType;
    use crate::shared::test_helpers::with_user;
    use axum::{http::StatusCode, routing::get, Router};
    use axum_test::TestServer;

    async fn general_only(RequireGeneral(user): RequireGeneral) -> String {
        user.user_id.to_string()
    }

    async fn organization_only(RequireOrganization(user): RequireOrganization) -> String {
        user.user_id.to_string()
    }

    async fn government_only(RequireGovernment(user): RequireGovernment) -> String {
        user.user_id.to_string()
    }

    fn router() -> Router {
        Router::new()
            .route("/general", get(general_only))
            .route("/organization", get(organization_only))
            .route("/government", get(government_only))
    }

    fn server_as(user_type: UserType) -> TestServer {
        TestServer::new(with_user(router(), 7, user_type)).unwrap()
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let server = TestServer::new(router()).unwrap();
        for path in ["/general", "/organization", "/government"] {
            server
                .get(path)
                .await
                .assert_status(StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_general_user_access() {
        let server = server_as(UserType::General);
        server.get("/general").await.assert_status_ok();
        server
            .get("/organization")
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .get("/government")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_ngo_user_access() {
        let server = server_as(UserType::Ngo);
        server
            .get("/general")
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server.get("/organization").await.assert_status_ok();
        server
            .get("/government")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_government_user_access() {
        let server = server_as(UserType::Government);
        server
            .get("/general")
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server.get("/organization").await.assert_status_ok();
        let response = server.get("/government").await;
        response.assert_status_ok();
        response.assert_text("7");
    }
}
