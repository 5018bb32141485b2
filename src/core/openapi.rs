use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{self, model::AuthenticatedUser};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::users::{
    dtos as users_dtos, handlers as users_handlers, models as users_models,
};
use crate::features::volunteers::{
    dtos as volunteers_dtos, handlers as volunteers_handlers, models as volunteers_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::signup,
        auth::handlers::login,
        auth::handlers::verify_email,
        auth::handlers::resend_verification,
        auth::handlers::get_me,
        // Users
        users_handlers::get_profile,
        users_handlers::update_profile,
        // Reports
        reports_handlers::submit_report,
        reports_handlers::list_reports,
        reports_handlers::get_report,
        reports_handlers::claim_report,
        reports_handlers::update_report_status,
        // Volunteers
        volunteers_handlers::start_movement,
        volunteers_handlers::join_movement,
        volunteers_handlers::block_movement,
        volunteers_handlers::unblock_movement,
        volunteers_handlers::list_active_movements,
    ),
    components(
        schemas(
            Meta,
            AuthenticatedUser,
            users_models::UserType,
            reports_models::ReportStatus,
            volunteers_models::MovementStatus,
            // Auth
            auth::dtos::SignupRequestDto,
            auth::dtos::SignupResponseDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::LoginResponseDto,
            auth::dtos::VerifyEmailResponseDto,
            auth::dtos::ResendVerificationRequestDto,
            ApiResponse<auth::dtos::SignupResponseDto>,
            ApiResponse<auth::dtos::LoginResponseDto>,
            ApiResponse<AuthenticatedUser>,
            // Users
            users_dtos::UserProfileResponseDto,
            users_dtos::UpdateProfileDto,
            ApiResponse<users_dtos::UserProfileResponseDto>,
            // Reports
            reports_dtos::SubmitReportDto,
            reports_dtos::SubmitReportFormDto,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReportDetailResponseDto,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportDetailResponseDto>,
            // Volunteers
            volunteers_dtos::StartMovementDto,
            volunteers_dtos::MovementResponseDto,
            volunteers_dtos::MovementSummaryDto,
            volunteers_dtos::JoinMovementResponseDto,
            ApiResponse<volunteers_dtos::MovementResponseDto>,
            ApiResponse<Vec<volunteers_dtos::MovementSummaryDto>>,
            ApiResponse<volunteers_dtos::JoinMovementResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, email verification and login"),
        (name = "users", description = "User profile management"),
        (name = "reports", description = "Waste reports: submission, claiming and status"),
        (name = "volunteers", description = "Volunteer cleanup movements"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "WasteWatch API",
        version = "0.1.0",
        description = "API documentation for WasteWatch",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/signup",
            "/auth/login",
            "/auth/verify-email",
            "/auth/resend-verification",
            "/auth/me",
            "/api/users/me",
            "/api/submit_report",
            "/api/reports",
            "/api/report/{id}",
            "/api/report/claim/{id}",
            "/api/report/update/{id}",
            "/api/volunteer/start/{report_id}",
            "/api/volunteer/join/{report_id}",
            "/api/volunteer/block/{report_id}",
            "/api/volunteer/unblock/{report_id}",
            "/api/volunteer/active-movements",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
