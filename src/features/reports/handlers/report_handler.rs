use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{header, StatusCode},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireOrganization;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    ReportDetailResponseDto, ReportListQuery, ReportResponseDto, SubmitReportDto,
    SubmitReportFormDto, UpdateReportStatusDto,
};
use crate::features::reports::models::ReportStatus;
use crate::features::reports::services::{ReportImage, ReportService};
use crate::features::volunteers::services::VolunteerService;
use crate::shared::constants::{ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE};
use crate::shared::types::{ApiResponse, Meta};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub volunteer_service: Arc<VolunteerService>,
}

/// Submit a waste report
///
/// Accepts either `application/json` (`image_url` optional) or
/// `multipart/form-data` with:
/// - `latitude`, `longitude`, `description`: required
/// - `image`: optional photo (jpeg, png, gif or webp, max 10 MB)
#[utoipa::path(
    post,
    path = "/api/submit_report",
    request_body(
        content(
            (SubmitReportDto = "application/json"),
            (SubmitReportFormDto = "multipart/form-data")
        ),
        description = "Report location, description and optional photo",
    ),
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Missing or invalid fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Email must be verified before submitting reports"),
        (status = 415, description = "Unsupported content type")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn submit_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    request: Request,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (dto, image) = if content_type.starts_with("application/json") {
        let AppJson(dto) = AppJson::<SubmitReportDto>::from_request(request, &state).await?;
        (dto, None)
    } else if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        read_report_form(multipart).await?
    } else {
        return Err(AppError::UnsupportedMediaType(
            "Content-Type must be application/json or multipart/form-data".to_string(),
        ));
    };

    let data = dto.into_create(user.user_id)?;
    let report = state.report_service.submit(data, image).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted successfully".to_string()),
            None,
        )),
    ))
}

/// Collect the report fields and the optional photo from a multipart body
async fn read_report_form(mut multipart: Multipart) -> Result<(SubmitReportDto, Option<ReportImage>)> {
    let mut dto = SubmitReportDto::default();
    let mut image: Option<ReportImage> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "image" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_ascii_lowercase())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read image bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read image data: {}", e))
                })?;

                // Browsers send an empty part when no file was picked
                if data.is_empty() {
                    continue;
                }

                if data.len() > MAX_IMAGE_SIZE {
                    return Err(AppError::BadRequest(format!(
                        "Image too large. Maximum size is {} MB",
                        MAX_IMAGE_SIZE / 1024 / 1024
                    )));
                }

                if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
                    return Err(AppError::BadRequest(format!(
                        "Image type '{}' is not allowed. Allowed types: {}",
                        content_type,
                        ALLOWED_IMAGE_TYPES.join(", ")
                    )));
                }

                image = Some(ReportImage {
                    data: data.to_vec(),
                    content_type,
                });
            }
            "latitude" | "longitude" | "description" | "image_url" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read {} field: {}", field_name, e))
                })?;
                let text = text.trim();
                if text.is_empty() {
                    continue;
                }

                match field_name.as_str() {
                    "latitude" => dto.latitude = Some(parse_coordinate("latitude", text)?),
                    "longitude" => dto.longitude = Some(parse_coordinate("longitude", text)?),
                    "description" => dto.description = Some(text.to_string()),
                    _ => dto.image_url = Some(text.to_string()),
                }
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    Ok((dto, image))
}

fn parse_coordinate(name: &str, raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::BadRequest(format!("{} must be a number", name)))
}

/// List reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "List of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 400, description = "Unknown status filter"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    _user: AuthenticatedUser,
    State(state): State<ReportState>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let status = query.status_filter()?;
    let (reports, total) = state
        .report_service
        .list(status, &query.pagination())
        .await?;

    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Get a report with its volunteer movement
#[utoipa::path(
    get,
    path = "/api/report/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportDetailResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    _user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ReportDetailResponseDto>>> {
    let report = state.report_service.get_by_id(id).await?;
    let movement = state.volunteer_service.summary_for_report(id).await?;

    let dto = ReportDetailResponseDto {
        report: report.into(),
        movement: movement.map(Into::into),
    };

    Ok(Json(ApiResponse::success(Some(dto), None, None)))
}

/// Claim a report for the calling organization
#[utoipa::path(
    put,
    path = "/api/report/claim/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report claimed", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only NGO or Government users can claim reports"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report already claimed")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn claim_report(
    RequireOrganization(user): RequireOrganization,
    State(state): State<ReportState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = state.report_service.claim(id, user.user_id).await?;
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report claimed successfully".to_string()),
        None,
    )))
}

/// Update the status of a claimed report
#[utoipa::path(
    put,
    path = "/api/report/update/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Invalid status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an organization or not the claimant"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report already cleaned")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_status(
    RequireOrganization(user): RequireOrganization,
    State(state): State<ReportState>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let target = ReportStatus::parse_update_target(&dto.status)?;
    let report = state
        .report_service
        .update_status(id, user.user_id, target)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report status updated".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::routes;
    use crate::features::users::models::UserType;
    use crate::shared::test_helpers::{lazy_pool, with_user, MemoryImageStore};
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::json;

    fn server_as(user_type: UserType) -> TestServer {
        let pool = lazy_pool();
        let router = routes::routes(
            Arc::new(ReportService::new(
                pool.clone(),
                Arc::new(MemoryImageStore::default()),
            )),
            Arc::new(VolunteerService::new(pool)),
        );
        TestServer::new(with_user(router, 11, user_type)).unwrap()
    }

    #[tokio::test]
    async fn test_submit_rejects_other_content_types() {
        let response = server_as(UserType::General)
            .post("/api/submit_report")
            .text("latitude=1")
            .await;
        response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_submit_json_requires_fields() {
        let response = server_as(UserType::General)
            .post("/api/submit_report")
            .json(&json!({ "latitude": 1.0 }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(
            body["message"],
            "Missing required fields: latitude, longitude, description"
        );
    }

    #[tokio::test]
    async fn test_submit_json_checks_ranges() {
        server_as(UserType::General)
            .post("/api/submit_report")
            .json(&json!({ "latitude": 91.0, "longitude": 0.0, "description": "Bags" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submit_multipart_rejects_disallowed_image_type() {
        let form = MultipartForm::new()
            .add_text("latitude", "-6.2")
            .add_text("longitude", "106.8")
            .add_text("description", "Bags by the river")
            .add_part(
                "image",
                Part::bytes(b"%PDF-1.4".to_vec())
                    .file_name("report.pdf")
                    .mime_type("application/pdf"),
            );

        let response = server_as(UserType::General)
            .post("/api/submit_report")
            .multipart(form)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submit_multipart_rejects_bad_coordinates() {
        let form = MultipartForm::new()
            .add_text("latitude", "north")
            .add_text("longitude", "106.8")
            .add_text("description", "Bags by the river");

        let response = server_as(UserType::General)
            .post("/api/submit_report")
            .multipart(form)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "latitude must be a number");
    }

    #[tokio::test]
    async fn test_general_users_cannot_claim_or_update() {
        let server = server_as(UserType::General);
        server
            .put("/api/report/claim/1")
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .put("/api/report/update/1")
            .json(&json!({ "status": "cleaned" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_update_rejects_pending_and_unknown_status() {
        let server = server_as(UserType::Ngo);
        for status in ["pending", "done"] {
            server
                .put("/api/report/update/1")
                .json(&json!({ "status": status }))
                .await
                .assert_status(StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_status_filter() {
        server_as(UserType::General)
            .get("/api/reports")
            .add_query_param("status", "lost")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("latitude", "-6.25").unwrap(), -6.25);
        assert!(parse_coordinate("latitude", "NaN").is_err());
        assert!(parse_coordinate("latitude", "").is_err());
    }
}
