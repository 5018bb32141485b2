use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequireGeneral, RequireGovernment};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::volunteers::dtos::{
    JoinMovementResponseDto, MovementResponseDto, MovementSummaryDto, StartMovementDto,
};
use crate::features::volunteers::services::VolunteerService;
use crate::shared::types::ApiResponse;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

/// Organize a cleanup movement for a report
#[utoipa::path(
    post,
    path = "/api/volunteer/start/{report_id}",
    params(
        ("report_id" = i64, Path, description = "Report ID")
    ),
    request_body = StartMovementDto,
    responses(
        (status = 201, description = "Volunteer movement started", body = ApiResponse<MovementResponseDto>),
        (status = 400, description = "Invalid volunteer count or date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only general users can start movements"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report already cleaned or movement already exists")
    ),
    tag = "volunteers",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn start_movement(
    RequireGeneral(user): RequireGeneral,
    State(service): State<Arc<VolunteerService>>,
    Path(report_id): Path<i64>,
    AppJson(dto): AppJson<StartMovementDto>,
) -> Result<(StatusCode, Json<ApiResponse<MovementResponseDto>>)> {
    let data = dto.into_create(report_id, user.user_id, Utc::now().date_naive())?;
    let movement = service.start(data).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(movement.into()),
            Some("Volunteer movement started".to_string()),
            None,
        )),
    ))
}

/// Join the movement organized for a report
#[utoipa::path(
    post,
    path = "/api/volunteer/join/{report_id}",
    params(
        ("report_id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Joined the volunteer movement", body = ApiResponse<JoinMovementResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No movement for this report"),
        (status = 409, description = "Movement blocked or already joined")
    ),
    tag = "volunteers",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn join_movement(
    user: AuthenticatedUser,
    State(service): State<Arc<VolunteerService>>,
    Path(report_id): Path<i64>,
) -> Result<Json<ApiResponse<JoinMovementResponseDto>>> {
    let (movement, participant, participant_count) =
        service.join(report_id, user.user_id).await?;

    Ok(Json(ApiResponse::success(
        Some(JoinMovementResponseDto {
            movement_id: movement.id,
            report_id: movement.report_id,
            participant_count,
            joined_at: participant.joined_at,
        }),
        Some("Joined the volunteer movement".to_string()),
        None,
    )))
}

#[utoipa::path(
    put,
    path = "/api/volunteer/block/{report_id}",
    params(
        ("report_id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Volunteer movement blocked", body = ApiResponse<MovementResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only Government users can block movements"),
        (status = 404, description = "No movement for this report"),
        (status = 409, description = "Movement already blocked")
    ),
    tag = "volunteers",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn block_movement(
    RequireGovernment(user): RequireGovernment,
    State(service): State<Arc<VolunteerService>>,
    Path(report_id): Path<i64>,
) -> Result<Json<ApiResponse<MovementResponseDto>>> {
    let movement = service.block(report_id, user.user_id).await?;
    Ok(Json(ApiResponse::success(
        Some(movement.into()),
        Some("Volunteer movement blocked".to_string()),
        None,
    )))
}

#[utoipa::path(
    put,
    path = "/api/volunteer/unblock/{report_id}",
    params(
        ("report_id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Volunteer movement unblocked", body = ApiResponse<MovementResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only Government users can unblock movements"),
        (status = 404, description = "No movement for this report"),
        (status = 409, description = "Movement is not blocked")
    ),
    tag = "volunteers",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn unblock_movement(
    RequireGovernment(user): RequireGovernment,
    State(service): State<Arc<VolunteerService>>,
    Path(report_id): Path<i64>,
) -> Result<Json<ApiResponse<MovementResponseDto>>> {
    let movement = service.unblock(report_id, user.user_id).await?;
    Ok(Json(ApiResponse::success(
        Some(movement.into()),
        Some("Volunteer movement unblocked".to_string()),
        None,
    )))
}

/// Active movements ordered by scheduled date
#[utoipa::path(
    get,
    path = "/api/volunteer/active-movements",
    responses(
        (status = 200, description = "Active volunteer movements", body = ApiResponse<Vec<MovementSummaryDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "volunteers",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_active_movements(
    _user: AuthenticatedUser,
    State(service): State<Arc<VolunteerService>>,
) -> Result<Json<ApiResponse<Vec<MovementSummaryDto>>>> {
    let movements = service.list_active().await?;
    let items: Vec<MovementSummaryDto> = movements.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(Some(items), None, None)))
}

#[cfg(test)]
mod tests {
    use crate::features::users::models::UserType;
    use crate::features::volunteers::routes;
    use crate::features::volunteers::services::VolunteerService;
    use crate::shared::test_helpers::{lazy_pool, with_user};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use std::sync::Arc;

    fn server_as(user_type: UserType) -> TestServer {
        let router = routes::routes(Arc::new(VolunteerService::new(lazy_pool())));
        TestServer::new(with_user(router, 5, user_type)).unwrap()
    }

    fn start_body() -> serde_json::Value {
        json!({ "needed_volunteers": 10, "scheduled_date": "2999-01-01" })
    }

    #[tokio::test]
    async fn test_organizations_cannot_start_movements() {
        for user_type in [UserType::Ngo, UserType::Government] {
            server_as(user_type)
                .post("/api/volunteer/start/1")
                .json(&start_body())
                .await
                .assert_status(StatusCode::FORBIDDEN);
        }
    }

    #[tokio::test]
    async fn test_start_rejects_past_date_before_touching_database() {
        let response = server_as(UserType::General)
            .post("/api/volunteer/start/1")
            .json(&json!({ "needed_volunteers": 3, "scheduled_date": "2000-01-01" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "scheduled_date cannot be in the past");
    }

    #[tokio::test]
    async fn test_start_rejects_out_of_range_count() {
        server_as(UserType::General)
            .post("/api/volunteer/start/1")
            .json(&json!({ "needed_volunteers": -4, "scheduled_date": "2999-01-01" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_start_requires_json() {
        server_as(UserType::General)
            .post("/api/volunteer/start/1")
            .text("needed_volunteers=3")
            .await
            .assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_only_government_can_block_or_unblock() {
        for user_type in [UserType::General, UserType::Ngo] {
            let server = server_as(user_type);
            server
                .put("/api/volunteer/block/1")
                .await
                .assert_status(StatusCode::FORBIDDEN);
            server
                .put("/api/volunteer/unblock/1")
                .await
                .assert_status(StatusCode::FORBIDDEN);
        }
    }

    #[tokio::test]
    async fn test_routes_require_identity() {
        let router = routes::routes(Arc::new(VolunteerService::new(lazy_pool())));
        let server = TestServer::new(router).unwrap();
        server
            .post("/api/volunteer/join/1")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/api/volunteer/active-movements")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
