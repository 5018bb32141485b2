use crate::features::volunteers::handlers;
use crate::features::volunteers::services::VolunteerService;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<VolunteerService>) -> Router {
    Router::new()
        .route(
            "/api/volunteer/start/{report_id}",
            post(handlers::start_movement),
        )
        .route(
            "/api/volunteer/join/{report_id}",
            post(handlers::join_movement),
        )
        .route(
            "/api/volunteer/block/{report_id}",
            put(handlers::block_movement),
        )
        .route(
            "/api/volunteer/unblock/{report_id}",
            put(handlers::unblock_movement),
        )
        .route(
            "/api/volunteer/active-movements",
            get(handlers::list_active_movements),
        )
        .with_state(service)
}
