use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::ReportService;
use crate::features::volunteers::services::VolunteerService;
use crate::shared::constants::MAX_IMAGE_SIZE;

/// Create routes for the reports feature (auth middleware applied by caller)
pub fn routes(
    report_service: Arc<ReportService>,
    volunteer_service: Arc<VolunteerService>,
) -> Router {
    let state = ReportState {
        report_service,
        volunteer_service,
    };

    Router::new()
        .route(
            "/api/submit_report",
            // Room for the photo plus multipart overhead
            post(handlers::submit_report).layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024)),
        )
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/report/{id}", get(handlers::get_report))
        .route("/api/report/claim/{id}", put(handlers::claim_report))
        .route("/api/report/update/{id}", put(handlers::update_report_status))
        .with_state(state)
}
