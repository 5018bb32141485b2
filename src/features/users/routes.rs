use crate::features::users::handlers;
use crate::features::users::services::UserService;
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/api/users/me",
            get(handlers::get_profile).patch(handlers::update_profile),
        )
        .with_state(service)
}
