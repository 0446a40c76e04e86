use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::profiles::handlers;
use crate::features::profiles::services::ProfileService;

pub fn routes(service: Arc<ProfileService>) -> Router {
    Router::new()
        .route(
            "/api/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .with_state(service)
}
