use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::wizard::handlers;
use crate::features::wizard::services::WizardService;

/// `body_limit` applies to `wizard/next`, which carries several photos per request
pub fn routes(service: Arc<WizardService>, body_limit: usize) -> Router {
    Router::new()
        .route("/api/inspections/{id}/wizard", get(handlers::get_wizard_state))
        .route(
            "/api/inspections/{id}/wizard/next",
            post(handlers::next_step).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/api/inspections/{id}/wizard/previous",
            post(handlers::previous_step),
        )
        .route(
            "/api/inspections/{id}/wizard/finalize",
            post(handlers::finalize),
        )
        .with_state(service)
}
