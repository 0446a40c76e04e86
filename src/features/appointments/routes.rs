use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::features::appointments::handlers;
use crate::features::appointments::services::AppointmentService;

pub fn routes(service: Arc<AppointmentService>) -> Router {
    Router::new()
        .route(
            "/api/appointments",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route(
            "/api/appointments/{id}",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .delete(handlers::delete_appointment),
        )
        .route(
            "/api/appointments/{id}/status",
            patch(handlers::update_appointment_status),
        )
        .route(
            "/api/appointments/{id}/inspection",
            post(handlers::convert_appointment),
        )
        .with_state(service)
}
