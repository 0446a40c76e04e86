use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::employees::handlers;
use crate::features::employees::services::EmployeeService;

pub fn routes(service: Arc<EmployeeService>) -> Router {
    Router::new()
        .route(
            "/api/team",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/api/team/{id}",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::delete_employee),
        )
        .route(
            "/api/team/{id}/verify",
            post(handlers::verify_employee_password),
        )
        .with_state(service)
}
