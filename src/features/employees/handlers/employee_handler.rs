use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::employees::dtos::{
    CreateEmployeeDto, EmployeeResponseDto, UpdateEmployeeDto, VerifyPasswordDto,
    VerifyPasswordResponseDto,
};
use crate::features::employees::services::EmployeeService;
use crate::shared::types::{ApiResponse, Meta};

#[utoipa::path(
    get,
    path = "/api/team",
    responses(
        (status = 200, description = "Employees of the account", body = ApiResponse<Vec<EmployeeResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "team",
    security(("bearer_auth" = []))
)]
pub async fn list_employees(
    user: AuthenticatedUser,
    State(service): State<Arc<EmployeeService>>,
) -> Result<Json<ApiResponse<Vec<EmployeeResponseDto>>>> {
    let employees = service.list(&user).await?;
    let total = employees.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(employees),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    post,
    path = "/api/team",
    request_body = CreateEmployeeDto,
    responses(
        (status = 201, description = "Employee added", body = ApiResponse<EmployeeResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "team",
    security(("bearer_auth" = []))
)]
pub async fn create_employee(
    user: AuthenticatedUser,
    State(service): State<Arc<EmployeeService>>,
    AppJson(dto): AppJson<CreateEmployeeDto>,
) -> Result<(StatusCode, Json<ApiResponse<EmployeeResponseDto>>)> {
    let employee = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(employee),
            Some("Employee added".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/team/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee", body = ApiResponse<EmployeeResponseDto>),
        (status = 404, description = "Employee not found")
    ),
    tag = "team",
    security(("bearer_auth" = []))
)]
pub async fn get_employee(
    user: AuthenticatedUser,
    State(service): State<Arc<EmployeeService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EmployeeResponseDto>>> {
    let employee = service.get(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(employee), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/team/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = UpdateEmployeeDto,
    responses(
        (status = 200, description = "Employee updated", body = ApiResponse<EmployeeResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Employee not found")
    ),
    tag = "team",
    security(("bearer_auth" = []))
)]
pub async fn update_employee(
    user: AuthenticatedUser,
    State(service): State<Arc<EmployeeService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateEmployeeDto>,
) -> Result<Json<ApiResponse<EmployeeResponseDto>>> {
    let employee = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(employee),
        Some("Employee updated".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/team/{id}",
    params(("id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee removed"),
        (status = 404, description = "Employee not found")
    ),
    tag = "team",
    security(("bearer_auth" = []))
)]
pub async fn delete_employee(
    user: AuthenticatedUser,
    State(service): State<Arc<EmployeeService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Employee removed".to_string()),
        None,
    )))
}

/// Check the password of a protected employee before selecting them
#[utoipa::path(
    post,
    path = "/api/team/{id}/verify",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = VerifyPasswordDto,
    responses(
        (status = 200, description = "Verification result", body = ApiResponse<VerifyPasswordResponseDto>),
        (status = 404, description = "Employee not found")
    ),
    tag = "team",
    security(("bearer_auth" = []))
)]
pub async fn verify_employee_password(
    user: AuthenticatedUser,
    State(service): State<Arc<EmployeeService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<VerifyPasswordDto>,
) -> Result<Json<ApiResponse<VerifyPasswordResponseDto>>> {
    let verified = service.verify(&user, id, dto.password).await?;
    Ok(Json(ApiResponse::success(
        Some(VerifyPasswordResponseDto { verified }),
        None,
        None,
    )))
}
