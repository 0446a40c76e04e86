use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::appointments::dtos::{
    AppointmentRangeQuery, AppointmentResponseDto, ConversionResponseDto, UpdateStatusDto,
};
use crate::features::appointments::models::AppointmentFields;
use crate::features::appointments::services::AppointmentService;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::{ApiResponse, Meta};

/// List the caller's appointments by date and time
#[utoipa::path(
    get,
    path = "/api/appointments",
    params(AppointmentRangeQuery),
    responses(
        (status = 200, description = "Appointments", body = ApiResponse<Vec<AppointmentResponseDto>>),
        (status = 400, description = "Invalid date range"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "appointments",
    security(("bearer_auth" = []))
)]
pub async fn list_appointments(
    user: AuthenticatedUser,
    State(service): State<Arc<AppointmentService>>,
    Query(range): Query<AppointmentRangeQuery>,
) -> Result<Json<ApiResponse<Vec<AppointmentResponseDto>>>> {
    let appointments = service.list(&user, range.from, range.to).await?;
    let total = appointments.len() as i64;
    let dtos = appointments.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = AppointmentFields,
    responses(
        (status = 201, description = "Appointment created", body = ApiResponse<AppointmentResponseDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "appointments",
    security(("bearer_auth" = []))
)]
pub async fn create_appointment(
    user: AuthenticatedUser,
    State(service): State<Arc<AppointmentService>>,
    AppJson(fields): AppJson<AppointmentFields>,
) -> Result<(StatusCode, Json<ApiResponse<AppointmentResponseDto>>)> {
    let appointment = service.create(&user, fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(appointment.into()),
            Some("Appointment created".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment", body = ApiResponse<AppointmentResponseDto>),
        (status = 404, description = "Appointment not found")
    ),
    tag = "appointments",
    security(("bearer_auth" = []))
)]
pub async fn get_appointment(
    user: AuthenticatedUser,
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AppointmentResponseDto>>> {
    let appointment = service.get(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(appointment.into()), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = AppointmentFields,
    responses(
        (status = 200, description = "Appointment updated", body = ApiResponse<AppointmentResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Appointment is done or cancelled")
    ),
    tag = "appointments",
    security(("bearer_auth" = []))
)]
pub async fn update_appointment(
    user: AuthenticatedUser,
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<Uuid>,
    AppJson(fields): AppJson<AppointmentFields>,
) -> Result<Json<ApiResponse<AppointmentResponseDto>>> {
    let appointment = service.update(&user, id, fields).await?;
    Ok(Json(ApiResponse::success(
        Some(appointment.into()),
        Some("Appointment updated".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment deleted"),
        (status = 404, description = "Appointment not found")
    ),
    tag = "appointments",
    security(("bearer_auth" = []))
)]
pub async fn delete_appointment(
    user: AuthenticatedUser,
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Appointment deleted".to_string()),
        None,
    )))
}

/// Move an appointment to another status
#[utoipa::path(
    patch,
    path = "/api/appointments/{id}/status",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<AppointmentResponseDto>),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Transition not allowed")
    ),
    tag = "appointments",
    security(("bearer_auth" = []))
)]
pub async fn update_appointment_status(
    user: AuthenticatedUser,
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<Json<ApiResponse<AppointmentResponseDto>>> {
    let appointment = service.change_status(&user, id, dto.status).await?;
    Ok(Json(ApiResponse::success(
        Some(appointment.into()),
        Some(format!("Appointment is now {}", dto.status)),
        None,
    )))
}

/// Start an inspection from the appointment
#[utoipa::path(
    post,
    path = "/api/appointments/{id}/inspection",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 201, description = "Inspection started", body = ApiResponse<ConversionResponseDto>),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Appointment is not planned or postponed")
    ),
    tag = "appointments",
    security(("bearer_auth" = []))
)]
pub async fn convert_appointment(
    user: AuthenticatedUser,
    State(service): State<Arc<AppointmentService>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<ConversionResponseDto>>)> {
    let (appointment, inspection) = service.convert(&user, id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(ConversionResponseDto {
                appointment: appointment.into(),
                inspection: inspection.into(),
            }),
            Some("Inspection started from appointment".to_string()),
            None,
        )),
    ))
}
