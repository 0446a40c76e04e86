use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::photos::dtos::PhotoSaveFormDto;
use crate::features::photos::multipart::read_payload_and_files;
use crate::features::wizard::dtos::{
    FinalizeRequestDto, StepPayloadDto, WizardStateDto, WizardTransitionDto,
};
use crate::features::wizard::services::WizardService;
use crate::shared::types::ApiResponse;

#[utoipa::path(
    get,
    path = "/api/inspections/{id}/wizard",
    params(("id" = Uuid, Path, description = "Inspection ID")),
    responses(
        (status = 200, description = "Current wizard position", body = ApiResponse<WizardStateDto>),
        (status = 404, description = "Inspection not found")
    ),
    tag = "wizard",
    security(("bearer_auth" = []))
)]
pub async fn get_wizard_state(
    user: AuthenticatedUser,
    State(service): State<Arc<WizardService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WizardStateDto>>> {
    let state = service.state(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(state), None, None)))
}

/// Save the active step and advance.
///
/// Multipart body: a `payload` part holding a `StepPayloadDto` and one
/// file part per new photo, referenced from the payload by part name.
#[utoipa::path(
    post,
    path = "/api/inspections/{id}/wizard/next",
    params(("id" = Uuid, Path, description = "Inspection ID")),
    request_body(content = PhotoSaveFormDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Step saved", body = ApiResponse<WizardTransitionDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Inspection not found"),
        (status = 409, description = "Wrong step, save in progress or inspection finalised"),
        (status = 502, description = "Photo storage failed")
    ),
    tag = "wizard",
    security(("bearer_auth" = []))
)]
pub async fn next_step(
    user: AuthenticatedUser,
    State(service): State<Arc<WizardService>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<WizardTransitionDto>>> {
    let (payload, files) = read_payload_and_files::<StepPayloadDto>(multipart).await?;
    let transition = service.next(&user, id, payload, files).await?;
    Ok(Json(ApiResponse::success(Some(transition), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/inspections/{id}/wizard/previous",
    params(("id" = Uuid, Path, description = "Inspection ID")),
    responses(
        (status = 200, description = "Moved back one step", body = ApiResponse<WizardTransitionDto>),
        (status = 404, description = "Inspection not found"),
        (status = 409, description = "Inspection finalised")
    ),
    tag = "wizard",
    security(("bearer_auth" = []))
)]
pub async fn previous_step(
    user: AuthenticatedUser,
    State(service): State<Arc<WizardService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<WizardTransitionDto>>> {
    let transition = service.previous(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(transition), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/inspections/{id}/wizard/finalize",
    params(("id" = Uuid, Path, description = "Inspection ID")),
    request_body = FinalizeRequestDto,
    responses(
        (status = 200, description = "Inspection finalised", body = ApiResponse<WizardTransitionDto>),
        (status = 400, description = "Missing confirmation or signature"),
        (status = 404, description = "Inspection not found"),
        (status = 409, description = "Not on the last step or already finalised")
    ),
    tag = "wizard",
    security(("bearer_auth" = []))
)]
pub async fn finalize(
    user: AuthenticatedUser,
    State(service): State<Arc<WizardService>>,
    Path(id): Path<Uuid>,
    AppJson(request): AppJson<FinalizeRequestDto>,
) -> Result<Json<ApiResponse<WizardTransitionDto>>> {
    let transition = service.finalize(&user, id, request).await?;
    Ok(Json(ApiResponse::success(Some(transition), None, None)))
}
