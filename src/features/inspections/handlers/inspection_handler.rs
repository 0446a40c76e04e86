use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::inspections::dtos::{InspectionResponseDto, UpdateInspectionDto};
use crate::features::inspections::models::{GeneralFields, Signature, SignatureParty};
use crate::features::inspections::services::InspectionService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List the caller's inspections, newest first
#[utoipa::path(
    get,
    path = "/api/inspections",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Inspections", body = ApiResponse<Vec<InspectionResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "inspections",
    security(("bearer_auth" = []))
)]
pub async fn list_inspections(
    user: AuthenticatedUser,
    State(service): State<Arc<InspectionService>>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<InspectionResponseDto>>>> {
    let (records, total) = service.list(&user, &pagination).await?;
    let dtos = records.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Start a new inspection
#[utoipa::path(
    post,
    path = "/api/inspections",
    request_body = GeneralFields,
    responses(
        (status = 201, description = "Inspection created", body = ApiResponse<InspectionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "inspections",
    security(("bearer_auth" = []))
)]
pub async fn create_inspection(
    user: AuthenticatedUser,
    State(service): State<Arc<InspectionService>>,
    AppJson(fields): AppJson<GeneralFields>,
) -> Result<(StatusCode, Json<ApiResponse<InspectionResponseDto>>)> {
    let record = service.create(&user, fields, None).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(record.into()),
            Some("Inspection created".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/inspections/{id}",
    params(("id" = Uuid, Path, description = "Inspection ID")),
    responses(
        (status = 200, description = "Inspection", body = ApiResponse<InspectionResponseDto>),
        (status = 404, description = "Inspection not found")
    ),
    tag = "inspections",
    security(("bearer_auth" = []))
)]
pub async fn get_inspection(
    user: AuthenticatedUser,
    State(service): State<Arc<InspectionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<InspectionResponseDto>>> {
    let record = service.get(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(record.into()), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/inspections/{id}",
    params(("id" = Uuid, Path, description = "Inspection ID")),
    request_body = UpdateInspectionDto,
    responses(
        (status = 200, description = "Inspection updated", body = ApiResponse<InspectionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Inspection not found"),
        (status = 409, description = "Inspection is finalised")
    ),
    tag = "inspections",
    security(("bearer_auth" = []))
)]
pub async fn update_inspection(
    user: AuthenticatedUser,
    State(service): State<Arc<InspectionService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateInspectionDto>,
) -> Result<Json<ApiResponse<InspectionResponseDto>>> {
    dto.validate().map_err(AppError::from_validation)?;

    let record = service.update(&user, id, dto.general, dto.photos).await?;
    Ok(Json(ApiResponse::success(
        Some(record.into()),
        Some("Inspection updated".to_string()),
        None,
    )))
}

/// Delete an inspection with its children and stored photos
#[utoipa::path(
    delete,
    path = "/api/inspections/{id}",
    params(("id" = Uuid, Path, description = "Inspection ID")),
    responses(
        (status = 200, description = "Inspection deleted"),
        (status = 404, description = "Inspection not found")
    ),
    tag = "inspections",
    security(("bearer_auth" = []))
)]
pub async fn delete_inspection(
    user: AuthenticatedUser,
    State(service): State<Arc<InspectionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Inspection deleted".to_string()),
        None,
    )))
}

/// Save one party's signature
#[utoipa::path(
    put,
    path = "/api/inspections/{id}/signatures/{party}",
    params(
        ("id" = Uuid, Path, description = "Inspection ID"),
        ("party" = SignatureParty, Path, description = "bailleur or locataire")
    ),
    request_body = Signature,
    responses(
        (status = 200, description = "Signature saved", body = ApiResponse<InspectionResponseDto>),
        (status = 400, description = "Invalid signature"),
        (status = 404, description = "Inspection not found"),
        (status = 409, description = "Inspection is finalised")
    ),
    tag = "inspections",
    security(("bearer_auth" = []))
)]
pub async fn save_signature(
    user: AuthenticatedUser,
    State(service): State<Arc<InspectionService>>,
    Path((id, party)): Path<(Uuid, SignatureParty)>,
    AppJson(signature): AppJson<Signature>,
) -> Result<Json<ApiResponse<InspectionResponseDto>>> {
    let record = service.set_signature(&user, id, party, signature).await?;
    Ok(Json(ApiResponse::success(
        Some(record.into()),
        Some("Signature saved".to_string()),
        None,
    )))
}
