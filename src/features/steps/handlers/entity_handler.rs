//! Child entity endpoints.
//!
//! The bodies are generic over `StepEntity`. `entity_api!` stamps out one
//! documented module per entity with its handlers and router.

use axum::{http::StatusCode, Json};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::steps::dtos::UpdateEntryDto;
use crate::features::steps::entity::{ChildRecord, StepEntity};
use crate::features::steps::services::StepService;
use crate::shared::types::{ApiResponse, Meta};

pub async fn list_entries<E: StepEntity>(
    service: &StepService<E>,
    user: &AuthenticatedUser,
    inspection_id: Uuid,
) -> Result<Json<ApiResponse<Vec<ChildRecord<E>>>>> {
    let records = service.list(user, inspection_id).await?;
    let total = records.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(records),
        None,
        Some(Meta { total }),
    )))
}

pub async fn create_entry<E: StepEntity>(
    service: &StepService<E>,
    user: &AuthenticatedUser,
    inspection_id: Uuid,
    details: E,
) -> Result<(StatusCode, Json<ApiResponse<ChildRecord<E>>>)> {
    let record = service.create(user, inspection_id, details).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(record),
            Some(format!("{} created", capitalize(E::LABEL))),
            None,
        )),
    ))
}

pub async fn update_entry<E: StepEntity>(
    service: &StepService<E>,
    user: &AuthenticatedUser,
    id: Uuid,
    dto: UpdateEntryDto<E>,
) -> Result<Json<ApiResponse<ChildRecord<E>>>> {
    let record = service.update(user, id, dto.details, dto.photos).await?;
    Ok(Json(ApiResponse::success(
        Some(record),
        Some(format!("{} updated", capitalize(E::LABEL))),
        None,
    )))
}

pub async fn delete_entry<E: StepEntity>(
    service: &StepService<E>,
    user: &AuthenticatedUser,
    id: Uuid,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some(format!("{} deleted", capitalize(E::LABEL))),
        None,
    )))
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

macro_rules! entity_api {
    ($module:ident, $entity:ident, $tag:tt, $collection:tt, $item:tt) => {
        pub mod $module {
            use axum::{
                extract::{Path, State},
                http::StatusCode,
                routing::{get, put},
                Json, Router,
            };
            use std::sync::Arc;
            use uuid::Uuid;

            use crate::core::error::Result;
            use crate::core::extractor::AppJson;
            use crate::features::auth::model::AuthenticatedUser;
            use crate::features::steps::dtos::UpdateEntryDto;
            use crate::features::steps::entity::ChildRecord;
            use crate::features::steps::models::$entity;
            use crate::features::steps::services::StepService;
            use crate::shared::types::ApiResponse;

            type Service = Arc<StepService<$entity>>;

            #[utoipa::path(
                get,
                path = $collection,
                params(("id" = Uuid, Path, description = "Inspection ID")),
                responses(
                    (status = 200, description = "Entries in creation order", body = ApiResponse<Vec<ChildRecord<$entity>>>),
                    (status = 404, description = "Inspection not found")
                ),
                tag = $tag,
                security(("bearer_auth" = []))
            )]
            pub async fn list(
                user: AuthenticatedUser,
                State(service): State<Service>,
                Path(id): Path<Uuid>,
            ) -> Result<Json<ApiResponse<Vec<ChildRecord<$entity>>>>> {
                super::list_entries(&service, &user, id).await
            }

            #[utoipa::path(
                post,
                path = $collection,
                params(("id" = Uuid, Path, description = "Inspection ID")),
                request_body = $entity,
                responses(
                    (status = 201, description = "Entry created", body = ApiResponse<ChildRecord<$entity>>),
                    (status = 400, description = "Validation error"),
                    (status = 404, description = "Inspection not found"),
                    (status = 409, description = "Inspection is finalised")
                ),
                tag = $tag,
                security(("bearer_auth" = []))
            )]
            pub async fn create(
                user: AuthenticatedUser,
                State(service): State<Service>,
                Path(id): Path<Uuid>,
                AppJson(details): AppJson<$entity>,
            ) -> Result<(StatusCode, Json<ApiResponse<ChildRecord<$entity>>>)> {
                super::create_entry(&service, &user, id, details).await
            }

            #[utoipa::path(
                put,
                path = $item,
                params(("entry_id" = Uuid, Path, description = "Entry ID")),
                request_body = UpdateEntryDto<$entity>,
                responses(
                    (status = 200, description = "Entry updated", body = ApiResponse<ChildRecord<$entity>>),
                    (status = 400, description = "Validation error"),
                    (status = 404, description = "Entry not found"),
                    (status = 409, description = "Inspection is finalised")
                ),
                tag = $tag,
                security(("bearer_auth" = []))
            )]
            pub async fn update(
                user: AuthenticatedUser,
                State(service): State<Service>,
                Path(entry_id): Path<Uuid>,
                AppJson(dto): AppJson<UpdateEntryDto<$entity>>,
            ) -> Result<Json<ApiResponse<ChildRecord<$entity>>>> {
                super::update_entry(&service, &user, entry_id, dto).await
            }

            #[utoipa::path(
                delete,
                path = $item,
                params(("entry_id" = Uuid, Path, description = "Entry ID")),
                responses(
                    (status = 200, description = "Entry and its photos deleted"),
                    (status = 404, description = "Entry not found"),
                    (status = 409, description = "Inspection is finalised")
                ),
                tag = $tag,
                security(("bearer_auth" = []))
            )]
            pub async fn delete(
                user: AuthenticatedUser,
                State(service): State<Service>,
                Path(entry_id): Path<Uuid>,
            ) -> Result<Json<ApiResponse<()>>> {
                super::delete_entry(&service, &user, entry_id).await
            }

            pub fn routes(service: Service) -> Router {
                Router::new()
                    .route($collection, get(list).post(create))
                    .route($item, put(update).delete(delete))
                    .with_state(service)
            }
        }
    };
}

entity_api!(
    rooms,
    RoomEntry,
    "rooms",
    "/api/inspections/{id}/pieces",
    "/api/pieces/{entry_id}"
);
entity_api!(
    meters,
    MeterReading,
    "meters",
    "/api/inspections/{id}/compteurs",
    "/api/compteurs/{entry_id}"
);
entity_api!(
    keys,
    KeySet,
    "keys",
    "/api/inspections/{id}/cles",
    "/api/cles/{entry_id}"
);
entity_api!(
    private_areas,
    PrivateArea,
    "private-areas",
    "/api/inspections/{id}/parties-privatives",
    "/api/parties-privatives/{entry_id}"
);
entity_api!(
    other_equipment,
    OtherEquipment,
    "other-equipment",
    "/api/inspections/{id}/autres-equipements",
    "/api/autres-equipements/{entry_id}"
);
entity_api!(
    energy_equipment,
    EnergyEquipment,
    "energy-equipment",
    "/api/inspections/{id}/equipements-energetiques",
    "/api/equipements-energetiques/{entry_id}"
);
entity_api!(
    heating_equipment,
    HeatingEquipment,
    "heating-equipment",
    "/api/inspections/{id}/equipements-chauffage",
    "/api/equipements-chauffage/{entry_id}"
);
