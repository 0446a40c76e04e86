use axum::Router;

use super::handlers::{
    energy_equipment, heating_equipment, keys, meters, other_equipment, private_areas, rooms,
};
use super::StepServices;

pub fn routes(services: &StepServices) -> Router {
    Router::new()
        .merge(rooms::routes(services.rooms.clone()))
        .merge(meters::routes(services.meters.clone()))
        .merge(keys::routes(services.keys.clone()))
        .merge(private_areas::routes(services.private_areas.clone()))
        .merge(other_equipment::routes(services.other_equipment.clone()))
        .merge(energy_equipment::routes(services.energy_equipment.clone()))
        .merge(heating_equipment::routes(services.heating_equipment.clone()))
}
