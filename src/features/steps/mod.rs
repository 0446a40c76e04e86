//! Child entities of an inspection, one table per wizard step.
//!
//! | Step | Table | Collection endpoint |
//! |------|-------|---------------------|
//! | Meters | `releves_compteurs` | `/api/inspections/{id}/compteurs` |
//! | Rooms | `pieces` | `/api/inspections/{id}/pieces` |
//! | Keys | `cles` | `/api/inspections/{id}/cles` |
//! | Private areas | `parties_privatives` | `/api/inspections/{id}/parties-privatives` |
//! | Other equipment | `autres_equipements` | `/api/inspections/{id}/autres-equipements` |
//! | Energy equipment | `equipements_energetiques` | `/api/inspections/{id}/equipements-energetiques` |
//! | Heating equipment | `equipements_chauffage` | `/api/inspections/{id}/equipements-chauffage` |
//!
//! Single entries live at `/api/{segment}/{entry_id}` (PUT, DELETE).

use sqlx::PgPool;
use std::sync::Arc;

pub mod dtos;
pub mod entity;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;

#[cfg(test)]
use crate::features::inspections::stores::FakeInspectionStore;
use crate::features::inspections::{InspectionChildren, InspectionStore};
use crate::features::photos::PhotoUploader;
use entity::StepEntity;
use models::{
    EnergyEquipment, HeatingEquipment, KeySet, MeterReading, OtherEquipment, PrivateArea,
    RoomEntry,
};
pub use services::{CollectionStep, EntityDraft, StepService};
use stores::{ChildStore, PgChildStore};

/// One `StepService` per child table
#[derive(Clone)]
pub struct StepServices {
    pub meters: Arc<StepService<MeterReading>>,
    pub rooms: Arc<StepService<RoomEntry>>,
    pub keys: Arc<StepService<KeySet>>,
    pub private_areas: Arc<StepService<PrivateArea>>,
    pub other_equipment: Arc<StepService<OtherEquipment>>,
    pub energy_equipment: Arc<StepService<EnergyEquipment>>,
    pub heating_equipment: Arc<StepService<HeatingEquipment>>,
}

impl StepServices {
    pub fn postgres(
        pool: &PgPool,
        inspections: Arc<dyn InspectionStore>,
        uploader: Arc<PhotoUploader>,
    ) -> Self {
        fn service<E: StepEntity>(
            pool: &PgPool,
            inspections: &Arc<dyn InspectionStore>,
            uploader: &Arc<PhotoUploader>,
        ) -> Arc<StepService<E>> {
            let store: Arc<dyn ChildStore<E>> = Arc::new(PgChildStore::<E>::new(pool.clone()));
            Arc::new(StepService::new(store, inspections.clone(), uploader.clone()))
        }

        Self {
            meters: service(pool, &inspections, &uploader),
            rooms: service(pool, &inspections, &uploader),
            keys: service(pool, &inspections, &uploader),
            private_areas: service(pool, &inspections, &uploader),
            other_equipment: service(pool, &inspections, &uploader),
            energy_equipment: service(pool, &inspections, &uploader),
            heating_equipment: service(pool, &inspections, &uploader),
        }
    }

    #[cfg(test)]
    pub fn in_memory(inspections: Arc<FakeInspectionStore>, uploader: Arc<PhotoUploader>) -> Self {
        use stores::FakeChildStore;

        fn service<E: StepEntity>(
            inspections: &Arc<FakeInspectionStore>,
            uploader: &Arc<PhotoUploader>,
        ) -> Arc<StepService<E>> {
            let store: Arc<dyn ChildStore<E>> =
                Arc::new(FakeChildStore::<E>::tracking(inspections.clone()));
            Arc::new(StepService::new(store, inspections.clone(), uploader.clone()))
        }

        Self {
            meters: service(&inspections, &uploader),
            rooms: service(&inspections, &uploader),
            keys: service(&inspections, &uploader),
            private_areas: service(&inspections, &uploader),
            other_equipment: service(&inspections, &uploader),
            energy_equipment: service(&inspections, &uploader),
            heating_equipment: service(&inspections, &uploader),
        }
    }

    /// Photo sources gathered when an inspection is deleted
    pub fn as_children(&self) -> Vec<Arc<dyn InspectionChildren>> {
        let children: [Arc<dyn InspectionChildren>; 7] = [
            self.meters.clone(),
            self.rooms.clone(),
            self.keys.clone(),
            self.private_areas.clone(),
            self.other_equipment.clone(),
            self.energy_equipment.clone(),
            self.heating_equipment.clone(),
        ];
        children.into()
    }
}
