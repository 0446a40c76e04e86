use chrono::Utc;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::inspections::models::InspectionRecord;
use crate::features::inspections::services::{load_editable, load_owned};
use crate::features::inspections::{InspectionService, InspectionStore};
use crate::features::photos::dtos::UploadedFiles;
use crate::features::photos::PhotoSet;
use crate::features::steps::dtos::CollectionPayloadDto;
use crate::features::steps::entity::StepEntity;
use crate::features::steps::{CollectionStep, StepService, StepServices};
use crate::features::wizard::dtos::{
    FinalizeRequestDto, GeneralStepDto, StepPayloadDto, WizardStateDto, WizardTransitionDto,
};
use crate::features::wizard::general_step::GeneralStep;
use crate::features::wizard::models::{Notification, WizardStep};
use crate::features::wizard::saveable::Saveable;
use crate::features::wizard::state::Wizard;

/// Drives the wizard of one inspection per request and persists its progress
pub struct WizardService {
    inspections: Arc<InspectionService>,
    store: Arc<dyn InspectionStore>,
    steps: StepServices,
    in_flight: Mutex<HashSet<Uuid>>,
}

/// Marks an inspection busy until dropped
struct InFlight<'a> {
    set: &'a Mutex<HashSet<Uuid>>,
    id: Uuid,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut set = self.set.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.id);
    }
}

impl WizardService {
    pub fn new(inspections: Arc<InspectionService>, steps: StepServices) -> Self {
        Self {
            store: inspections.store(),
            inspections,
            steps,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    fn begin(&self, id: Uuid) -> Result<InFlight<'_>> {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(id) {
            return Err(AppError::Conflict(format!(
                "A save is already in progress for inspection {}",
                id
            )));
        }
        Ok(InFlight {
            set: &self.in_flight,
            id,
        })
    }

    pub async fn state(&self, user: &AuthenticatedUser, id: Uuid) -> Result<WizardStateDto> {
        let record = load_owned(self.store.as_ref(), user, id).await?;
        Ok(state_of(&record))
    }

    /// Save the submitted step and advance
    pub async fn next(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        payload: StepPayloadDto,
        mut files: UploadedFiles,
    ) -> Result<WizardTransitionDto> {
        let _guard = self.begin(id)?;
        let record = load_editable(self.store.as_ref(), user, id).await?;
        let mut wizard = Wizard::new(WizardStep::from_stored(record.current_step));

        if payload.step != wizard.current() {
            return Err(AppError::Conflict(format!(
                "Step '{}' is not the active step '{}'",
                payload.step.title(),
                wizard.current().title()
            )));
        }

        let mut step = self.saveable(&record, payload, &mut files).await?;
        if !files.is_empty() {
            tracing::debug!(
                "Inspection {}: {} file parts were not referenced by the payload",
                id,
                files.len()
            );
        }

        let current = wizard.next(step.as_mut()).await.inspect_err(|e| {
            tracing::warn!("Wizard save failed for inspection {}: {}", id, e);
        })?;
        self.store.set_current_step(id, current.index() as i32).await?;
        tracing::info!("Inspection {} advanced to step '{}'", id, current.title());

        let record = load_owned(self.store.as_ref(), user, id).await?;
        Ok(WizardTransitionDto {
            state: state_of(&record),
            notifications: wizard.take_notifications(),
        })
    }

    /// Step back without saving
    pub async fn previous(&self, user: &AuthenticatedUser, id: Uuid) -> Result<WizardTransitionDto> {
        let _guard = self.begin(id)?;
        let record = load_editable(self.store.as_ref(), user, id).await?;
        let mut wizard = Wizard::new(WizardStep::from_stored(record.current_step));

        let current = wizard.previous();
        self.store.set_current_step(id, current.index() as i32).await?;

        let record = load_owned(self.store.as_ref(), user, id).await?;
        Ok(WizardTransitionDto {
            state: state_of(&record),
            notifications: wizard.take_notifications(),
        })
    }

    pub async fn finalize(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: FinalizeRequestDto,
    ) -> Result<WizardTransitionDto> {
        request.validate().map_err(AppError::from_validation)?;
        let _guard = self.begin(id)?;
        let record = load_owned(self.store.as_ref(), user, id).await?;
        let mut wizard = Wizard::new(WizardStep::from_stored(record.current_step));

        let update = wizard.prepare_finalize(&record, &request, Utc::now().date_naive())?;
        let record = self.store.finalize(id, &update).await?;
        wizard.notify(Notification::success("État des lieux finalisé"));
        tracing::info!(
            "Inspection {} finalised (entree={:?}, sortie={:?}, travaux={})",
            id,
            record.date_entree,
            record.date_sortie,
            record.travaux_a_faire
        );

        Ok(WizardTransitionDto {
            state: state_of(&record),
            notifications: wizard.take_notifications(),
        })
    }

    async fn saveable(
        &self,
        record: &InspectionRecord,
        payload: StepPayloadDto,
        files: &mut UploadedFiles,
    ) -> Result<Box<dyn Saveable>> {
        let id = record.id;
        let data = payload.data;
        match payload.step {
            WizardStep::General => {
                let dto: GeneralStepDto = decode(payload.step, data)?;
                dto.validate().map_err(AppError::from_validation)?;
                let mut photos = PhotoSet::from_existing(record.photos.0.clone());
                if let Some(kept) = dto.photos {
                    photos.retain_kept(&kept);
                }
                for photo in files.take_photos(&dto.new_photos)? {
                    photos.add_local(photo)?;
                }
                Ok(Box::new(GeneralStep::new(
                    self.inspections.clone(),
                    record.clone(),
                    dto.general,
                    photos,
                )))
            }
            WizardStep::Meters => collection(&self.steps.meters, id, data, files).await,
            WizardStep::Rooms => collection(&self.steps.rooms, id, data, files).await,
            WizardStep::Keys => collection(&self.steps.keys, id, data, files).await,
            WizardStep::PrivateAreas => {
                collection(&self.steps.private_areas, id, data, files).await
            }
            WizardStep::OtherEquipment => {
                collection(&self.steps.other_equipment, id, data, files).await
            }
            WizardStep::EnergyEquipment => {
                collection(&self.steps.energy_equipment, id, data, files).await
            }
            WizardStep::HeatingEquipment => {
                collection(&self.steps.heating_equipment, id, data, files).await
            }
            WizardStep::Finalize => Err(AppError::BadRequest(
                "The last step is completed by finalizing the inspection".to_string(),
            )),
        }
    }
}

fn decode<T: DeserializeOwned>(step: WizardStep, data: serde_json::Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| {
        AppError::BadRequest(format!("Invalid data for step '{}': {}", step.title(), e))
    })
}

async fn collection<E: StepEntity>(
    service: &Arc<StepService<E>>,
    inspection_id: Uuid,
    data: serde_json::Value,
    files: &mut UploadedFiles,
) -> Result<Box<dyn Saveable>> {
    let data = if data.is_null() {
        serde_json::json!({ "entries": [] })
    } else {
        data
    };
    let payload: CollectionPayloadDto<E> = decode(E::STEP, data)?;
    let drafts = service
        .drafts_from_payload(inspection_id, payload.entries, files)
        .await?;
    Ok(Box::new(CollectionStep::new(
        service.clone(),
        inspection_id,
        drafts,
    )))
}

fn state_of(record: &InspectionRecord) -> WizardStateDto {
    let current = WizardStep::from_stored(record.current_step);
    WizardStateDto {
        inspection_id: record.id,
        current_step: current,
        step_index: current.index(),
        step_count: WizardStep::ALL.len(),
        title: current.title().to_string(),
        statut: record.statut,
        has_signature_bailleur: record.signature_bailleur.is_some(),
        has_signature_locataire: record.signature_locataire.is_some(),
    }
}
