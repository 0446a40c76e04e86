use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::appointments::models::{Appointment, AppointmentFields, AppointmentStatus};
use crate::features::appointments::stores::AppointmentStore;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::inspections::models::InspectionRecord;
use crate::features::inspections::InspectionService;

/// Appointment agenda, and conversion of an appointment into an inspection
pub struct AppointmentService {
    store: Arc<dyn AppointmentStore>,
    inspections: Arc<InspectionService>,
}

impl AppointmentService {
    pub fn new(store: Arc<dyn AppointmentStore>, inspections: Arc<InspectionService>) -> Self {
        Self { store, inspections }
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Appointment>> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(AppError::BadRequest(format!(
                    "Invalid range: {} is after {}",
                    from, to
                )));
            }
        }
        self.store.list_for_user(user.id(), from, to).await
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Appointment> {
        match self.store.get(id).await? {
            Some(appointment) if user.owns(appointment.user_id) => Ok(appointment),
            _ => Err(AppError::NotFound(format!("Appointment {} not found", id))),
        }
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        fields: AppointmentFields,
    ) -> Result<Appointment> {
        fields.validate().map_err(AppError::from_validation)?;

        let appointment = self.store.create(user.id(), &fields).await?;
        tracing::info!(
            "Appointment created: {} on {} at {} by user {}",
            appointment.id,
            appointment.date,
            appointment.heure,
            user.id()
        );
        Ok(appointment)
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        fields: AppointmentFields,
    ) -> Result<Appointment> {
        fields.validate().map_err(AppError::from_validation)?;

        let appointment = self.get(user, id).await?;
        if appointment.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Appointment {} is {} and can no longer be modified",
                id, appointment.status
            )));
        }
        self.store.update(id, &fields).await
    }

    pub async fn change_status(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment> {
        let appointment = self.get(user, id).await?;
        if !appointment.status.can_transition_to(status) {
            return Err(AppError::Conflict(format!(
                "Appointment {} cannot go from {} to {}",
                id, appointment.status, status
            )));
        }

        let updated = self.store.set_status(id, status).await?;
        tracing::info!("Appointment {} is now {}", id, status);
        Ok(updated)
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: Uuid) -> Result<()> {
        self.get(user, id).await?;
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(format!("Appointment {} not found", id)));
        }
        tracing::info!("Appointment {} deleted", id);
        Ok(())
    }

    /// Start an inspection from the appointment and mark the appointment done.
    /// The appointment is claimed first so only one conversion can win. If the
    /// inspection cannot be created or linked, the claim is released.
    pub async fn convert(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<(Appointment, InspectionRecord)> {
        let appointment = self.get(user, id).await?;
        let fields = appointment.inspection_fields()?;
        if self.store.claim_for_conversion(id).await?.is_none() {
            return Err(AppError::Conflict(format!(
                "Appointment {} is no longer planned and cannot be converted",
                id
            )));
        }

        let inspection = match self.inspections.create(user, fields, Some(id)).await {
            Ok(inspection) => inspection,
            Err(e) => {
                self.release_claim(id, appointment.status).await;
                return Err(e);
            }
        };

        match self.store.attach_inspection(id, inspection.id).await {
            Ok(updated) => {
                tracing::info!("Appointment {} converted into inspection {}", id, inspection.id);
                Ok((updated, inspection))
            }
            Err(e) => {
                tracing::error!(
                    "Failed to link appointment {} to inspection {}: {:?}",
                    id,
                    inspection.id,
                    e
                );
                if let Err(cleanup) = self.inspections.delete(user, inspection.id).await {
                    tracing::warn!(
                        "Orphan inspection {} left behind: {:?}",
                        inspection.id,
                        cleanup
                    );
                }
                self.release_claim(id, appointment.status).await;
                Err(e)
            }
        }
    }

    async fn release_claim(&self, id: Uuid, previous: AppointmentStatus) {
        if let Err(e) = self.store.set_status(id, previous).await {
            tracing::warn!(
                "Appointment {} left as realise after a failed conversion: {:?}",
                id,
                e
            );
        }
    }
}
