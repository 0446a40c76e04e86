//! Wizard state machine.
//!
//! The wizard owns the current step and the notifications. Saving is
//! delegated to the active `Saveable`; `next` only advances once that save
//! succeeded. `&mut self` keeps a second transition from starting while
//! one is running.

use chrono::NaiveDate;

use super::dtos::FinalizeRequestDto;
use super::models::{Notification, WizardStep};
use super::saveable::Saveable;
use crate::core::error::{AppError, Result};
use crate::features::inspections::models::{FinalizeUpdate, InspectionRecord, TypeEtatDesLieux};

#[derive(Debug, Clone)]
pub struct Wizard {
    current: WizardStep,
    notifications: Vec<Notification>,
}

impl Wizard {
    pub fn new(current: WizardStep) -> Self {
        Self {
            current,
            notifications: Vec::new(),
        }
    }

    pub fn current(&self) -> WizardStep {
        self.current
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Save the active step and move to the following one
    pub async fn next(&mut self, step: &mut dyn Saveable) -> Result<WizardStep> {
        if step.step() != self.current {
            return Err(AppError::Conflict(format!(
                "Step '{}' is not the active step '{}'",
                step.step().title(),
                self.current.title()
            )));
        }
        let Some(following) = self.current.next() else {
            return Err(AppError::BadRequest(
                "The last step is completed by finalizing the inspection".to_string(),
            ));
        };

        match step.save().await {
            Ok(()) => {
                self.notify(Notification::success(format!(
                    "{} enregistré",
                    self.current.title()
                )));
                self.current = following;
                Ok(self.current)
            }
            Err(e) => {
                self.notify(Notification::error(format!(
                    "{} : {}",
                    self.current.title(),
                    e
                )));
                Err(e)
            }
        }
    }

    /// Go back one step without saving
    pub fn previous(&mut self) -> WizardStep {
        if let Some(previous) = self.current.previous() {
            self.current = previous;
        }
        self.current
    }

    /// Check the finalization rules and compute the columns to write
    pub fn prepare_finalize(
        &self,
        record: &InspectionRecord,
        request: &FinalizeRequestDto,
        today: NaiveDate,
    ) -> Result<FinalizeUpdate> {
        if record.is_finalised() {
            return Err(AppError::Conflict(format!(
                "Inspection {} is already finalised",
                record.id
            )));
        }
        if self.current != WizardStep::Finalize {
            return Err(AppError::Conflict(format!(
                "Finalization is only possible on the last step, current step is '{}'",
                self.current.title()
            )));
        }

        let mut missing = Vec::new();
        if !request.confirmed {
            missing.push("confirmed: The inspection must be confirmed".to_string());
        }
        if !request.confirmed_again {
            missing.push("confirmed_again: The confirmation dialog must be accepted".to_string());
        }
        if record.signature_bailleur.is_none() {
            missing.push("signature_bailleur: Landlord signature is required".to_string());
        }
        if record.signature_locataire.is_none() {
            missing.push("signature_locataire: Tenant signature is required".to_string());
        }
        let description = request
            .description_travaux
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        if request.travaux_a_faire && description.is_none() {
            missing.push("description_travaux: Describe the work to be done".to_string());
        }
        if !missing.is_empty() {
            return Err(AppError::InvalidFields(missing));
        }

        let date_sortie = match record.date_sortie {
            Some(existing) if request.preserve_date_sortie => existing,
            _ => today,
        };
        let date_entree = match record.type_etat_des_lieux {
            TypeEtatDesLieux::Entree => record.date_entree.or(Some(today)),
            TypeEtatDesLieux::Sortie => record.date_entree,
        };

        Ok(FinalizeUpdate {
            date_entree,
            date_sortie: Some(date_sortie),
            travaux_a_faire: request.travaux_a_faire,
            description_travaux: if request.travaux_a_faire { description } else { None },
        })
    }
}
