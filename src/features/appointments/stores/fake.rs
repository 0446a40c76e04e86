use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use super::AppointmentStore;
use crate::core::error::{AppError, Result};
use crate::features::appointments::models::{Appointment, AppointmentFields, AppointmentStatus};

#[derive(Default)]
pub struct FakeAppointmentStore {
    rows: Mutex<HashMap<Uuid, Appointment>>,
    pub fail_attach: AtomicBool,
}

impl FakeAppointmentStore {
    pub fn snapshot(&self, id: Uuid) -> Option<Appointment> {
        self.rows.lock().unwrap().get(&id).cloned()
    }

    fn modify<F>(&self, id: Uuid, apply: F) -> Result<Appointment>
    where
        F: FnOnce(&mut Appointment),
    {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))?;
        apply(row);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

fn apply_fields(row: &mut Appointment, f: &AppointmentFields) {
    row.date = f.date;
    row.heure = f.heure.clone();
    row.duree_minutes = f.duree_minutes;
    row.adresse = f.adresse.clone();
    row.code_postal = f.code_postal.clone();
    row.ville = f.ville.clone();
    row.type_etat_des_lieux = f.type_etat_des_lieux;
    row.type_bien = f.type_bien.clone();
    row.contact_nom = f.contact_nom.clone();
    row.contact_telephone = f.contact_telephone.clone();
    row.contact_email = f.contact_email.clone();
    row.notes = f.notes.clone();
}

#[async_trait]
impl AppointmentStore for FakeAppointmentStore {
    async fn list_for_user(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Appointment>> {
        let mut rows: Vec<Appointment> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|a| a.user_id == user_id)
            .filter(|a| from.is_none_or(|from| a.date >= from))
            .filter(|a| to.is_none_or(|to| a.date <= to))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (a.date, &a.heure).cmp(&(b.date, &b.heure)));
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>> {
        Ok(self.snapshot(id))
    }

    async fn create(&self, user_id: Uuid, fields: &AppointmentFields) -> Result<Appointment> {
        let now = Utc::now();
        let mut row = Appointment {
            id: Uuid::new_v4(),
            user_id,
            date: fields.date,
            heure: String::new(),
            duree_minutes: 0,
            adresse: String::new(),
            code_postal: None,
            ville: None,
            type_etat_des_lieux: fields.type_etat_des_lieux,
            type_bien: String::new(),
            contact_nom: None,
            contact_telephone: None,
            contact_email: None,
            notes: None,
            status: AppointmentStatus::Planifie,
            etat_des_lieux_id: None,
            created_at: now,
            updated_at: now,
        };
        apply_fields(&mut row, fields);
        self.rows.lock().unwrap().insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, fields: &AppointmentFields) -> Result<Appointment> {
        self.modify(id, |row| apply_fields(row, fields))
    }

    async fn set_status(&self, id: Uuid, status: AppointmentStatus) -> Result<Appointment> {
        self.modify(id, |row| row.status = status)
    }

    async fn claim_for_conversion(&self, id: Uuid) -> Result<Option<Appointment>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .get_mut(&id)
            .filter(|row| {
                matches!(
                    row.status,
                    AppointmentStatus::Planifie | AppointmentStatus::Reporte
                )
            })
            .map(|row| {
                row.status = AppointmentStatus::Realise;
                row.updated_at = Utc::now();
                row.clone()
            }))
    }

    async fn attach_inspection(&self, id: Uuid, etat_des_lieux_id: Uuid) -> Result<Appointment> {
        if self.fail_attach.load(Ordering::SeqCst) {
            return Err(AppError::Internal("simulated database failure".to_string()));
        }
        self.modify(id, |row| row.etat_des_lieux_id = Some(etat_des_lieux_id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.rows.lock().unwrap().remove(&id).is_some())
    }
}
