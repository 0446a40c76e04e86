use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::appointments::models::{Appointment, AppointmentFields, AppointmentStatus};

#[cfg(test)]
mod fake;
mod postgres;

#[cfg(test)]
pub use fake::FakeAppointmentStore;
pub use postgres::PgAppointmentStore;

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Ordered by date then time. Bounds are inclusive.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Appointment>>;

    async fn get(&self, id: Uuid) -> Result<Option<Appointment>>;

    async fn create(&self, user_id: Uuid, fields: &AppointmentFields) -> Result<Appointment>;

    async fn update(&self, id: Uuid, fields: &AppointmentFields) -> Result<Appointment>;

    async fn set_status(&self, id: Uuid, status: AppointmentStatus) -> Result<Appointment>;

    /// Atomically moves a `planifie` or `reporte` appointment to `realise`.
    /// `None` when it is missing or no longer convertible.
    async fn claim_for_conversion(&self, id: Uuid) -> Result<Option<Appointment>>;

    async fn attach_inspection(&self, id: Uuid, etat_des_lieux_id: Uuid) -> Result<Appointment>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}
