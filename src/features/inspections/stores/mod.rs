use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::inspections::models::{
    FinalizeUpdate, GeneralFields, InspectionRecord, NewInspection, Signature, SignatureParty,
};
use crate::features::photos::PhotoAttachment;

#[cfg(test)]
mod fake;
mod postgres;

#[cfg(test)]
pub use fake::FakeInspectionStore;
pub use postgres::PgInspectionStore;

/// Persistence of `etats_des_lieux` rows. Ownership checks live in the
/// services, stores only read and write.
#[async_trait]
pub trait InspectionStore: Send + Sync {
    /// Newest first, with the total count for pagination
    async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<InspectionRecord>, i64)>;

    async fn get(&self, id: Uuid) -> Result<Option<InspectionRecord>>;

    async fn create(&self, new: NewInspection) -> Result<InspectionRecord>;

    async fn update_general(
        &self,
        id: Uuid,
        fields: &GeneralFields,
        photos: &[PhotoAttachment],
    ) -> Result<InspectionRecord>;

    async fn set_current_step(&self, id: Uuid, step: i32) -> Result<()>;

    async fn set_signature(
        &self,
        id: Uuid,
        party: SignatureParty,
        signature: &Signature,
    ) -> Result<InspectionRecord>;

    async fn finalize(&self, id: Uuid, update: &FinalizeUpdate) -> Result<InspectionRecord>;

    /// Children go with the row through `ON DELETE CASCADE`
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
