use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::photos::PhotoAttachment;
use crate::features::steps::entity::{ChildRecord, StepEntity};

#[cfg(test)]
mod fake;
mod postgres;

#[cfg(test)]
pub use fake::FakeChildStore;
pub use postgres::PgChildStore;

/// Rows of one child table
#[async_trait]
pub trait ChildStore<E: StepEntity>: Send + Sync {
    /// Oldest first, the order entries were added in
    async fn list(&self, inspection_id: Uuid) -> Result<Vec<ChildRecord<E>>>;

    async fn get(&self, id: Uuid) -> Result<Option<ChildRecord<E>>>;

    async fn insert(
        &self,
        inspection_id: Uuid,
        details: &E,
        photos: &[PhotoAttachment],
    ) -> Result<ChildRecord<E>>;

    async fn update(
        &self,
        id: Uuid,
        details: &E,
        photos: &[PhotoAttachment],
    ) -> Result<ChildRecord<E>>;

    async fn delete(&self, id: Uuid) -> Result<bool>;
}
