use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::photos::{PhotoAttachment, PhotoCategory};
use crate::features::wizard::models::WizardStep;

/// A child entity of an inspection edited on one wizard step.
///
/// Typed fields are stored in the `details` JSONB column of `TABLE`.
pub trait StepEntity:
    Serialize + DeserializeOwned + Validate + Clone + Debug + PartialEq + Send + Sync + 'static
{
    /// Table holding the rows
    const TABLE: &'static str;
    /// URL segment under `/api/inspections/{id}/` and `/api/`
    const SEGMENT: &'static str;
    const STEP: WizardStep;
    /// Human readable name for logs and messages
    const LABEL: &'static str;

    fn photo_category(&self) -> PhotoCategory;
}

/// A persisted child entity as confirmed by the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChildRecord<E> {
    pub id: Uuid,
    pub inspection_id: Uuid,
    pub details: E,
    pub photos: Vec<PhotoAttachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
