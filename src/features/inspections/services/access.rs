use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::inspections::models::InspectionRecord;
use crate::features::inspections::stores::InspectionStore;

/// Fetch an inspection the caller owns. Someone else's record reads as missing.
pub async fn load_owned(
    store: &dyn InspectionStore,
    user: &AuthenticatedUser,
    id: Uuid,
) -> Result<InspectionRecord> {
    match store.get(id).await? {
        Some(record) if user.owns(record.user_id) => Ok(record),
        _ => Err(missing(id)),
    }
}

pub fn missing(id: Uuid) -> AppError {
    AppError::NotFound(format!("Inspection {} not found", id))
}

/// Rejection for any write aimed at a finalised inspection
pub fn finalised(id: Uuid) -> AppError {
    AppError::Conflict(format!(
        "Inspection {} is finalised and can no longer be modified",
        id
    ))
}

/// A finalised inspection no longer accepts changes
pub fn ensure_editable(record: &InspectionRecord) -> Result<()> {
    if record.is_finalised() {
        return Err(finalised(record.id));
    }
    Ok(())
}

pub async fn load_editable(
    store: &dyn InspectionStore,
    user: &AuthenticatedUser,
    id: Uuid,
) -> Result<InspectionRecord> {
    let record = load_owned(store, user, id).await?;
    ensure_editable(&record)?;
    Ok(record)
}
