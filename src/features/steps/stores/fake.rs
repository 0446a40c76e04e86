use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::ChildStore;
use crate::core::error::{AppError, Result};
use crate::features::inspections::services::{finalised, missing};
use crate::features::inspections::stores::FakeInspectionStore;
use crate::features::photos::PhotoAttachment;
use crate::features::steps::entity::{ChildRecord, StepEntity};

/// In-memory child table, rows kept in insertion order.
/// With `parents` set, writes follow the parent's status like the SQL guards.
pub struct FakeChildStore<E> {
    rows: Mutex<Vec<ChildRecord<E>>>,
    parents: Option<Arc<FakeInspectionStore>>,
    pub inserts: AtomicU64,
    pub updates: AtomicU64,
    pub fail_writes: AtomicBool,
}

impl<E> Default for FakeChildStore<E> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            parents: None,
            inserts: AtomicU64::new(0),
            updates: AtomicU64::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }
}

impl<E: StepEntity> FakeChildStore<E> {
    pub fn tracking(parents: Arc<FakeInspectionStore>) -> Self {
        Self {
            parents: Some(parents),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_parent(&self, inspection_id: Uuid) -> Result<()> {
        match self.parents.as_ref().map(|p| p.is_editable(inspection_id)) {
            Some(Some(false)) => Err(finalised(inspection_id)),
            Some(None) => Err(missing(inspection_id)),
            _ => Ok(()),
        }
    }

    fn parent_of(&self, id: Uuid) -> Option<Uuid> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.inspection_id)
    }

    fn check_writes(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("simulated database failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl<E: StepEntity> ChildStore<E> for FakeChildStore<E> {
    async fn list(&self, inspection_id: Uuid) -> Result<Vec<ChildRecord<E>>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.inspection_id == inspection_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ChildRecord<E>>> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn insert(
        &self,
        inspection_id: Uuid,
        details: &E,
        photos: &[PhotoAttachment],
    ) -> Result<ChildRecord<E>> {
        self.check_writes()?;
        self.check_parent(inspection_id)?;
        let now = Utc::now();
        let record = ChildRecord {
            id: Uuid::new_v4(),
            inspection_id,
            details: details.clone(),
            photos: photos.to_vec(),
            created_at: now,
            updated_at: now,
        };
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        details: &E,
        photos: &[PhotoAttachment],
    ) -> Result<ChildRecord<E>> {
        self.check_writes()?;
        if let Some(parent) = self.parent_of(id) {
            self.check_parent(parent)?;
        }
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", E::LABEL, id)))?;
        record.details = details.clone();
        record.photos = photos.to_vec();
        record.updated_at = Utc::now();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.check_writes()?;
        if let Some(parent) = self.parent_of(id) {
            self.check_parent(parent)?;
        }
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() != before)
    }
}
