use async_trait::async_trait;

use super::models::WizardStep;
use crate::core::error::Result;

/// A wizard page that can persist what the agent entered on it.
///
/// Only the wizard calls `save`. Validation failures return before any
/// upload or write, and a failed save leaves local state retryable.
#[async_trait]
pub trait Saveable: Send {
    fn step(&self) -> WizardStep;

    async fn save(&mut self) -> Result<()>;
}
