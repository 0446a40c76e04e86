mod collection_step;
mod step_service;

pub use collection_step::CollectionStep;
pub use step_service::{EntityDraft, StepService};
