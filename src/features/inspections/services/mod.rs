mod access;
mod inspection_service;

pub use access::{ensure_editable, finalised, load_editable, load_owned, missing};
pub use inspection_service::{InspectionChildren, InspectionService};
