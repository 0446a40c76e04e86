//! Inspections (états des lieux).
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/inspections` | List the caller's inspections |
//! | POST | `/api/inspections` | Start an inspection |
//! | GET | `/api/inspections/{id}` | Get one inspection |
//! | PUT | `/api/inspections/{id}` | Update general details |
//! | DELETE | `/api/inspections/{id}` | Delete with children and photos |
//! | PUT | `/api/inspections/{id}/signatures/{party}` | Save a signature |

pub mod dtos;
#[cfg(test)]
pub mod fixtures;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;

pub use services::{InspectionChildren, InspectionService};
pub use stores::{InspectionStore, PgInspectionStore};
