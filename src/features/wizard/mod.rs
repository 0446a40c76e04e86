//! Inspection wizard.
//!
//! Steps in order: General, Meters, Rooms, Keys, Private areas, Other
//! equipment, Energy equipment, Heating equipment, Finalize. The position
//! is stored on the inspection (`current_step`) so a wizard can be resumed.

pub mod dtos;
pub mod general_step;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod saveable;
pub mod services;
pub mod state;

pub use services::WizardService;
