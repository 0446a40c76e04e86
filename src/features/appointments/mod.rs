//! Appointments (rendez-vous) and their conversion into inspections.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/appointments?from=&to=` | Agenda of the caller |
//! | POST | `/api/appointments` | Plan an appointment |
//! | GET | `/api/appointments/{id}` | Get one appointment |
//! | PUT | `/api/appointments/{id}` | Edit a planned appointment |
//! | DELETE | `/api/appointments/{id}` | Delete an appointment |
//! | PATCH | `/api/appointments/{id}/status` | Change status |
//! | POST | `/api/appointments/{id}/inspection` | Start the inspection |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;

pub use services::AppointmentService;
pub use stores::{AppointmentStore, PgAppointmentStore};
