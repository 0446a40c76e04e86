//! Profile of the signed-in account.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/profile` | Current profile, empty if never saved |
//! | PUT | `/api/profile` | Create or replace the profile |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ProfileService;
