//! Team members of an account.
//!
//! An employee may carry a password, required when selecting them as the
//! agent performing an inspection. Only its argon2 hash is stored.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/team` | List employees |
//! | POST | `/api/team` | Add an employee |
//! | GET | `/api/team/{id}` | Get one employee |
//! | PUT | `/api/team/{id}` | Update an employee |
//! | DELETE | `/api/team/{id}` | Remove an employee |
//! | POST | `/api/team/{id}/verify` | Check an employee password |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;
pub mod services;

pub use services::EmployeeService;
