pub mod appointments;
pub mod auth;
pub mod employees;
pub mod inspections;
pub mod photos;
pub mod profiles;
pub mod steps;
pub mod wizard;
