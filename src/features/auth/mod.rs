mod jwks;
mod validator;

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;
pub mod session;

pub use self::jwks::JwksClient;
pub use self::session::SessionManager;
pub use self::validator::{JwtValidator, KeySource};
