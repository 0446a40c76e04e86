//! Photo attachments shared by the inspection and its step entities

pub mod dtos;
pub mod lifecycle;
pub mod models;
pub mod multipart;
pub mod services;

pub use lifecycle::PhotoSet;
pub use models::{LocalPhoto, PhotoAttachment, PhotoCategory};
pub use services::PhotoUploader;
