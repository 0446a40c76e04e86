mod photo;

pub use photo::{LocalPhoto, PhotoAttachment, PhotoCategory, PhotoPhase};
