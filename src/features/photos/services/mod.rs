mod photo_uploader;

pub use photo_uploader::{photo_extension, PhotoUploader};
