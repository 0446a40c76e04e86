mod photo_dto;

pub use photo_dto::{NewPhotoRefDto, PhotoSaveFormDto, UploadedFile, UploadedFiles};
