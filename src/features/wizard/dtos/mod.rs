mod wizard_dto;

pub use wizard_dto::*;
