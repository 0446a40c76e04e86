mod inspection_dto;

pub use inspection_dto::*;
