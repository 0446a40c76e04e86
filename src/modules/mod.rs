//! Infrastructure clients used by the features

pub mod storage;
