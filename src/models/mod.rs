//! Data models

pub mod access_point;

pub use access_point::*;
