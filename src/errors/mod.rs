//! Error handling for the "200" engine.

pub mod domain;
pub mod error_code;

pub use domain::{DomainError, ErrorKind};
pub use error_code::ErrorCode;
