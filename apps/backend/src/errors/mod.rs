//! Error handling for the directory auth backend.

pub mod domain;
pub mod error_code;

pub use domain::{DomainError, ErrorKind};
pub use error_code::ErrorCode;
