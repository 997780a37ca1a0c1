//! Domain-level error type used across services and adapters.
//!
//! This error type is HTTP-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! using the `From<DomainError> for AppError` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Coarse classification of every domain failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    MalformedDigest,
    NotFound,
    Unauthorized,
    BackendFailure,
    SigningError,
    Internal,
}

/// Which piece of input failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputField {
    Email,
    Password,
    Profile,
    Radius,
    Coordinates,
    ReferencePoint,
    Other,
}

/// Failure modes of the external data service
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BackendErrorKind {
    Timeout,
    Unavailable,
    /// The service answered but refused the operation (constraint, permission)
    Rejected,
    /// The service answered with a payload we could not interpret
    InvalidResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    User,
    Users,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    InvalidInput(InputField, String),
    MalformedDigest(String),
    NotFound(NotFoundKind, String),
    Unauthorized(String),
    Backend(BackendErrorKind, String),
    Signing(String),
    /// Worker panics and other failures that are nobody's input
    Internal(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::InvalidInput(field, d) => write!(f, "invalid input {field:?}: {d}"),
            DomainError::MalformedDigest(d) => write!(f, "malformed digest: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Unauthorized(d) => write!(f, "unauthorized: {d}"),
            DomainError::Backend(kind, d) => write!(f, "backend {kind:?}: {d}"),
            DomainError::Signing(d) => write!(f, "signing error: {d}"),
            DomainError::Internal(d) => write!(f, "internal error: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn invalid_input(field: InputField, detail: impl Into<String>) -> Self {
        Self::InvalidInput(field, detail.into())
    }
    pub fn malformed_digest(detail: impl Into<String>) -> Self {
        Self::MalformedDigest(detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::Unauthorized(detail.into())
    }
    pub fn backend(kind: BackendErrorKind, detail: impl Into<String>) -> Self {
        Self::Backend(kind, detail.into())
    }
    pub fn signing(detail: impl Into<String>) -> Self {
        Self::Signing(detail.into())
    }
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal(detail.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidInput(..) => ErrorKind::InvalidInput,
            DomainError::MalformedDigest(_) => ErrorKind::MalformedDigest,
            DomainError::NotFound(..) => ErrorKind::NotFound,
            DomainError::Unauthorized(_) => ErrorKind::Unauthorized,
            DomainError::Backend(..) => ErrorKind::BackendFailure,
            DomainError::Signing(_) => ErrorKind::SigningError,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
    }
}
