//! Error codes for the directory auth API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code is SCREAMING_SNAKE_CASE and maps 1:1 to the string that
//! appears in the `code` field of a problem-details response.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Credentials rejected or no matching user
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// Directory returned no users
    NoUsers,

    // Request Validation
    InvalidEmail,
    InvalidPassword,
    InvalidProfile,
    InvalidRadius,
    InvalidCoordinates,
    /// Caller has no tracked position and gave no reference point
    MissingReferencePoint,
    ValidationError,
    BadRequest,

    // External data service
    BackendFailure,
    BackendTimeout,

    // System
    InternalError,
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::NoUsers => "NO_USERS",

            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::InvalidProfile => "INVALID_PROFILE",
            Self::InvalidRadius => "INVALID_RADIUS",
            Self::InvalidCoordinates => "INVALID_COORDINATES",
            Self::MissingReferencePoint => "MISSING_REFERENCE_POINT",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::BackendFailure => "BACKEND_FAILURE",
            Self::BackendTimeout => "BACKEND_TIMEOUT",

            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::Unauthorized.as_str(), "UNAUTHORIZED");
        assert_eq!(
            ErrorCode::UnauthorizedMissingBearer.as_str(),
            "UNAUTHORIZED_MISSING_BEARER"
        );
        assert_eq!(ErrorCode::NoUsers.as_str(), "NO_USERS");
        assert_eq!(ErrorCode::InvalidRadius.as_str(), "INVALID_RADIUS");
        assert_eq!(
            ErrorCode::MissingReferencePoint.as_str(),
            "MISSING_REFERENCE_POINT"
        );
        assert_eq!(ErrorCode::BackendFailure.as_str(), "BACKEND_FAILURE");
        assert_eq!(ErrorCode::ConfigError.as_str(), "CONFIG_ERROR");
    }

    #[test]
    fn test_display_trait() {
        assert_eq!(format!("{}", ErrorCode::Unauthorized), "UNAUTHORIZED");
        assert_eq!(format!("{}", ErrorCode::BackendTimeout), "BACKEND_TIMEOUT");
    }
}
