use std::collections::HashSet;

use directory_auth::errors::ErrorCode;

#[test]
fn error_codes_are_unique() {
    let all = [
        // Keep in sync with ErrorCode enum variants
        ErrorCode::Unauthorized,
        ErrorCode::UnauthorizedMissingBearer,
        ErrorCode::UnauthorizedInvalidJwt,
        ErrorCode::UnauthorizedExpiredJwt,
        ErrorCode::NoUsers,
        ErrorCode::InvalidEmail,
        ErrorCode::InvalidPassword,
        ErrorCode::InvalidProfile,
        ErrorCode::InvalidRadius,
        ErrorCode::InvalidCoordinates,
        ErrorCode::MissingReferencePoint,
        ErrorCode::ValidationError,
        ErrorCode::BadRequest,
        ErrorCode::BackendFailure,
        ErrorCode::BackendTimeout,
        ErrorCode::InternalError,
        ErrorCode::ConfigError,
    ];

    let mut seen = HashSet::new();
    for code in all {
        let s = code.as_str();
        assert!(seen.insert(s), "Duplicate error code string: {s}");
        assert!(
            s.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
            "Not SCREAMING_SNAKE_CASE: {s}"
        );
    }
}
