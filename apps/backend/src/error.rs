use actix_web::error::ResponseError;
use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::errors::domain::{BackendErrorKind, DomainError, InputField, NotFoundKind};
use crate::errors::ErrorCode;
use crate::web::trace_ctx;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Unauthorized")]
    Unauthorized,
    #[error("UnauthorizedMissingBearer")]
    UnauthorizedMissingBearer,
    #[error("UnauthorizedInvalidJwt")]
    UnauthorizedInvalidJwt,
    #[error("UnauthorizedExpiredJwt")]
    UnauthorizedExpiredJwt,
    #[error("No users")]
    NoUsers,
    #[error("Backend error: {detail}")]
    Backend { detail: String },
    #[error("Backend timeout: {detail}")]
    BackendTimeout { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::BadRequest { code, .. } => *code,
            AppError::Unauthorized => ErrorCode::Unauthorized,
            AppError::UnauthorizedMissingBearer => ErrorCode::UnauthorizedMissingBearer,
            AppError::UnauthorizedInvalidJwt => ErrorCode::UnauthorizedInvalidJwt,
            AppError::UnauthorizedExpiredJwt => ErrorCode::UnauthorizedExpiredJwt,
            AppError::NoUsers => ErrorCode::NoUsers,
            AppError::Backend { .. } => ErrorCode::BackendFailure,
            AppError::BackendTimeout { .. } => ErrorCode::BackendTimeout,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Client-facing detail. Internal and backend details stay in the logs.
    fn detail(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::Unauthorized => "Invalid email or password".to_string(),
            AppError::UnauthorizedMissingBearer => "Missing or malformed Bearer token".to_string(),
            AppError::UnauthorizedInvalidJwt => "Invalid JWT".to_string(),
            AppError::UnauthorizedExpiredJwt => "Token expired".to_string(),
            AppError::NoUsers => "No users available".to_string(),
            AppError::Backend { .. } => "The user directory could not complete the request".to_string(),
            AppError::BackendTimeout { .. } => "The user directory did not respond in time".to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
            AppError::Config { .. } => "Service misconfigured".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized
            | AppError::UnauthorizedMissingBearer
            | AppError::UnauthorizedInvalidJwt
            | AppError::UnauthorizedExpiredJwt
            | AppError::NoUsers => StatusCode::UNAUTHORIZED,
            AppError::Backend { .. } => StatusCode::BAD_GATEWAY,
            AppError::BackendTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn unauthorized_missing_bearer() -> Self {
        Self::UnauthorizedMissingBearer
    }

    pub fn unauthorized_invalid_jwt() -> Self {
        Self::UnauthorizedInvalidJwt
    }

    pub fn unauthorized_expired_jwt() -> Self {
        Self::UnauthorizedExpiredJwt
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let lower = word.to_lowercase();
                let mut chars = lower.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn input_code(field: InputField) -> ErrorCode {
    match field {
        InputField::Email => ErrorCode::InvalidEmail,
        InputField::Password => ErrorCode::InvalidPassword,
        InputField::Profile => ErrorCode::InvalidProfile,
        InputField::Radius => ErrorCode::InvalidRadius,
        InputField::Coordinates => ErrorCode::InvalidCoordinates,
        InputField::ReferencePoint => ErrorCode::MissingReferencePoint,
        _ => ErrorCode::ValidationError,
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidInput(field, detail) => AppError::invalid(input_code(field), detail),
            // Unknown user and bad password must be indistinguishable.
            DomainError::NotFound(NotFoundKind::User, _) | DomainError::Unauthorized(_) => {
                AppError::Unauthorized
            }
            DomainError::NotFound(NotFoundKind::Users, _) => AppError::NoUsers,
            DomainError::Backend(BackendErrorKind::Timeout, detail) => {
                AppError::BackendTimeout { detail }
            }
            DomainError::Backend(_, detail) => AppError::Backend { detail },
            DomainError::MalformedDigest(detail) => {
                AppError::internal(format!("stored password digest unreadable: {detail}"))
            }
            DomainError::Signing(detail) => AppError::config(detail),
            DomainError::Internal(detail) => AppError::internal(detail),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str().to_string();
        let detail = self.detail();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            error!(trace_id = %trace_id, code = %code, error = %self, "request failed");
        }

        let problem_details = ProblemDetails {
            type_: format!("https://directory-auth.dev/errors/{code}"),
            title: Self::humanize_code(&code),
            status: status.as_u16(),
            detail,
            code,
            trace_id: trace_id.clone(),
        };

        let mut builder = HttpResponse::build(status);
        builder
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id));
        if status == StatusCode::UNAUTHORIZED {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(problem_details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_user_and_wrong_password_look_the_same() {
        let missing: AppError =
            DomainError::not_found(NotFoundKind::User, "no such email").into();
        let wrong: AppError = DomainError::unauthorized("password mismatch").into();

        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(missing.code(), wrong.code());
        assert_eq!(missing.detail(), wrong.detail());
    }

    #[test]
    fn backend_failures_are_not_401() {
        let rejected: AppError =
            DomainError::backend(BackendErrorKind::Rejected, "uniqueness violation").into();
        let timeout: AppError = DomainError::backend(BackendErrorKind::Timeout, "10s").into();

        assert_eq!(rejected.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(timeout.status(), StatusCode::GATEWAY_TIMEOUT);
        assert!(!rejected.detail().contains("uniqueness"));
    }

    #[test]
    fn input_errors_carry_field_codes() {
        let err: AppError = DomainError::invalid_input(InputField::Radius, "negative").into();
        assert_eq!(err.code(), ErrorCode::InvalidRadius);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn humanize_code_title_cases_words() {
        assert_eq!(AppError::humanize_code("NO_USERS"), "No Users");
        assert_eq!(
            AppError::humanize_code("UNAUTHORIZED_EXPIRED_JWT"),
            "Unauthorized Expired Jwt"
        );
    }

    #[actix_web::test]
    async fn unauthorized_response_has_bearer_challenge() {
        let resp = AppError::unauthorized().error_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        assert!(resp
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("application/problem+json"));
    }
}
