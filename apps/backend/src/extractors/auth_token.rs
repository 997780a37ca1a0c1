use actix_web::http::header;
use actix_web::HttpRequest;

use crate::logging::security;
use crate::AppError;

/// Raw bearer token from the `Authorization` header. Not yet verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub token: String,
}

impl AuthToken {
    /// Parse `Bearer <token>`; the scheme is case-insensitive.
    pub fn from_header_value(value: &str) -> Result<Self, AppError> {
        let mut parts = value.split_whitespace();
        let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(AppError::unauthorized_missing_bearer());
        };
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(AppError::unauthorized_missing_bearer());
        }
        Ok(Self {
            token: token.to_string(),
        })
    }

    pub fn from_http_request(req: &HttpRequest) -> Result<Self, AppError> {
        req.headers()
            .get(header::AUTHORIZATION)
            .ok_or_else(AppError::unauthorized_missing_bearer)
            .and_then(|value| {
                value
                    .to_str()
                    .map_err(|_| AppError::unauthorized_missing_bearer())
            })
            .and_then(AuthToken::from_header_value)
            .inspect_err(|_| security::token_rejected("missing_bearer"))
    }
}
