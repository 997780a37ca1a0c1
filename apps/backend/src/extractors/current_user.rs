use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use crate::auth::jwt::AccessClaims;
use crate::error::AppError;
use crate::extractors::auth_token::AuthToken;
use crate::logging::security;
use crate::state::app_state::AppState;

/// The authenticated caller, taken from a verified bearer token.
///
/// Only the signature and expiry are checked here; operations that issue a
/// new token confirm the caller still exists in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub claims: AccessClaims,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        std::future::ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    let bearer = AuthToken::from_http_request(req)?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState missing from request"))?;

    let claims = state.auth.tokens().verify(&bearer.token).inspect_err(|e| {
        security::token_rejected(e.code().as_str());
    })?;

    Ok(CurrentUser {
        id: claims.sub.clone(),
        claims,
    })
}
