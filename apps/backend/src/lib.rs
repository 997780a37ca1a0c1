#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod geo;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod web;

// Re-exports for public API
pub use adapters::{GraphQLUserRepository, InMemoryUserRepository};
pub use auth::jwt::{mint_access_token, verify_access_token, AccessClaims, TokenIssuer};
pub use auth::{Claims, CredentialHasher, CredentialHashing, HashCost};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode, ErrorKind};
pub use extractors::{AuthToken, CurrentUser, ValidatedJson};
pub use geo::{distance_km, near, Coordinates};
pub use infra::state::build_state;
pub use middleware::{RequestTrace, StructuredLogger, TraceSpan};
pub use repos::UserRepository;
pub use services::AuthService;
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
