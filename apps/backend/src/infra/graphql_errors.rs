//! reqwest / GraphQL -> DomainError translation helpers.
//!
//! The GraphQL adapter returns raw transport and protocol failures; they are
//! classified here so the service only ever sees `DomainError::Backend`.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{error, warn};

use crate::errors::domain::{BackendErrorKind, DomainError};
use crate::logging::pii::{redact, Redacted};
use crate::web::trace_ctx;

/// One entry of a GraphQL `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphQLErrorExtensions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl GraphQLError {
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.code.as_deref()
    }
}

/// Classify a transport-level failure.
pub fn map_transport_err(operation: &str, e: reqwest::Error) -> DomainError {
    let trace_id = trace_ctx::trace_id();
    let raw = e.to_string();

    if e.is_timeout() {
        warn!(trace_id = %trace_id, operation, raw_error = %Redacted(&raw), "User store timed out");
        return DomainError::backend(
            BackendErrorKind::Timeout,
            format!("{operation}: user store did not answer in time"),
        );
    }
    if e.is_decode() {
        warn!(trace_id = %trace_id, operation, raw_error = %Redacted(&raw), "Undecodable user store response");
        return DomainError::backend(
            BackendErrorKind::InvalidResponse,
            format!("{operation}: response body could not be decoded"),
        );
    }
    if e.is_connect() {
        warn!(trace_id = %trace_id, operation, raw_error = %Redacted(&raw), "User store unreachable");
        return DomainError::backend(
            BackendErrorKind::Unavailable,
            format!("{operation}: user store unreachable"),
        );
    }

    error!(trace_id = %trace_id, operation, raw_error = %Redacted(&raw), "Unhandled transport error");
    DomainError::backend(
        BackendErrorKind::Unavailable,
        format!("{operation}: request to user store failed"),
    )
}

/// Classify a non-2xx HTTP status from the store.
pub fn map_status(operation: &str, status: StatusCode, body: &str) -> DomainError {
    let trace_id = trace_ctx::trace_id();
    warn!(
        trace_id = %trace_id,
        operation,
        status = status.as_u16(),
        body = %Redacted(body),
        "User store answered with an error status"
    );

    let kind = if status == StatusCode::GATEWAY_TIMEOUT || status == StatusCode::REQUEST_TIMEOUT {
        BackendErrorKind::Timeout
    } else if status.is_server_error() {
        BackendErrorKind::Unavailable
    } else {
        BackendErrorKind::Rejected
    };
    DomainError::backend(kind, format!("{operation}: user store returned HTTP {status}"))
}

/// Classify a non-empty GraphQL `errors` array.
pub fn map_graphql_errors(operation: &str, errors: &[GraphQLError]) -> DomainError {
    let trace_id = trace_ctx::trace_id();
    let summary = errors
        .iter()
        .map(|e| match e.code() {
            Some(code) => format!("[{code}] {}", e.message),
            None => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ");

    warn!(trace_id = %trace_id, operation, errors = %Redacted(&summary), "User store rejected the operation");

    if errors.iter().any(|e| e.code() == Some("constraint-violation")) {
        return DomainError::backend(
            BackendErrorKind::Rejected,
            format!("{operation}: uniqueness or constraint violation"),
        );
    }
    DomainError::backend(
        BackendErrorKind::Rejected,
        format!("{operation}: {}", redact(&summary)),
    )
}
