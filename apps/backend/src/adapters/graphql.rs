//! Minimal GraphQL-over-HTTP client for the user store.

use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::graphql::GraphQLConfig;
use crate::errors::domain::{BackendErrorKind, DomainError};
use crate::infra::graphql_errors::{map_graphql_errors, map_status, map_transport_err, GraphQLError};

pub const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQLRequest<'a, V> {
    query: &'a str,
    operation_name: &'a str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQLError>,
}

/// Shared client; cloning is cheap (the reqwest pool is reference counted).
#[derive(Debug, Clone)]
pub struct GraphQLClient {
    http: reqwest::Client,
    endpoint: String,
    admin_secret: Option<String>,
}

impl GraphQLClient {
    pub fn new(config: &GraphQLConfig) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("directory-auth/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DomainError::backend(
                    BackendErrorKind::Unavailable,
                    format!("failed to build HTTP client: {e}"),
                )
            })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            admin_secret: config.admin_secret.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one operation and decode its `data` member into `T`.
    ///
    /// `operation` must match the operation name declared in `query`.
    pub async fn execute<V, T>(
        &self,
        operation: &str,
        query: &str,
        variables: V,
    ) -> Result<T, DomainError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let started = Instant::now();
        let body = GraphQLRequest {
            query,
            operation_name: operation,
            variables,
        };

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(secret) = &self.admin_secret {
            request = request.header(ADMIN_SECRET_HEADER, secret);
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_transport_err(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_status(operation, status, &text));
        }

        let envelope: GraphQLResponse<T> = response
            .json()
            .await
            .map_err(|e| map_transport_err(operation, e))?;

        debug!(
            operation,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "GraphQL operation completed"
        );

        if !envelope.errors.is_empty() {
            return Err(map_graphql_errors(operation, &envelope.errors));
        }
        envelope.data.ok_or_else(|| {
            DomainError::backend(
                BackendErrorKind::InvalidResponse,
                format!("{operation}: response carried neither data nor errors"),
            )
        })
    }
}
