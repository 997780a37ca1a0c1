//! Process settings read from the environment.
//!
//! | variable               | default    |
//! |------------------------|------------|
//! | `BACKEND_HOST`         | `0.0.0.0`  |
//! | `PORT`                 | `3000`     |
//! | `GRAPHQL_ENDPOINT`     | required   |
//! | `GRAPHQL_ADMIN_SECRET` | unset      |
//! | `GRAPHQL_TIMEOUT_SECS` | `10`       |
//! | `GRAPHQL_USER_ID_TYPE` | `uuid`     |
//! | `JWT_SECRET`           | required   |
//! | `TOKEN_TTL_SECS`       | `3600`     |
//! | `LOG_FORMAT`           | `json`     |
//!
//! Tests go through [`Settings::from_lookup`] so they never touch the real
//! process environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::config::graphql::{GraphQLConfig, DEFAULT_TIMEOUT};
use crate::state::security_config::{SecurityConfig, DEFAULT_TOKEN_TTL};
use crate::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(AppError::config(format!(
                "LOG_FORMAT must be 'json' or 'pretty', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub graphql: GraphQLConfig,
    pub security: SecurityConfig,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("BACKEND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var("PORT") {
            Some(raw) => parse_var::<u16>("PORT", &raw)?,
            None => DEFAULT_PORT,
        };

        let endpoint = var("GRAPHQL_ENDPOINT").ok_or_else(|| missing("GRAPHQL_ENDPOINT"))?;
        let timeout = match var("GRAPHQL_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_var::<u64>("GRAPHQL_TIMEOUT_SECS", &raw)?),
            None => DEFAULT_TIMEOUT,
        };
        let mut graphql = GraphQLConfig::new(endpoint.trim()).with_timeout(timeout);
        if let Some(secret) = var("GRAPHQL_ADMIN_SECRET") {
            graphql = graphql.with_admin_secret(secret);
        }
        if let Some(raw) = var("GRAPHQL_USER_ID_TYPE") {
            graphql = graphql.with_user_id_type(raw.parse()?);
        }
        graphql.validate()?;

        let secret = var("JWT_SECRET").ok_or_else(|| missing("JWT_SECRET"))?;
        let ttl = match var("TOKEN_TTL_SECS") {
            Some(raw) => Duration::from_secs(parse_var::<u64>("TOKEN_TTL_SECS", &raw)?),
            None => DEFAULT_TOKEN_TTL,
        };
        let security = SecurityConfig::new(secret.into_bytes()).with_token_ttl(ttl);
        security
            .validate()
            .map_err(|e| AppError::config(e.to_string()))?;

        let log_format = match var("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            host,
            port,
            graphql,
            security,
            log_format,
        })
    }
}

fn missing(name: &str) -> AppError {
    AppError::config(format!("Required environment variable '{name}' is not set"))
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::config(format!("{name} has an invalid value '{raw}'")))
}
