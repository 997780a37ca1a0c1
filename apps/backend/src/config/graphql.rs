//! Connection settings for the GraphQL user store.

use std::str::FromStr;
use std::time::Duration;

use crate::AppError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// GraphQL scalar of the store's `user.id` column. Lookups by id declare
/// their variable with this type, so it has to match the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserIdType {
    #[default]
    Uuid,
    Text,
    Int,
    Bigint,
}

impl UserIdType {
    pub const fn as_graphql(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Text => "String",
            Self::Int => "Int",
            Self::Bigint => "bigint",
        }
    }

    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Bigint)
    }
}

impl FromStr for UserIdType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uuid" => Ok(Self::Uuid),
            "string" | "text" => Ok(Self::Text),
            "int" => Ok(Self::Int),
            "bigint" => Ok(Self::Bigint),
            other => Err(AppError::config(format!(
                "GRAPHQL_USER_ID_TYPE must be one of uuid, text, int, bigint; got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphQLConfig {
    /// Full URL of the GraphQL endpoint, e.g. `https://store.example/v1/graphql`
    pub endpoint: String,
    /// Sent as `x-hasura-admin-secret` when present
    pub admin_secret: Option<String>,
    pub timeout: Duration,
    pub user_id_type: UserIdType,
}

impl GraphQLConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            admin_secret: None,
            timeout: DEFAULT_TIMEOUT,
            user_id_type: UserIdType::default(),
        }
    }

    pub fn with_admin_secret(mut self, secret: impl Into<String>) -> Self {
        self.admin_secret = Some(secret.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_id_type(mut self, id_type: UserIdType) -> Self {
        self.user_id_type = id_type;
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(AppError::config(format!(
                "GraphQL endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }
        if self.timeout.is_zero() {
            return Err(AppError::config("GraphQL timeout must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_urls() {
        assert!(GraphQLConfig::new("http://localhost:8080/v1/graphql")
            .validate()
            .is_ok());
        assert!(GraphQLConfig::new("https://store.example/v1/graphql")
            .with_admin_secret("s3cret")
            .validate()
            .is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_zero_timeout() {
        assert!(GraphQLConfig::new("ftp://store.example").validate().is_err());
        assert!(GraphQLConfig::new("").validate().is_err());
        assert!(GraphQLConfig::new("http://localhost")
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn user_id_types_parse() {
        assert_eq!("UUID".parse::<UserIdType>().unwrap(), UserIdType::Uuid);
        assert_eq!("text".parse::<UserIdType>().unwrap().as_graphql(), "String");
        assert!("bigint".parse::<UserIdType>().unwrap().is_numeric());
        assert!("float".parse::<UserIdType>().is_err());
    }
}
