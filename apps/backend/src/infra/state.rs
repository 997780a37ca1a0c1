use std::sync::Arc;

use tracing::info;

use crate::adapters::graphql::GraphQLClient;
use crate::adapters::users_graphql::GraphQLUserRepository;
use crate::auth::jwt::TokenIssuer;
use crate::auth::password::{CredentialHasher, CredentialHashing, HashCost};
use crate::config::graphql::GraphQLConfig;
use crate::error::AppError;
use crate::repos::users::UserRepository;
use crate::services::auth::AuthService;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    repository: Option<Arc<dyn UserRepository>>,
    graphql: Option<GraphQLConfig>,
    hasher: Option<Arc<dyn CredentialHashing>>,
    hash_cost: HashCost,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            repository: None,
            graphql: None,
            hasher: None,
            hash_cost: HashCost::default(),
        }
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    /// Use an already-built repository; takes precedence over `with_graphql`.
    pub fn with_repository(mut self, repository: Arc<dyn UserRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn with_graphql(mut self, config: GraphQLConfig) -> Self {
        self.graphql = Some(config);
        self
    }

    pub fn with_hasher(mut self, hasher: Arc<dyn CredentialHashing>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn with_hash_cost(mut self, cost: HashCost) -> Self {
        self.hash_cost = cost;
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let tokens = TokenIssuer::new(self.security_config.clone())
            .map_err(|e| AppError::config(e.to_string()))?;

        let repository: Arc<dyn UserRepository> = match (self.repository, self.graphql) {
            (Some(repository), _) => repository,
            (None, Some(config)) => {
                config.validate()?;
                let client = GraphQLClient::new(&config)
                    .map_err(|e| AppError::config(e.to_string()))?;
                info!(endpoint = %client.endpoint(), "Using GraphQL user store");
                Arc::new(GraphQLUserRepository::new(client).with_id_type(config.user_id_type))
            }
            (None, None) => return Err(AppError::config("no user store configured")),
        };

        let hasher: Arc<dyn CredentialHashing> = match self.hasher {
            Some(hasher) => hasher,
            None => Arc::new(
                CredentialHasher::new(self.hash_cost)
                    .map_err(|e| AppError::config(e.to_string()))?,
            ),
        };

        let auth = AuthService::new(repository, hasher, tokens);
        Ok(AppState::new(auth, self.security_config))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
