use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use directory_auth::auth::password::{CredentialHashing, HashCost};
use directory_auth::infra::state::build_state;
use directory_auth::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use directory_auth::routes;
use directory_auth::state::app_state::AppState;
use directory_auth::state::security_config::SecurityConfig;
use directory_auth::InMemoryUserRepository;

/// A running test service plus handles on what backs it.
pub struct TestApp<S> {
    pub service: S,
    pub repo: Arc<InMemoryUserRepository>,
    pub state: AppState,
}

/// Builder for creating test Actix service instances over an in-memory store
pub struct TestAppBuilder {
    security: SecurityConfig,
    repo: Arc<InMemoryUserRepository>,
    hasher: Option<Arc<dyn CredentialHashing>>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            security: SecurityConfig::default(),
            repo: Arc::new(InMemoryUserRepository::new()),
            hasher: None,
        }
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    pub fn with_hasher(mut self, hasher: Arc<dyn CredentialHashing>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Build the service with the production middleware stack and routes.
    pub async fn build(
        self,
    ) -> TestApp<impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>> {
        let mut builder = build_state()
            .with_security(self.security)
            .with_repository(self.repo.clone())
            .with_hash_cost(HashCost::minimal());
        if let Some(hasher) = self.hasher {
            builder = builder.with_hasher(hasher);
        }
        let state = builder.build().expect("test state should build");

        let service = test::init_service(
            App::new()
                .wrap(StructuredLogger)
                .wrap(TraceSpan)
                .wrap(RequestTrace)
                .app_data(web::Data::new(state.clone()))
                .configure(routes::configure),
        )
        .await;

        TestApp {
            service,
            repo: self.repo,
            state,
        }
    }
}

pub fn create_test_app() -> TestAppBuilder {
    TestAppBuilder::new()
}
