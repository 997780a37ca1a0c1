use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::services::auth::AuthService;

/// Process-wide state shared read-only by every request.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub security: SecurityConfig,
}

impl AppState {
    pub fn new(auth: AuthService, security: SecurityConfig) -> Self {
        Self {
            auth: Arc::new(auth),
            security,
        }
    }
}
