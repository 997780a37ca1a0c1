use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::errors::domain::DomainError;

/// Shortest signing secret accepted for HS256.
pub const MIN_SECRET_LEN: usize = 32;

pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Longest accepted token lifetime (30 days).
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Configuration for JWT security settings
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// JWT secret key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm to use (defaults to HS256)
    pub algorithm: Algorithm,
    /// Lifetime of issued access tokens
    pub token_ttl: Duration,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl: DEFAULT_TOKEN_TTL,
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Startup check; a failure here must stop the process.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.jwt_secret.is_empty() {
            return Err(DomainError::signing("JWT secret is not configured"));
        }
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(DomainError::signing(format!(
                "JWT secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.token_ttl.is_zero() {
            return Err(DomainError::signing("token lifetime must be positive"));
        }
        if self.token_ttl > MAX_TOKEN_TTL {
            return Err(DomainError::signing(format!(
                "token lifetime must be at most {} seconds",
                MAX_TOKEN_TTL.as_secs()
            )));
        }
        Ok(())
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only_never_deploy".to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn empty_secret_is_a_signing_error() {
        let err = SecurityConfig::new(Vec::new()).validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SigningError);
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(SecurityConfig::new("short").validate().is_err());
    }

    #[test]
    fn token_lifetime_is_bounded() {
        let at_limit = SecurityConfig::default().with_token_ttl(MAX_TOKEN_TTL);
        assert!(at_limit.validate().is_ok());

        let over = SecurityConfig::default().with_token_ttl(MAX_TOKEN_TTL + Duration::from_secs(1));
        assert_eq!(over.validate().unwrap_err().kind(), ErrorKind::SigningError);

        let huge = SecurityConfig::default().with_token_ttl(Duration::from_secs(u64::MAX));
        assert_eq!(huge.validate().unwrap_err().kind(), ErrorKind::SigningError);
    }

    #[test]
    fn default_config_passes() {
        SecurityConfig::default().validate().unwrap();
        assert_eq!(SecurityConfig::default().token_ttl, DEFAULT_TOKEN_TTL);
    }
}
