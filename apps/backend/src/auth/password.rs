//! Salted password hashing (Argon2id, PHC string digests).
//!
//! New digests are always Argon2id. Bcrypt digests (`$2a$`, `$2b$`, `$2y$`)
//! already in the store are still verified so existing users can log in.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::errors::domain::{DomainError, InputField};

/// Argon2 work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl HashCost {
    /// Cheapest parameters Argon2 accepts. Only meant for tests.
    pub const fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Hash/verify seam used by the auth service.
///
/// Both calls are CPU-bound and synchronous; callers are expected to run
/// them on a blocking worker.
pub trait CredentialHashing: Send + Sync + 'static {
    /// Produce a self-describing digest with a fresh random salt.
    fn hash(&self, plaintext: &str) -> Result<String, DomainError>;

    /// `Ok(false)` on mismatch; `MalformedDigest` when `digest` cannot be parsed.
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, DomainError>;
}

#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    pub fn new(cost: HashCost) -> Result<Self, DomainError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| {
                DomainError::invalid_input(InputField::Other, format!("bad hash cost: {e}"))
            })?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl CredentialHashing for CredentialHasher {
    fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        if plaintext.is_empty() {
            return Err(DomainError::invalid_input(
                InputField::Password,
                "Password cannot be empty",
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, DomainError> {
        if is_bcrypt(digest) {
            return bcrypt::verify(plaintext, digest)
                .map_err(|e| DomainError::malformed_digest(e.to_string()));
        }

        let parsed =
            PasswordHash::new(digest).map_err(|e| DomainError::malformed_digest(e.to_string()))?;

        // Cost parameters come from the digest itself, not from `self.params`.
        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(DomainError::malformed_digest(e.to_string())),
        }
    }
}

fn is_bcrypt(digest: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| digest.starts_with(prefix))
}
