//! User repository interface.
//!
//! The service depends only on this trait; adapters under
//! `crate::adapters` implement it against a concrete store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::domain::DomainError;
use crate::geo::{Coordinates, Positioned};

/// Public projection of a directory user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
}

/// What login needs to check a password
#[derive(Debug, Clone, PartialEq)]
pub struct UserCredentials {
    pub id: String,
    pub password_hash: String,
}

/// Registration payload; `password_hash` is already a digest.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
}

/// A user with their first tracked location, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithLocation {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub location: Option<Coordinates>,
}

impl UserWithLocation {
    pub fn current_position(&self) -> Option<Coordinates> {
        self.location
    }
}

impl Positioned for UserWithLocation {
    fn position(&self) -> Option<Coordinates> {
        self.current_position()
    }
}

/// Offset/limit window for listings. `limit: None` means everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: Option<u32>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Users whose email matches exactly; the first match wins.
    async fn find_user_by_email(&self, email: &str)
        -> Result<Option<UserCredentials>, DomainError>;

    /// The user with identifier `id`, if the store still holds one.
    async fn find_user_by_id(&self, id: &str) -> Result<Option<UserProfile>, DomainError>;

    /// Insert a user and return the identifier the store assigned.
    async fn create_user(&self, user: NewUser) -> Result<String, DomainError>;

    async fn list_users(&self, page: Page) -> Result<Vec<UserProfile>, DomainError>;

    async fn list_users_with_locations(&self) -> Result<Vec<UserWithLocation>, DomainError>;
}
