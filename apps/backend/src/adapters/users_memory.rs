//! In-process user store.
//!
//! Used by the test suite and for running the service without a GraphQL
//! endpoint. Mirrors the store's observable behaviour: ids are assigned on
//! insert, emails are unique, and users are listed in insertion order.

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::errors::domain::{BackendErrorKind, DomainError};
use crate::geo::Coordinates;
use crate::repos::users::{
    NewUser, Page, UserCredentials, UserProfile, UserRepository, UserWithLocation,
};

#[derive(Debug, Clone)]
struct StoredUser {
    id: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    gender: String,
    trackings: Vec<Coordinates>,
}

impl StoredUser {
    fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<StoredUser>>,
    failure: RwLock<Option<DomainError>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tracked location for `user_id`. The first one recorded is
    /// the user's current position. Returns false for an unknown id.
    pub fn track(&self, user_id: &str, at: Coordinates) -> bool {
        let mut users = self.users.write();
        match users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.trackings.push(at);
                true
            }
            None => false,
        }
    }

    /// Make every subsequent call fail with `error` until cleared with `None`.
    pub fn fail_with(&self, error: Option<DomainError>) {
        *self.failure.write() = error;
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    fn check_failure(&self) -> Result<(), DomainError> {
        match self.failure.read().as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        self.check_failure()?;
        Ok(self
            .users
            .read()
            .iter()
            .find(|u| u.email == email)
            .map(|u| UserCredentials {
                id: u.id.clone(),
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<UserProfile>, DomainError> {
        self.check_failure()?;
        Ok(self
            .users
            .read()
            .iter()
            .find(|u| u.id == id)
            .map(StoredUser::profile))
    }

    async fn create_user(&self, user: NewUser) -> Result<String, DomainError> {
        self.check_failure()?;
        let mut users = self.users.write();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::backend(
                BackendErrorKind::Rejected,
                "registerUser: uniqueness or constraint violation",
            ));
        }

        let id = Uuid::new_v4().to_string();
        users.push(StoredUser {
            id: id.clone(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            gender: user.gender,
            trackings: Vec::new(),
        });
        Ok(id)
    }

    async fn list_users(&self, page: Page) -> Result<Vec<UserProfile>, DomainError> {
        self.check_failure()?;
        let users = self.users.read();
        let skipped = users.iter().skip(page.offset as usize);
        let profiles = match page.limit {
            Some(limit) => skipped.take(limit as usize).map(StoredUser::profile).collect(),
            None => skipped.map(StoredUser::profile).collect(),
        };
        Ok(profiles)
    }

    async fn list_users_with_locations(&self) -> Result<Vec<UserWithLocation>, DomainError> {
        self.check_failure()?;
        Ok(self
            .users
            .read()
            .iter()
            .map(|u| UserWithLocation {
                profile: u.profile(),
                location: u.trackings.first().copied(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            first_name: "First".to_string(),
            last_name: "Last".to_string(),
            gender: "x".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_find_by_email() {
        let repo = InMemoryUserRepository::new();
        let id = repo.create_user(new_user("a@x.com")).await.unwrap();

        let found = repo.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.password_hash, "$argon2id$stub");
        assert!(repo.find_user_by_email("b@x.com").await.unwrap().is_none());

        let profile = repo.find_user_by_id(&id).await.unwrap().unwrap();
        assert_eq!(profile.first_name, "First");
        assert!(repo.find_user_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_backend_rejection() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(new_user("a@x.com")).await.unwrap();

        let err = repo.create_user(new_user("a@x.com")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BackendFailure);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn paging_skips_and_limits() {
        let repo = InMemoryUserRepository::new();
        for i in 0..5 {
            repo.create_user(new_user(&format!("u{i}@x.com"))).await.unwrap();
        }

        let all = repo.list_users(Page::default()).await.unwrap();
        assert_eq!(all.len(), 5);

        let window = repo
            .list_users(Page {
                offset: 1,
                limit: Some(2),
            })
            .await
            .unwrap();
        assert_eq!(window, all[1..3].to_vec());

        let past_end = repo
            .list_users(Page {
                offset: 10,
                limit: None,
            })
            .await
            .unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn first_tracking_wins() {
        let repo = InMemoryUserRepository::new();
        let id = repo.create_user(new_user("a@x.com")).await.unwrap();
        let first = Coordinates::new(10.0, 10.0).unwrap();

        assert!(repo.track(&id, first));
        assert!(repo.track(&id, Coordinates::new(20.0, 20.0).unwrap()));
        assert!(!repo.track("missing", first));

        let users = repo.list_users_with_locations().await.unwrap();
        assert_eq!(users[0].current_position(), Some(first));
    }

    #[tokio::test]
    async fn injected_failure_applies_to_every_call() {
        let repo = InMemoryUserRepository::new();
        repo.fail_with(Some(DomainError::backend(
            BackendErrorKind::Unavailable,
            "down",
        )));

        assert!(repo.list_users(Page::default()).await.is_err());
        assert!(repo.find_user_by_email("a@x.com").await.is_err());

        repo.fail_with(None);
        assert!(repo.list_users(Page::default()).await.unwrap().is_empty());
    }
}
