//! Repository interfaces for the external user directory.

pub mod users;

pub use users::{NewUser, Page, UserCredentials, UserProfile, UserRepository, UserWithLocation};
