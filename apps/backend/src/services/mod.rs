pub mod auth;
pub mod validation;

pub use auth::{AuthService, Listing, NearbyQuery, NearbyUser, Registration};
