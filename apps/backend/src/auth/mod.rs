pub mod claims;
pub mod jwt;
pub mod password;

pub use claims::{Claims, USER_ID_CLAIM};
pub use jwt::{AccessClaims, TokenIssuer};
pub use password::{CredentialHasher, CredentialHashing, HashCost};
