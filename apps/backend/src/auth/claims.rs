//! Role/claim metadata embedded in access tokens.
//!
//! The data service authorizes row access from the claims namespace, so
//! the wire shape follows its conventions: a nested object keyed by
//! [`CLAIMS_NAMESPACE`] holding the default role, allowed roles and any
//! additional `X-Hasura-*` claims flattened alongside them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, InputField};

pub const CLAIMS_NAMESPACE: &str = "https://hasura.io/jwt/claims";

/// Well-known claim carrying the authenticated user's identifier.
pub const USER_ID_CLAIM: &str = "X-Hasura-User-Id";

pub const DEFAULT_ROLE: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "x-hasura-default-role")]
    pub default_role: String,
    #[serde(rename = "x-hasura-allowed-roles")]
    pub allowed_roles: BTreeSet<String>,
    #[serde(flatten)]
    pub other_claims: BTreeMap<String, String>,
}

impl Claims {
    /// Claims for an ordinary directory user.
    pub fn for_user(user_id: &str) -> Self {
        Self {
            default_role: DEFAULT_ROLE.to_string(),
            allowed_roles: BTreeSet::from([DEFAULT_ROLE.to_string()]),
            other_claims: BTreeMap::from([(USER_ID_CLAIM.to_string(), user_id.to_string())]),
        }
    }

    pub fn new(
        default_role: impl Into<String>,
        allowed_roles: impl IntoIterator<Item = String>,
        other_claims: BTreeMap<String, String>,
    ) -> Result<Self, DomainError> {
        let claims = Self {
            default_role: default_role.into(),
            allowed_roles: allowed_roles.into_iter().collect(),
            other_claims,
        };
        claims.validate()?;
        Ok(claims)
    }

    /// Allowed roles must include the default role, and the user id claim
    /// must be present and non-empty.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.default_role.is_empty() {
            return Err(DomainError::invalid_input(
                InputField::Other,
                "default role cannot be empty",
            ));
        }
        if !self.allowed_roles.contains(&self.default_role) {
            return Err(DomainError::invalid_input(
                InputField::Other,
                format!("allowed roles must include '{}'", self.default_role),
            ));
        }
        match self.user_id() {
            Some(id) if !id.is_empty() => Ok(()),
            _ => Err(DomainError::invalid_input(
                InputField::Other,
                format!("claims must carry {USER_ID_CLAIM}"),
            )),
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.other_claims.get(USER_ID_CLAIM).map(String::as_str)
    }
}
