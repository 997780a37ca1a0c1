//! Register, login, listing and proximity search.
//!
//! Each operation moves through `Pending -> Validated -> Authorized -> Issued`
//! or ends early in `Rejected`; the terminal state is logged once per call.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::claims::Claims;
use crate::auth::jwt::TokenIssuer;
use crate::auth::password::CredentialHashing;
use crate::errors::domain::{DomainError, InputField, NotFoundKind};
use crate::geo::{within_radius, Coordinates};
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::repos::users::{NewUser, Page, UserProfile, UserRepository, UserWithLocation};
use crate::services::validation::{
    normalize_email, validate_email, validate_new_password, validate_profile_field,
    validate_radius,
};
use crate::web::trace_ctx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpState {
    Pending,
    Validated,
    Authorized,
    Issued,
    Rejected,
}

impl OpState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Validated => "validated",
            Self::Authorized => "authorized",
            Self::Issued => "issued",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for OpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registration request that has passed input validation.
#[derive(Clone, PartialEq)]
pub struct Registration {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    gender: String,
}

impl Registration {
    pub fn new(
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        gender: &str,
    ) -> Result<Self, DomainError> {
        let email = validate_email(email)?;
        validate_new_password(password)?;
        Ok(Self {
            email,
            password: password.to_string(),
            first_name: validate_profile_field("first_name", first_name)?,
            last_name: validate_profile_field("last_name", last_name)?,
            gender: validate_profile_field("gender", gender)?,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

// Keeps the plaintext out of Debug output.
impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &Redacted(&self.email))
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("gender", &self.gender)
            .finish_non_exhaustive()
    }
}

/// Proximity search parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    radius_km: f64,
    origin: Option<Coordinates>,
}

impl NearbyQuery {
    /// `origin: None` searches around the caller's own current position.
    pub fn new(radius_km: f64, origin: Option<Coordinates>) -> Result<Self, DomainError> {
        Ok(Self {
            radius_km: validate_radius(radius_km)?,
            origin,
        })
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn origin(&self) -> Option<Coordinates> {
        self.origin
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyUser {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub location: Coordinates,
    pub distance_km: f64,
}

/// A fresh token for the caller plus the requested users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing<T> {
    pub token: String,
    pub users: Vec<T>,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHashing>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHashing>,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Hash the password, store the user, return a token for the new id.
    pub async fn register(&self, registration: Registration) -> Result<String, DomainError> {
        let result = self.register_inner(registration).await;
        finish("register", result)
    }

    async fn register_inner(&self, registration: Registration) -> Result<String, DomainError> {
        transition("register", OpState::Validated);
        let Registration {
            email,
            password,
            first_name,
            last_name,
            gender,
        } = registration;

        let password_hash = self
            .run_hasher(move |hasher| hasher.hash(&password))
            .await?;

        let user_id = self
            .users
            .create_user(NewUser {
                email: email.clone(),
                password_hash,
                first_name,
                last_name,
                gender,
            })
            .await?;

        transition("register", OpState::Authorized);
        info!(user_id = %user_id, email = %Redacted(&email), "User registered");
        self.tokens.issue(&Claims::for_user(&user_id))
    }

    /// Exchange an email/password pair for a token.
    ///
    /// An unknown email and a wrong password fail the same way, and an
    /// unknown email never reaches the hasher.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, DomainError> {
        let result = self.login_inner(email, password).await;
        finish("login", result)
    }

    async fn login_inner(&self, email: &str, password: &str) -> Result<String, DomainError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(DomainError::invalid_input(
                InputField::Other,
                "email and password are required",
            ));
        }
        transition("login", OpState::Validated);

        let Some(credentials) = self.users.find_user_by_email(&email).await? else {
            security::login_failed("unknown_email", &email);
            return Err(DomainError::not_found(NotFoundKind::User, "no user for email"));
        };

        let password = password.to_string();
        let digest = credentials.password_hash;
        let matches = self
            .run_hasher(move |hasher| hasher.verify(&password, &digest))
            .await?;
        if !matches {
            security::login_failed("password_mismatch", &email);
            return Err(DomainError::unauthorized("password mismatch"));
        }

        transition("login", OpState::Authorized);
        debug!(user_id = %credentials.id, "Credentials verified");
        self.tokens.issue(&Claims::for_user(&credentials.id))
    }

    /// All users in `page`, plus a token re-issued for `caller_id`.
    ///
    /// A caller the store no longer holds gets `Unauthorized`, never a
    /// fresh token.
    pub async fn list_users(
        &self,
        caller_id: &str,
        page: Page,
    ) -> Result<Listing<UserProfile>, DomainError> {
        transition("list_users", OpState::Validated);
        let result = async {
            let users = self.users.list_users(page).await?;
            if users.is_empty() {
                return Err(DomainError::not_found(NotFoundKind::Users, "no users"));
            }
            if self.users.find_user_by_id(caller_id).await?.is_none() {
                return Err(unknown_caller());
            }
            transition("list_users", OpState::Authorized);
            let token = self.tokens.issue(&Claims::for_user(caller_id))?;
            Ok(Listing { token, users })
        }
        .await;
        finish("list_users", result)
    }

    /// Users whose current position lies within the query radius of the
    /// reference point, closest first. The caller is never listed.
    pub async fn find_nearby(
        &self,
        caller_id: &str,
        query: NearbyQuery,
    ) -> Result<Listing<NearbyUser>, DomainError> {
        transition("find_nearby", OpState::Validated);
        let result = async {
            let users = self.users.list_users_with_locations().await?;
            if users.is_empty() {
                return Err(DomainError::not_found(NotFoundKind::Users, "no users"));
            }
            if !users.iter().any(|u| u.profile.id == caller_id) {
                return Err(unknown_caller());
            }

            let origin = match query.origin() {
                Some(origin) => origin,
                None => own_position(&users, caller_id)?,
            };

            let others = users.into_iter().filter(|u| u.profile.id != caller_id);
            let found: Vec<NearbyUser> = within_radius(others, origin, query.radius_km())
                .into_iter()
                .filter_map(|hit| {
                    let location = hit.item.current_position()?;
                    Some(NearbyUser {
                        profile: hit.item.profile,
                        location,
                        distance_km: hit.distance_km,
                    })
                })
                .collect();

            debug!(
                radius_km = query.radius_km(),
                matches = found.len(),
                "Proximity filter applied"
            );
            transition("find_nearby", OpState::Authorized);
            let token = self.tokens.issue(&Claims::for_user(caller_id))?;
            Ok(Listing {
                token,
                users: found,
            })
        }
        .await;
        finish("find_nearby", result)
    }

    async fn run_hasher<T, F>(&self, job: F) -> Result<T, DomainError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn CredentialHashing) -> Result<T, DomainError> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || job(hasher.as_ref()))
            .await
            .map_err(|e| DomainError::internal(format!("hashing worker failed: {e}")))?
    }
}

fn unknown_caller() -> DomainError {
    security::token_rejected("unknown_subject");
    DomainError::unauthorized("token subject is not a known user")
}

fn own_position(users: &[UserWithLocation], caller_id: &str) -> Result<Coordinates, DomainError> {
    users
        .iter()
        .find(|u| u.profile.id == caller_id)
        .and_then(UserWithLocation::current_position)
        .ok_or_else(|| {
            DomainError::invalid_input(
                InputField::ReferencePoint,
                "no lat/lng given and the caller has no tracked position",
            )
        })
}

fn transition(operation: &'static str, state: OpState) {
    debug!(operation, state = %state, "Auth operation state");
}

fn finish<T>(operation: &'static str, result: Result<T, DomainError>) -> Result<T, DomainError> {
    let trace_id = trace_ctx::trace_id();
    match &result {
        Ok(_) => info!(%trace_id, operation, state = %OpState::Issued, "Auth operation completed"),
        Err(e) => warn!(
            %trace_id,
            operation,
            state = %OpState::Rejected,
            kind = ?e.kind(),
            error = %Redacted(&e.to_string()),
            "Auth operation rejected"
        ),
    }
    result
}
