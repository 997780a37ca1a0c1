use std::sync::atomic::{AtomicUsize, Ordering};

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, Error};
use directory_auth::auth::password::{CredentialHasher, CredentialHashing, HashCost};
use directory_auth::{Coordinates, DomainError};
use serde_json::json;

use super::app_builder::TestApp;

/// Real hasher that counts how often each operation runs.
pub struct CountingHasher {
    inner: CredentialHasher,
    hashes: AtomicUsize,
    verifies: AtomicUsize,
}

impl CountingHasher {
    pub fn new() -> Self {
        Self {
            inner: CredentialHasher::new(HashCost::minimal()).expect("minimal cost is valid"),
            hashes: AtomicUsize::new(0),
            verifies: AtomicUsize::new(0),
        }
    }

    pub fn hashes(&self) -> usize {
        self.hashes.load(Ordering::SeqCst)
    }

    pub fn verifies(&self) -> usize {
        self.verifies.load(Ordering::SeqCst)
    }
}

impl CredentialHashing for CountingHasher {
    fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        self.hashes.fetch_add(1, Ordering::SeqCst);
        self.inner.hash(plaintext)
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, DomainError> {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(plaintext, digest)
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Register `email` through the HTTP surface; returns (user id, token).
pub async fn register<S>(app: &TestApp<S>, email: &str) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({
            "email": email,
            "password": "secret123",
            "first_name": "Test",
            "last_name": "User",
            "gender": "x",
        }))
        .to_request();
    let resp = test::call_service(&app.service, req).await;
    assert!(resp.status().is_success(), "register failed: {}", resp.status());

    let body: serde_json::Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().expect("token").to_string();
    let id = app
        .state
        .auth
        .tokens()
        .verify(&token)
        .expect("fresh token verifies")
        .sub;
    (id, token)
}

/// Register and pin the user's current position.
pub async fn register_at<S>(app: &TestApp<S>, email: &str, lat: f64, lng: f64) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let (id, token) = register(app, email).await;
    let at = Coordinates::new(lat, lng).expect("valid test coordinates");
    assert!(app.repo.track(&id, at));
    (id, token)
}
