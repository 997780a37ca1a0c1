#![allow(dead_code)]

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::{assert_problem_details, ProblemDetailsLike};
use serde_json::Value;

// Logging is auto-installed for every test binary that declares `mod common`
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Read a 2xx JSON body, panicking with the body text otherwise.
pub async fn json_ok(resp: ServiceResponse<BoxBody>) -> Value {
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        StatusCode::OK,
        "unexpected status, body: {}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("response body should be JSON")
}

/// Assert a problem-details error response and return its body.
pub async fn problem(
    resp: ServiceResponse<BoxBody>,
    code: &str,
    status: StatusCode,
) -> ProblemDetailsLike {
    let actual = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;
    assert_problem_details(actual, &headers, &body, code, status)
}
