//! Assertions for RFC 7807 error responses.

use actix_web::http::header::HeaderMap;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Mirror of the service's problem-details body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProblemDetailsLike {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

/// Check the stable error contract and return the parsed body.
///
/// Verifies status, content type, `code`, trace id parity between body and
/// `x-trace-id`, and `WWW-Authenticate: Bearer` on 401.
pub fn assert_problem_details(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_code: &str,
    expected_status: StatusCode,
) -> ProblemDetailsLike {
    assert_eq!(status, expected_status, "unexpected status");

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/problem+json"),
        "unexpected content type {content_type:?}"
    );

    let problem: ProblemDetailsLike =
        serde_json::from_slice(body).expect("body should be problem details JSON");

    let trace_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id should be ASCII");
    assert_eq!(problem.trace_id, trace_header, "trace id parity");

    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());

    if expected_status == StatusCode::UNAUTHORIZED {
        let challenge = headers
            .get("www-authenticate")
            .expect("401 responses should carry WWW-Authenticate")
            .to_str()
            .expect("WWW-Authenticate should be ASCII");
        assert!(challenge.starts_with("Bearer"), "challenge {challenge:?}");
    }

    problem
}
