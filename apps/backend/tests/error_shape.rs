mod common;
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;
use support::create_test_app;

#[actix_web::test]
async fn inbound_request_id_becomes_the_trace_id() {
    let app = create_test_app().build().await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .insert_header(("x-request-id", "req-abc-123"))
        .set_json(json!({"email": "nobody@x.com", "password": "secret123"}))
        .to_request();
    let resp = test::call_service(&app.service, req).await;

    assert_eq!(resp.headers().get("x-request-id").unwrap(), "req-abc-123");
    let problem = common::problem(resp, "UNAUTHORIZED", StatusCode::UNAUTHORIZED).await;
    assert_eq!(problem.trace_id, "req-abc-123");
}

#[actix_web::test]
async fn unusable_request_id_is_replaced() {
    let app = create_test_app().build().await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .insert_header(("x-request-id", "has spaces; and=junk"))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app.service, req).await;

    let echoed = resp
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_ne!(echoed, "has spaces; and=junk");

    let problem = common::problem(resp, "VALIDATION_ERROR", StatusCode::BAD_REQUEST).await;
    assert_eq!(problem.trace_id, echoed);
}

#[actix_web::test]
async fn every_response_gets_a_request_id() {
    let app = create_test_app().build().await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app.service, req).await;
    let id = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(!id.is_empty());
}
