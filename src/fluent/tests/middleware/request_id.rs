//! Tests for request ID middleware
//!
//! The request ID middleware consists of two tower-http layers:
//! 1. SetRequestIdLayer - Generates/preserves x-request-id header
//! 2. PropagateRequestIdLayer - Adds x-request-id to response headers
//!
//! Request IDs use UUIDv7 format for time-ordered, globally unique identifiers.

use crate::{
    FluentRouter, HttpMiddleware,
    fluent::tests::{create_base_config, get_request, request_with_id},
};
use axum::{Router, http::StatusCode, routing::get};
use tower::ServiceExt;

fn app_with_request_id(config: crate::Config) -> Router {
    FluentRouter::without_state(config)
        .unwrap()
        .merge(Router::new().route("/test", get(|| async { "OK" }).post(|| async { "OK" })))
        .map_path("/app", true, |branch| {
            branch.run_service(Router::new().fallback(|| async { "branch" }));
            Ok(())
        })
        .unwrap()
        .setup_branches()
        .unwrap()
        .setup_request_id()
        .into_inner()
}

#[tokio::test]
async fn test_request_id_preserves_existing_header() {
    let app = app_with_request_id(create_base_config());

    let response = app
        .oneshot(request_with_id("GET", "/test", "custom-request-id-12345"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "custom-request-id-12345"
    );
}

#[tokio::test]
async fn test_request_id_generated_when_missing() {
    let app = app_with_request_id(create_base_config());

    let response = app.oneshot(get_request("/test")).await.unwrap();

    let id = response
        .headers()
        .get("x-request-id")
        .expect("a request id should be generated")
        .to_str()
        .unwrap();
    let uuid = uuid::Uuid::parse_str(id).unwrap();
    assert_eq!(uuid.get_version_num(), 7);
}

#[tokio::test]
async fn test_request_id_propagated_from_branch() {
    let app = app_with_request_id(create_base_config());

    let response = app
        .oneshot(request_with_id("GET", "/app/dashboard", "branch-request"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "branch-request"
    );
}

#[tokio::test]
async fn test_request_id_works_with_different_methods() {
    let app = app_with_request_id(create_base_config());

    for (method, id) in [("GET", "get-id"), ("POST", "post-id")] {
        let response = app
            .clone()
            .oneshot(request_with_id(method, "/test", id))
            .await
            .unwrap();
        assert_eq!(response.headers().get("x-request-id").unwrap(), id);
    }
}

#[tokio::test]
async fn test_request_id_with_404_response() {
    let app = app_with_request_id(create_base_config());

    let response = app
        .oneshot(request_with_id("GET", "/nowhere", "missing-route"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "missing-route"
    );
}

#[tokio::test]
async fn test_request_id_different_ids_for_different_requests() {
    let app = app_with_request_id(create_base_config());

    let first = app.clone().oneshot(get_request("/test")).await.unwrap();
    let second = app.oneshot(get_request("/test")).await.unwrap();

    assert_ne!(
        first.headers().get("x-request-id").unwrap(),
        second.headers().get("x-request-id").unwrap()
    );
}

#[tokio::test]
async fn test_request_id_disabled() {
    let config = create_base_config().with_excluded_middlewares(vec![HttpMiddleware::RequestId]);
    let app = app_with_request_id(config);

    let response = app.oneshot(get_request("/test")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-request-id").is_none());
}
