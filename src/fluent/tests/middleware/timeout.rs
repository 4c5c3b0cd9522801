//! Tests for request timeout middleware setup

use crate::{
    FluentRouter, HttpMiddleware,
    fluent::tests::{create_base_config, get_request},
    handler_fn,
};
use axum::{Router, http::StatusCode, routing::get};
use std::time::Duration;
use tower::ServiceExt;

fn slow_router() -> Router {
    Router::new()
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                "This should timeout"
            }),
        )
        .route(
            "/fast",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                "Fast response"
            }),
        )
}

#[tokio::test]
async fn test_setup_timeout_with_slow_handler() {
    let config = create_base_config().with_request_timeout(Duration::from_millis(100));
    let app = FluentRouter::without_state(config)
        .unwrap()
        .merge(slow_router())
        .setup_timeout()
        .into_inner();

    let response = app.oneshot(get_request("/slow")).await.unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn test_setup_timeout_with_fast_handler() {
    let config = create_base_config().with_request_timeout(Duration::from_millis(200));
    let app = FluentRouter::without_state(config)
        .unwrap()
        .merge(slow_router())
        .setup_timeout()
        .into_inner();

    let response = app.oneshot(get_request("/fast")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"Fast response");
}

#[tokio::test]
async fn test_setup_timeout_disabled_by_default() {
    let app = FluentRouter::without_state(create_base_config())
        .unwrap()
        .merge(slow_router())
        .setup_timeout()
        .into_inner();

    let response = app.oneshot(get_request("/slow")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_setup_timeout_middleware_disabled() {
    let config = create_base_config()
        .with_request_timeout(Duration::from_millis(50))
        .with_excluded_middlewares(vec![HttpMiddleware::Timeout]);
    let app = FluentRouter::without_state(config)
        .unwrap()
        .merge(slow_router())
        .setup_timeout()
        .into_inner();

    let response = app.oneshot(get_request("/slow")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_setup_timeout_interrupts_branch() {
    let config = create_base_config().with_request_timeout(Duration::from_millis(50));
    let app = FluentRouter::without_state(config)
        .unwrap()
        .map_path("/reports", true, |branch| {
            branch.run(handler_fn(|ctx| {
                Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    ctx.set_response("finished");
                    Ok(())
                })
            }));
            Ok(())
        })
        .unwrap()
        .setup_branches()
        .unwrap()
        .setup_timeout()
        .into_inner();

    let response = app.oneshot(get_request("/reports/yearly")).await.unwrap();
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
}
