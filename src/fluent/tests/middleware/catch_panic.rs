//! Tests for panic catching middleware setup

use crate::{FluentRouter, HttpMiddleware, fluent::tests::create_base_config, handler_fn};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use std::time::Duration;
use tower::Service;

fn panic_router() -> Router {
    Router::new().route(
        "/panic",
        get(|| async {
            panic!("Test panic!");
            #[allow(unreachable_code)]
            "This will never be reached"
        }),
    )
}

#[tokio::test]
async fn test_setup_catch_panic_with_panic() {
    let mut app = FluentRouter::without_state(create_base_config())
        .unwrap()
        .merge(panic_router())
        .setup_catch_panic()
        .into_inner();

    let response = app
        .call(Request::builder().uri("/panic").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/plain; charset=utf-8"
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"Internal Server Error");
}

#[tokio::test]
async fn test_setup_catch_panic_normal_request() {
    let mut app = FluentRouter::without_state(create_base_config())
        .unwrap()
        .merge(Router::new().route("/normal", get(|| async { "OK" })))
        .setup_catch_panic()
        .into_inner();

    let response = app
        .call(Request::builder().uri("/normal").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_with_panic_notification_channel() {
    let (tx, mut rx) = tokio::sync::mpsc::channel::<String>(10);

    let mut app = FluentRouter::without_state(create_base_config())
        .unwrap()
        .with_panic_notification_channel(tx)
        .merge(panic_router())
        .setup_catch_panic()
        .into_inner();

    let response = app
        .call(Request::builder().uri("/panic").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let msg = tokio::time::timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("a panic notification should be sent")
        .unwrap();
    assert!(msg.contains("Service panicked"));
    assert!(msg.contains("Test panic!"));
}

#[tokio::test]
async fn test_branch_panic_is_notified() {
    let (tx, mut rx) = tokio::sync::mpsc::channel::<String>(10);

    let mut app = FluentRouter::without_state(create_base_config())
        .unwrap()
        .with_panic_notification_channel(tx)
        .map_path("/app", true, |branch| {
            branch.run(handler_fn(|ctx| {
                Box::pin(async move {
                    if ctx.path() == "/explode" {
                        panic!("branch panic at {}", ctx.path_base());
                    }
                    Ok(())
                })
            }));
            Ok(())
        })
        .unwrap()
        .setup_branches()
        .unwrap()
        .setup_catch_panic()
        .into_inner();

    let response = app
        .call(
            Request::builder()
                .uri("/app/explode")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let msg = tokio::time::timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("a panic notification should be sent")
        .unwrap();
    assert!(msg.contains("branch panic at /app"));
}

#[tokio::test]
async fn test_with_panic_notification_channel_no_panic() {
    let (tx, mut rx) = tokio::sync::mpsc::channel::<String>(10);

    let mut app = FluentRouter::without_state(create_base_config())
        .unwrap()
        .with_panic_notification_channel(tx)
        .merge(Router::new().route("/no_panic", get(|| async { "All good" })))
        .setup_catch_panic()
        .into_inner();

    let response = app
        .call(
            Request::builder()
                .uri("/no_panic")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let notification = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
    assert!(notification.is_err());
}

#[tokio::test]
async fn test_catch_panic_can_be_excluded() {
    let config = create_base_config().with_excluded_middlewares(vec![HttpMiddleware::CatchPanic]);
    let router = FluentRouter::without_state(config).unwrap();

    assert!(!router.is_middleware_enabled(HttpMiddleware::CatchPanic));
    assert!(router.is_middleware_enabled(HttpMiddleware::Branches));
}
