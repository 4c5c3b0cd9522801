//! Tests for the liveness endpoint

use crate::{
    FluentRouter, HttpMiddleware,
    fluent::tests::{create_base_config, create_test_router, get_body_string, get_request},
};
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn test_liveness_route_answers_ok() {
    let app = FluentRouter::without_state(create_base_config())
        .unwrap()
        .setup_liveness()
        .into_inner();

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_string(response).await, "OK\n");
}

#[tokio::test]
async fn test_liveness_route_wins_over_branch() {
    let mut config = create_base_config();
    config.http.liveness_route = "/ops/live".to_string();

    let app = FluentRouter::without_state(config)
        .unwrap()
        .map_path("/ops", true, |branch| {
            branch.run_service(axum::Router::new().fallback(|| async { "ops branch" }));
            Ok(())
        })
        .unwrap()
        .setup_middleware()
        .await
        .unwrap()
        .into_inner();

    let response = app
        .clone()
        .oneshot(get_request("/ops/live"))
        .await
        .unwrap();
    assert_eq!(get_body_string(response).await, "OK\n");

    let response = app.oneshot(get_request("/ops/other")).await.unwrap();
    assert_eq!(get_body_string(response).await, "ops branch");
}

#[tokio::test]
async fn test_liveness_disabled() {
    let config = create_base_config().with_excluded_middlewares(vec![HttpMiddleware::Liveness]);
    let app = create_test_router(Some(config)).await;

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
