//! Tests for middleware configuration (include/exclude)

use crate::{
    Config, FluentRouter, HttpMiddleware,
    fluent::tests::{create_base_config, create_config_with_toml, get_request},
};
use axum::http::StatusCode;
use tower::ServiceExt;

#[test]
fn test_middleware_config_include() {
    let config = create_base_config()
        .with_included_middlewares(vec![HttpMiddleware::RequestId, HttpMiddleware::Logging]);

    let fluent_router = FluentRouter::without_state(config).unwrap();

    assert!(fluent_router.is_middleware_enabled(HttpMiddleware::RequestId));
    assert!(fluent_router.is_middleware_enabled(HttpMiddleware::Logging));

    assert!(!fluent_router.is_middleware_enabled(HttpMiddleware::Timeout));
    assert!(!fluent_router.is_middleware_enabled(HttpMiddleware::Branches));
    assert!(!fluent_router.is_middleware_enabled(HttpMiddleware::CatchPanic));
}

#[test]
fn test_middleware_config_default_all_enabled() {
    let fluent_router = FluentRouter::without_state(create_base_config()).unwrap();

    for middleware in [
        HttpMiddleware::RequestId,
        HttpMiddleware::Logging,
        HttpMiddleware::Liveness,
        HttpMiddleware::Timeout,
        HttpMiddleware::CatchPanic,
        HttpMiddleware::Branches,
    ] {
        assert!(fluent_router.is_middleware_enabled(middleware));
    }
}

#[test]
fn test_middleware_config_from_toml() {
    let config: Config = create_config_with_toml(r#"exclude = ["liveness", "branches"]"#);
    let fluent_router = FluentRouter::without_state(config).unwrap();

    assert!(!fluent_router.is_middleware_enabled(HttpMiddleware::Liveness));
    assert!(!fluent_router.is_middleware_enabled(HttpMiddleware::Branches));
    assert!(fluent_router.is_middleware_enabled(HttpMiddleware::Logging));
}

#[tokio::test]
async fn test_logging_disabled_path() {
    let config = create_base_config().with_excluded_middlewares(vec![HttpMiddleware::Logging]);
    let app = super::super::create_test_router(Some(config)).await;

    let response = app.oneshot(get_request("/noop")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
