//! Test helpers and utilities for FluentRouter tests
//!
//! These tests drive the router in-process with `oneshot()`, no sockets involved.
//! Tests that need a real listener live in `tests/`.
//!
//! ## Available Helpers
//!
//! - Configuration builders: `create_base_config()`, `create_config_with_toml()`
//! - Router builders: `create_test_router()`, `create_branch_router()`
//! - Request helpers: `get_request()`, `request_with_id()`
//! - Response helpers: `get_body_string()`

use crate::{Config, FluentRouter, PipelineBuilder, Result};
use axum::{Router, body::Body, http::Request, response::Response, routing::get};

#[cfg(test)]
pub(crate) mod middleware;

// ============================================================================
// Configuration Helpers
// ============================================================================

/// Base TOML configuration template for tests.
/// Use `create_config_with_toml()` to inject additional sections.
const BASE_CONFIG_TOML: &str = r#"
[http]
bind_addr = "127.0.0.1"
bind_port = 3000
liveness_route = "/health"

[logging]
format = "json"
"#;

/// Creates a base test configuration by parsing TOML.
pub(crate) fn create_base_config() -> Config {
    BASE_CONFIG_TOML
        .parse()
        .expect("Failed to parse base test config TOML")
}

/// Creates a test configuration with `extra` appended to the base TOML.
///
/// `extra` may add keys to `[http]` (it is appended right after the section)
/// or add whole tables such as `[[http.branches]]`.
pub(crate) fn create_config_with_toml(extra: &str) -> Config {
    let toml = BASE_CONFIG_TOML.replacen(
        "[logging]",
        &format!("{extra}\n\n[logging]"),
        1,
    );
    toml.parse().expect("Failed to parse test config TOML")
}

// ============================================================================
// Router Helpers
// ============================================================================

/// Creates a test router with the full middleware stack and a `/noop` route.
pub(crate) async fn create_test_router(config: Option<Config>) -> Router {
    FluentRouter::without_state(config.unwrap_or_else(create_base_config))
        .expect("Failed to create FluentRouter")
        .merge(Router::new().route("/noop", get(|| async { "OK\n" }).post(|| async { "OK\n" })))
        .setup_middleware()
        .await
        .expect("Failed to setup middleware")
        .into_inner()
}

/// Creates a test router with one code branch at `path_match` and the full
/// middleware stack. The `/noop` route is registered as well.
pub(crate) async fn create_branch_router<F>(
    config: Config,
    path_match: &str,
    remove_matched_segment: bool,
    configure: F,
) -> Router
where
    F: FnOnce(&mut PipelineBuilder) -> Result<()>,
{
    FluentRouter::without_state(config)
        .expect("Failed to create FluentRouter")
        .merge(Router::new().route("/noop", get(|| async { "OK\n" })))
        .map_path(path_match, remove_matched_segment, configure)
        .expect("Failed to map path")
        .setup_middleware()
        .await
        .expect("Failed to setup middleware")
        .into_inner()
}

// ============================================================================
// Request Helpers
// ============================================================================

/// Creates a GET request to the specified URI.
pub(crate) fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Creates a request with a custom request ID header.
pub(crate) fn request_with_id(method: &str, uri: &str, request_id: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-request-id", request_id)
        .body(Body::empty())
        .unwrap()
}

// ============================================================================
// Response Helpers
// ============================================================================

/// Extracts the body from a response as a String.
pub(crate) async fn get_body_string(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).to_string()
}
