//! Liveness probe and request timeout.

use super::router::FluentRouter;
use crate::HttpMiddleware;

use {axum::routing::get, http::StatusCode, tower_http::timeout::TimeoutLayer};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up request timeout middleware.
    ///
    /// Aborts requests that take longer than the configured duration with a
    /// `408 Request Timeout` response. A branch interrupted this way is dropped
    /// mid-flight; its path state is restored as it unwinds.
    ///
    /// ```toml
    /// [http]
    /// request_timeout = "30s"  # Optional, uses humantime format
    /// ```
    #[must_use]
    pub fn setup_timeout(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::Timeout) {
            return self;
        }

        if let Some(timeout) = self.config.http.request_timeout {
            self.inner = self.inner.layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                timeout,
            ));
        }
        self
    }

    /// Adds the liveness endpoint, answering `200 OK` at `liveness_route`.
    ///
    /// ```toml
    /// [http]
    /// liveness_route = "/live"   # Default
    /// ```
    #[must_use]
    pub fn setup_liveness(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::Liveness) {
            return self;
        }

        let liveness_route = self.config.http.liveness_route.clone();
        self.inner = self.inner.route(&liveness_route, get(|| async { "OK\n" }));
        self
    }
}
