//! Request logging.

use super::router::FluentRouter;
use crate::HttpMiddleware;

use {axum::body::Body, http::Request, tower_http::trace::TraceLayer};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up request/response logging.
    ///
    /// Every request runs inside an `http_request` span carrying the method, the
    /// URI as received and the request id, so branch log lines (`Entering mapped
    /// branch`, `Mapped branch failed`) are attributed to their request.
    ///
    /// Log output format is controlled by the `logging.format` configuration.
    #[must_use]
    pub fn setup_logging(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::Logging) {
            return self;
        }

        self.inner = self.inner.layer(TraceLayer::new_for_http().make_span_with(
            |request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            },
        ));

        self
    }
}
