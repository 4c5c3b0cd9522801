//! Request ID generation and propagation.

use super::router::FluentRouter;
use crate::HttpMiddleware;

use {
    crate::utils::RequestIdGenerator,
    http::HeaderName,
    tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up request ID generation and propagation.
    ///
    /// Adds two middleware layers:
    /// 1. Generates or preserves `x-request-id` headers
    /// 2. Copies the request ID, generated or not, to response headers
    ///
    /// The header is part of the request a branch sees, so services mounted in a
    /// branch can log the same id.
    #[must_use]
    pub fn setup_request_id(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::RequestId) {
            return self;
        }

        let x_request_id = HeaderName::from_static("x-request-id");
        // Set runs first so generated ids reach the propagation layer too.
        self.inner = self
            .inner
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, RequestIdGenerator));
        self
    }
}
