//! Panic catching.

use super::router::FluentRouter;
use crate::HttpMiddleware;

use {
    http::{Response, StatusCode},
    tower_http::catch_panic::CatchPanicLayer,
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Sets up panic catching middleware.
    ///
    /// Catches panics in route handlers and in branch handlers and answers
    /// `500 Internal Server Error` instead of dropping the connection. A branch
    /// that panics has already put the request's `path` and `path_base` back by
    /// the time the panic reaches this layer.
    ///
    /// The panic message is logged and, if configured with
    /// `with_panic_notification_channel()`, sent to the notification channel.
    ///
    /// This middleware is automatically included in `setup_middleware()` as the
    /// outermost layer.
    #[must_use]
    pub fn setup_catch_panic(mut self) -> Self {
        if !self.is_middleware_enabled(HttpMiddleware::CatchPanic) {
            return self;
        }

        let panic_channel = self.panic_channel.clone();
        self.inner = self.inner.layer(CatchPanicLayer::custom(
            move |err: Box<dyn std::any::Any + Send + 'static>| {
                let msg = if let Some(s) = err.downcast_ref::<String>() {
                    format!("Service panicked: {}", s)
                } else if let Some(s) = err.downcast_ref::<&str>() {
                    format!("Service panicked: {}", s)
                } else {
                    "`CatchPanic` was unable to downcast the panic info".to_string()
                };

                tracing::error!("{}", msg);
                if let Some(ch) = &panic_channel {
                    ch.try_send(msg).ok();
                }

                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
                    .body("Internal Server Error".to_string())
                    .unwrap_or_else(|_| Response::new("Internal Server Error".to_string()))
            },
        ));
        self
    }
}
