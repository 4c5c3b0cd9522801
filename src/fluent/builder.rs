//! Orchestration and router delegation: setup_middleware(), start(), layer(), route(), etc.

use super::router::FluentRouter;
use crate::Result;

use {
    axum::{Router, body::Body, routing::Route},
    http::Request,
    std::{convert::Infallible, env, net::SocketAddr, sync::Arc, time::Duration},
    tokio::{signal, sync::Notify},
    tower::{Layer, Service},
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Installs the host pipeline and all standard middleware layers in order.
    ///
    /// # Middleware Order
    ///
    /// Middleware is processed outside-in for requests and inside-out for responses.
    /// The **last layer added is the outermost layer** and executes **first** on
    /// incoming requests.
    ///
    /// The current order (from innermost to outermost):
    /// 1. **Branches** - The host pipeline becomes the router fallback, behind all routes
    /// 2. **Logging** - Log all requests, branch log lines included
    /// 3. **Timeout** - Set timeout boundary for routes and branches (optional)
    /// 4. **Request ID** - Generate/extract ID before logging sees the request
    /// 5. **Liveness** - Simple health check (always accessible, very early)
    /// 6. **Panic catching** - Catch ALL panics from inner layers (outermost)
    ///
    /// Each step can be switched off with the `include`/`exclude` lists of `[http]`.
    /// Disabling `branches` only skips `[[http.branches]]`; branches added with
    /// `map_path` are still installed.
    ///
    /// # Manual Setup
    ///
    /// Call the individual `setup_*` methods in the same order (innermost first)
    /// for custom stacks:
    ///
    /// ```rust,no_run
    /// # use axum_mappath::{Config, FluentRouter, Result};
    /// # async fn example() -> Result<()> {
    /// let router = FluentRouter::without_state(Config::default())?
    ///     .setup_branches()?
    ///     .setup_logging()
    ///     .setup_timeout()
    ///     .setup_request_id()
    ///     .setup_liveness()
    ///     .setup_catch_panic();
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the host pipeline was already installed or a branch
    /// cannot be mounted.
    pub async fn setup_middleware(self) -> Result<Self> {
        const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");
        const VERSION: &str = env!("CARGO_PKG_VERSION");
        tracing::info!("Starting {PACKAGE_NAME} version {VERSION}...");

        let router = self
            .setup_branches()? // 1. Host pipeline as fallback
            .setup_logging() // 2. Request/response logging
            .setup_timeout() // 3. Request timeout (optional)
            .setup_request_id() // 4. Request ID - early so all requests get IDs
            .setup_liveness() // 5. Liveness endpoint (always accessible, very early)
            .setup_catch_panic(); // 6. Outermost - panic recovery

        Ok(router)
    }

    /// Starts the HTTP server based on the current configuration.
    ///
    /// If the host pipeline has not been installed yet it is installed first, so
    /// branches added with `map_path` are served even without `setup_middleware()`.
    ///
    /// # Graceful Shutdown
    ///
    /// On SIGTERM or SIGINT the server stops accepting connections and waits for
    /// in-flight requests, including requests inside a branch, for up to
    /// `shutdown_timeout`. When the timeout expires the remaining requests are
    /// dropped.
    pub async fn start(self) -> Result<()> {
        let router = if self.pipeline.is_some() {
            self.setup_branches()?
        } else {
            self
        };

        let bind_addr = router.config.http.full_bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Bound to {}", &bind_addr);
        tracing::info!("Waiting for connections");

        let shutdown_timeout = router.config.http.shutdown_timeout;
        let service = router
            .inner
            .with_state(router.state)
            .into_make_service_with_connect_info::<SocketAddr>();

        let shutdown_started = Arc::new(Notify::new());
        let serve_future = axum::serve(listener, service).with_graceful_shutdown(
            shutdown_signal(shutdown_timeout, shutdown_started.clone()),
        );

        // The grace period only starts once a signal has been received.
        tokio::select! {
            result = serve_future => {
                tracing::info!("Graceful shutdown completed");
                result?;
            }
            _ = async {
                shutdown_started.notified().await;
                tokio::time::sleep(shutdown_timeout).await;
            } => {
                tracing::warn!("Graceful shutdown timeout expired, forcing shutdown");
            }
        }

        Ok(())
    }

    /// Adds a custom Tower middleware layer to the router.
    ///
    /// Layers wrap the routes and the installed host pipeline alike.
    ///
    /// ```rust,no_run
    /// use tower::limit::ConcurrencyLimitLayer;
    /// # use axum_mappath::{Config, FluentRouter};
    /// # fn example() -> axum_mappath::Result<()> {
    ///
    /// let router = FluentRouter::without_state(Config::default())?
    ///     .layer(ConcurrencyLimitLayer::new(100));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request<Body>> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request<Body>>>::Response: axum::response::IntoResponse + 'static,
        <L::Service as Service<Request<Body>>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request<Body>>>::Future: Send + 'static,
    {
        self.inner = self.inner.layer(layer);
        self
    }

    /// Adds a new route to the router at the specified path.
    ///
    /// Routes take precedence over branches: `/app/health` registered here is
    /// answered by its handler even when a branch maps `/app`.
    ///
    /// ```
    /// use axum_mappath::{Config, FluentRouter};
    /// use axum::routing::get;
    ///
    /// # async fn example() {
    /// let router = FluentRouter::without_state(Config::default())
    ///     .unwrap()
    ///     .route("/hello", get(|| async { "Hello, World!" }))
    ///     .into_inner();
    /// # }
    /// ```
    #[must_use]
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter<State>) -> Self {
        self.inner = self.inner.route(path, route);
        self
    }

    /// Nests another router at a specific path prefix.
    #[must_use]
    pub fn nest(mut self, path: &str, router: Router<State>) -> Self {
        self.inner = self.inner.nest(path, router);
        self
    }

    /// Merges another router into this one.
    #[must_use]
    pub fn merge(mut self, other: Router<State>) -> Self {
        self.inner = self.inner.merge(other);
        self
    }

    /// Consumes the `FluentRouter` and returns the underlying `axum::Router`.
    ///
    /// The host pipeline is part of the returned router only if
    /// `setup_branches()` (or `setup_middleware()`) ran before.
    pub fn into_inner(self) -> Router<State> {
        self.inner
    }
}

/// Resolves on SIGTERM or SIGINT (Ctrl+C), after waking `shutdown_started`.
///
/// If a signal handler cannot be installed, a warning is logged and that
/// signal is never reported.
async fn shutdown_signal(timeout: Duration, shutdown_started: Arc<Notify>) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::debug!("Ctrl+C signal received"),
            Err(err) => {
                tracing::warn!("Failed to install Ctrl+C handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal_handler) => {
                signal_handler.recv().await;
                tracing::debug!("SIGTERM signal received");
            }
            Err(err) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!(
        "Shutdown signal received, starting graceful shutdown (timeout: {}s)",
        timeout.as_secs()
    );
    shutdown_started.notify_one();
}
