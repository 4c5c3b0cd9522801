//! Core FluentRouter struct and initialization methods.

use {
    crate::{Config, HttpMiddleware, PipelineBuilder, Result},
    axum::Router,
};

/// Fluent builder for axum::Router with configuration-based middleware setup.
///
/// This wrapper around `axum::Router` provides a fluent API for configuring routes,
/// path branches and middleware based on the application configuration. Create
/// instances using [`FluentRouter::without_state`] or [`FluentRouter::with_state`].
///
/// Alongside the axum router it carries a host [`PipelineBuilder`]. Branches added
/// with [`FluentRouter::map_path`] or declared as `[[http.branches]]` go into that
/// pipeline, which [`FluentRouter::setup_branches`] installs as the router's
/// fallback. Explicit routes therefore always win over branches.
///
/// ```rust,no_run
/// use axum::routing::get;
/// use axum_mappath::{Config, FluentRouter, Result};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let config = Config::default();
///     config.setup_tracing();
///
///     FluentRouter::without_state(config)?
///         .route("/api/ping", get(|| async { "pong" }))
///         .setup_middleware()
///         .await?
///         .start()
///         .await
/// }
/// ```
pub struct FluentRouter<State = ()> {
    pub(crate) config: Config,
    pub(crate) state: State,
    pub(crate) inner: Router<State>,
    pub(crate) pipeline: Option<PipelineBuilder>,
    pub(crate) panic_channel: Option<tokio::sync::mpsc::Sender<String>>,
}

impl FluentRouter {
    /// Creates a new `FluentRouter` without application state.
    pub fn without_state(config: Config) -> Result<FluentRouter<()>> {
        FluentRouter::<()>::with_state(config, ())
    }
}

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Creates a new `FluentRouter` with the provided configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails, including an
    /// [`InvalidArgument`](crate::ErrorKind::InvalidArgument) error for a
    /// malformed `[[http.branches]] path`.
    pub fn with_state<S: Clone + Send + Sync + 'static>(
        config: Config,
        state: S,
    ) -> Result<FluentRouter<S>> {
        config.validate()?;

        Ok(FluentRouter {
            config,
            state,
            inner: Router::new(),
            pipeline: Some(PipelineBuilder::new()),
            panic_channel: None,
        })
    }

    /// Returns the configuration this router was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Helper method to check if a middleware is enabled in the configuration.
    /// Returns true if no middleware config is specified (all enabled by default),
    /// or if the middleware is explicitly enabled/not excluded.
    pub(crate) fn is_middleware_enabled(&self, middleware: HttpMiddleware) -> bool {
        self.config
            .http
            .middleware
            .as_ref()
            .map(|config| config.is_enabled(middleware))
            .unwrap_or(true)
    }

    /// Sets a notification channel for panic messages.
    ///
    /// When configured, any panics caught by the panic handler middleware, including
    /// panics raised inside a branch, send a message to this channel.
    ///
    /// ```rust,no_run
    /// # use axum_mappath::{Config, FluentRouter};
    /// # async fn example() -> axum_mappath::Result<()> {
    /// let (tx, mut rx) = tokio::sync::mpsc::channel(100);
    ///
    /// let router = FluentRouter::without_state(Config::default())?
    ///     .with_panic_notification_channel(tx);
    ///
    /// tokio::spawn(async move {
    ///     while let Some(panic_msg) = rx.recv().await {
    ///         eprintln!("Panic caught: {}", panic_msg);
    ///     }
    /// });
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn with_panic_notification_channel(self, ch: tokio::sync::mpsc::Sender<String>) -> Self {
        Self {
            panic_channel: Some(ch),
            ..self
        }
    }
}
