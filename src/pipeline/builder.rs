//! Handler trait and the builder that chains handlers into a pipeline.

use {
    super::{context::HttpContext, service::ServiceHandler},
    crate::Result,
    axum::{body::Body, response::IntoResponse},
    http::{Request, StatusCode},
    std::{fmt, future::Future, pin::Pin, sync::Arc},
    tower::{BoxError, Service},
};

/// A boxed, `Send` future borrowing from the request context.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A step of a request pipeline.
///
/// A handler runs against a mutable [`HttpContext`]. It may set a response,
/// call the handler it wraps, or fail with an [`Error`](crate::Error).
/// Handlers are built once and shared read-only between concurrent requests.
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, ctx: &'a mut HttpContext) -> BoxFuture<'a, Result<()>>;
}

/// A built, shareable handler. This is what middleware receives as `next`.
pub type RequestDelegate = Arc<dyn Handler>;

/// Adapts a closure into a [`Handler`].
///
/// ```rust
/// use axum_mappath::{PipelineBuilder, handler_fn};
///
/// let mut pipeline = PipelineBuilder::new();
/// pipeline.run(handler_fn(|ctx| {
///     Box::pin(async move {
///         let body = format!("hello from {}", ctx.path());
///         ctx.set_response(body);
///         Ok(())
///     })
/// }));
/// let handler = pipeline.build();
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(&'a mut HttpContext) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
{
    HandlerFn { f }
}

/// Handler returned by [`handler_fn`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F> {
    f: F,
}

impl<F> Handler for HandlerFn<F>
where
    F: for<'a> Fn(&'a mut HttpContext) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, ctx: &'a mut HttpContext) -> BoxFuture<'a, Result<()>> {
        (self.f)(ctx)
    }
}

impl<F> fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

/// Terminal handler of every pipeline: answers `404 Not Found` unless an
/// earlier handler already produced a response.
struct NotFound;

impl Handler for NotFound {
    fn call<'a>(&'a self, ctx: &'a mut HttpContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if !ctx.has_response() {
                ctx.set_response(StatusCode::NOT_FOUND);
            }
            Ok(())
        })
    }
}

type Component = Box<dyn FnOnce(RequestDelegate) -> RequestDelegate + Send>;

/// Assembles handlers into a pipeline.
///
/// Components are added in request order: the first one added sees the request
/// first. Each component receives the rest of the chain as `next` when the
/// pipeline is built. A built pipeline ends with a handler answering
/// `404 Not Found`.
///
/// ```rust
/// use axum_mappath::{PipelineBuilder, handler_fn};
///
/// # fn example() -> axum_mappath::Result<()> {
/// let mut app = PipelineBuilder::new();
/// app.map_path("/app", true, |branch| {
///     branch.run(handler_fn(|ctx| Box::pin(async move {
///         ctx.set_response(format!("spa asset {}", ctx.path()));
///         Ok(())
///     })));
///     Ok(())
/// })?;
/// let pipeline = app.build();
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct PipelineBuilder {
    components: Vec<Component>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh, empty builder for a sub-pipeline.
    ///
    /// The new builder shares nothing with `self`; components added to one are
    /// never seen by the other.
    pub fn new_branch(&self) -> Self {
        Self::new()
    }

    /// Appends a component that wraps the rest of the chain.
    pub fn use_middleware<F>(&mut self, middleware: F) -> &mut Self
    where
        F: FnOnce(RequestDelegate) -> RequestDelegate + Send + 'static,
    {
        self.components.push(Box::new(middleware));
        self
    }

    /// Appends a terminal handler. Components added after it are never reached.
    pub fn run<H: Handler>(&mut self, handler: H) -> &mut Self {
        let handler: RequestDelegate = Arc::new(handler);
        self.use_middleware(move |_next| handler)
    }

    /// Appends a tower service as the terminal handler.
    ///
    /// The service receives the request with the current (possibly stripped)
    /// path. See [`ServiceHandler`].
    pub fn run_service<S>(&mut self, service: S) -> &mut Self
    where
        S: Service<Request<Body>> + Clone + Send + Sync + 'static,
        S::Response: IntoResponse,
        S::Error: Into<BoxError>,
        S::Future: Send + 'static,
    {
        self.run(ServiceHandler::new(service))
    }

    /// Number of components added so far.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Finalizes the pipeline into a single shareable handler.
    pub fn build(self) -> RequestDelegate {
        let terminal: RequestDelegate = Arc::new(NotFound);
        self.components
            .into_iter()
            .rev()
            .fold(terminal, |next, component| component(next))
    }
}

impl fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("components", &self.components.len())
            .finish()
    }
}
