//! Predicate branching: divert requests a predicate accepts into a separately
//! built sub-pipeline. The path is never rewritten.

use {
    super::{
        builder::{BoxFuture, Handler, PipelineBuilder, RequestDelegate},
        context::HttpContext,
    },
    crate::Result,
    std::{fmt, sync::Arc},
};

/// Request test evaluated by a [`MapWhenMiddleware`].
pub type Predicate = Arc<dyn Fn(&HttpContext) -> bool + Send + Sync>;

/// Middleware that runs a branch for requests accepted by a predicate.
///
/// Unlike [`MapPathMiddleware`](super::MapPathMiddleware) it leaves `path` and
/// `path_base` alone, so the branch sees the request exactly as `next` would.
pub struct MapWhenMiddleware {
    next: RequestDelegate,
    predicate: Predicate,
    branch: RequestDelegate,
}

impl MapWhenMiddleware {
    pub fn new(next: RequestDelegate, predicate: Predicate, branch: RequestDelegate) -> Self {
        Self {
            next,
            predicate,
            branch,
        }
    }
}

impl fmt::Debug for MapWhenMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapWhenMiddleware").finish_non_exhaustive()
    }
}

impl Handler for MapWhenMiddleware {
    fn call<'a>(&'a self, ctx: &'a mut HttpContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if !(self.predicate)(ctx) {
                return self.next.call(ctx).await;
            }

            tracing::debug!(
                path = %ctx.path(),
                path_base = %ctx.path_base(),
                "Entering predicate branch"
            );
            self.branch.call(ctx).await
        })
    }
}

impl PipelineBuilder {
    /// Branches the pipeline for requests `predicate` accepts.
    ///
    /// `configure` runs immediately against a fresh builder and the branch is
    /// built once. The predicate runs once per request, before anything else in
    /// the branch, and sees the current `path` and `path_base`.
    ///
    /// ```rust
    /// use axum_mappath::{PipelineBuilder, handler_fn, starts_with_segments};
    ///
    /// # fn example() -> axum_mappath::Result<()> {
    /// const DEV_SERVER: [&str; 3] = ["/webpack-dev-server", "/__webpack_dev_server__", "/sockjs-node"];
    ///
    /// let mut app = PipelineBuilder::new();
    /// app.map_when(
    ///     |ctx| DEV_SERVER.iter().any(|prefix| starts_with_segments(ctx.path(), prefix, false).is_some()),
    ///     |dev| {
    ///         dev.run(handler_fn(|ctx| Box::pin(async move {
    ///             ctx.set_response("dev server");
    ///             Ok(())
    ///         })));
    ///         Ok(())
    ///     },
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Errors returned by `configure` are passed through unchanged and nothing
    /// is appended.
    pub fn map_when<P, F>(&mut self, predicate: P, configure: F) -> Result<&mut Self>
    where
        P: Fn(&HttpContext) -> bool + Send + Sync + 'static,
        F: FnOnce(&mut PipelineBuilder) -> Result<()>,
    {
        let mut branch_builder = self.new_branch();
        configure(&mut branch_builder)?;
        let branch = branch_builder.build();

        let predicate: Predicate = Arc::new(predicate);
        Ok(self.use_middleware(move |next| {
            Arc::new(MapWhenMiddleware::new(next, predicate, branch))
        }))
    }
}
