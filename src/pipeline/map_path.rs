//! Path branching: divert requests whose path starts with a prefix into a
//! separately built sub-pipeline.
//!
//! [`PipelineBuilder::map_path`] builds the branch once, at assembly time, and
//! installs a [`MapPathMiddleware`] closing over the resulting
//! [`MapPathOptions`]. At request time the middleware tests the prefix on a
//! segment boundary. Non-matching requests go to `next` untouched. Matching
//! requests run the branch, optionally with the matched prefix moved from
//! `path` to `path_base`. The original `path` and `path_base` are put back when
//! the branch finishes, fails, panics or is cancelled.

use {
    super::{
        builder::{BoxFuture, Handler, PipelineBuilder, RequestDelegate},
        context::HttpContext,
        path::{starts_with_segments, validate_path_match},
    },
    crate::Result,
    std::{
        fmt,
        ops::{Deref, DerefMut},
        sync::Arc,
    },
};

/// The immutable rule a [`MapPathMiddleware`] evaluates.
///
/// Prefixes are compared case-sensitively unless [`ignore_case`](Self::ignore_case)
/// is set. ASP.NET's `StartsWithSegments` ignores case by default, so an app
/// moved over from such a host may need `ignore_case(true)` to keep matching
/// `/App` against `/app`. The comparison runs on the raw, still percent-encoded
/// path (see [`HttpContext::new`]).
#[derive(Clone)]
pub struct MapPathOptions {
    path_match: String,
    remove_matched_segment: bool,
    ignore_case: bool,
    branch: RequestDelegate,
}

impl MapPathOptions {
    /// Creates a rule, validating `path_match`.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidArgument`](crate::ErrorKind::InvalidArgument) error when
    /// `path_match` is empty, does not start with `/`, or ends with `/`.
    pub fn new(
        path_match: impl Into<String>,
        remove_matched_segment: bool,
        branch: RequestDelegate,
    ) -> Result<Self> {
        let path_match = path_match.into();
        validate_path_match(&path_match)?;

        Ok(Self {
            path_match,
            remove_matched_segment,
            ignore_case: false,
            branch,
        })
    }

    /// Compares the prefix ASCII case-insensitively.
    #[must_use]
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn path_match(&self) -> &str {
        &self.path_match
    }

    pub fn remove_matched_segment(&self) -> bool {
        self.remove_matched_segment
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn branch(&self) -> &RequestDelegate {
        &self.branch
    }
}

impl fmt::Debug for MapPathOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapPathOptions")
            .field("path_match", &self.path_match)
            .field("remove_matched_segment", &self.remove_matched_segment)
            .field("ignore_case", &self.ignore_case)
            .finish_non_exhaustive()
    }
}

/// Middleware that runs a branch for requests under a path prefix.
pub struct MapPathMiddleware {
    next: RequestDelegate,
    options: MapPathOptions,
}

impl MapPathMiddleware {
    pub fn new(next: RequestDelegate, options: MapPathOptions) -> Self {
        Self { next, options }
    }

    pub fn options(&self) -> &MapPathOptions {
        &self.options
    }
}

impl Handler for MapPathMiddleware {
    fn call<'a>(&'a self, ctx: &'a mut HttpContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let options = &self.options;
            let Some((matched, remaining)) =
                starts_with_segments(ctx.path(), &options.path_match, options.ignore_case)
                    .map(|(matched, remaining)| (matched.to_owned(), remaining.to_owned()))
            else {
                return self.next.call(ctx).await;
            };

            tracing::debug!(
                path_match = %options.path_match,
                path = %ctx.path(),
                path_base = %ctx.path_base(),
                remove_matched_segment = options.remove_matched_segment,
                "Entering mapped branch"
            );

            let result = {
                let mut scope = PathScope::enter(&mut *ctx);
                if options.remove_matched_segment {
                    let path_base = format!("{}{}", scope.path_base(), matched);
                    scope.set_path_base(path_base);
                    scope.set_path(remaining);
                }
                options.branch.call(&mut scope).await
            };

            if let Err(err) = &result {
                tracing::debug!(
                    path_match = %options.path_match,
                    path = %ctx.path(),
                    path_base = %ctx.path_base(),
                    error = %err,
                    "Mapped branch failed"
                );
            }

            result
        })
    }
}

/// Saves `path` and `path_base` on entry and writes them back on drop.
///
/// Dropping happens when the branch returns, when it fails, when a panic
/// unwinds through it, and when the request future is dropped mid-branch.
struct PathScope<'a> {
    ctx: &'a mut HttpContext,
    path: String,
    path_base: String,
}

impl<'a> PathScope<'a> {
    fn enter(ctx: &'a mut HttpContext) -> Self {
        let path = ctx.path().to_owned();
        let path_base = ctx.path_base().to_owned();
        Self {
            ctx,
            path,
            path_base,
        }
    }
}

impl Deref for PathScope<'_> {
    type Target = HttpContext;

    fn deref(&self) -> &HttpContext {
        self.ctx
    }
}

impl DerefMut for PathScope<'_> {
    fn deref_mut(&mut self) -> &mut HttpContext {
        self.ctx
    }
}

impl Drop for PathScope<'_> {
    fn drop(&mut self) {
        self.ctx.set_path(std::mem::take(&mut self.path));
        self.ctx.set_path_base(std::mem::take(&mut self.path_base));
    }
}

impl PipelineBuilder {
    /// Branches the pipeline for requests whose path starts with `path_match`.
    ///
    /// `configure` runs immediately against a fresh builder; the branch it
    /// assembles is built once and shared by every request. When
    /// `remove_matched_segment` is true the branch sees the matched prefix moved
    /// from `path` to `path_base`. When false the branch sees the full path,
    /// which suits branches that forward the original path elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`](crate::ErrorKind::InvalidArgument) for a
    /// malformed `path_match` (for example `"/app/"`), before `configure` runs.
    /// Errors returned by `configure` are passed through unchanged.
    ///
    /// ```rust
    /// use axum_mappath::{ErrorKind, PipelineBuilder};
    ///
    /// let mut app = PipelineBuilder::new();
    /// let err = app.map_path("/app/", true, |_| Ok(())).unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    /// ```
    pub fn map_path<F>(
        &mut self,
        path_match: &str,
        remove_matched_segment: bool,
        configure: F,
    ) -> Result<&mut Self>
    where
        F: FnOnce(&mut PipelineBuilder) -> Result<()>,
    {
        validate_path_match(path_match)?;

        let mut branch_builder = self.new_branch();
        configure(&mut branch_builder)?;
        let branch = branch_builder.build();

        let options = MapPathOptions::new(path_match, remove_matched_segment, branch)?;
        Ok(self.map_path_with(options))
    }

    /// Installs a rule built by hand, e.g. one with [`MapPathOptions::ignore_case`].
    pub fn map_path_with(&mut self, options: MapPathOptions) -> &mut Self {
        self.use_middleware(move |next| Arc::new(MapPathMiddleware::new(next, options)))
    }
}
