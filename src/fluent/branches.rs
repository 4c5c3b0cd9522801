//! Branches on the host pipeline: map_path(), map_when(), setup_branches().

use super::router::FluentRouter;
use crate::{
    BoxFuture, BranchConfig, Error, Handler, HttpContext, HttpMiddleware, MapPathOptions,
    PipelineBuilder, PipelineService, RequestDelegate, Result,
};

use {
    axum::{
        body::Body,
        response::{IntoResponse, Response},
    },
    http::{
        HeaderValue, Request,
        header::{CACHE_CONTROL, LOCATION},
    },
    std::{convert::Infallible, path::Path, sync::Arc},
    tower::{Service, ServiceBuilder, ServiceExt},
    tower_http::{
        services::{ServeDir, ServeFile},
        set_header::SetResponseHeaderLayer,
    },
};

impl<State> FluentRouter<State>
where
    State: Clone + Send + Sync + 'static,
{
    /// Adds a branch to the host pipeline for requests under `path_match`.
    ///
    /// `configure` assembles the branch right away. Requests reach the branch only
    /// if no route of the axum router matched them, and only once
    /// [`setup_branches`](Self::setup_branches) (or `setup_middleware`) has run.
    ///
    /// ```rust,no_run
    /// use axum::{Router, routing::get};
    /// use axum_mappath::{Config, FluentRouter};
    /// use tower_http::services::ServeDir;
    ///
    /// # async fn example() -> axum_mappath::Result<()> {
    /// let admin = Router::new().route("/stats", get(|| async { "stats" }));
    ///
    /// FluentRouter::without_state(Config::default())?
    ///     .map_path("/app", true, |branch| {
    ///         branch.run_service(ServeDir::new("ClientApp/dist"));
    ///         Ok(())
    ///     })?
    ///     .map_path("/admin", true, move |branch| {
    ///         branch.run_service(admin);
    ///         Ok(())
    ///     })?
    ///     .setup_middleware()
    ///     .await?
    ///     .start()
    ///     .await
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Fails with [`InvalidArgument`](crate::ErrorKind::InvalidArgument) for a
    /// malformed `path_match`, or when the host pipeline has already been installed.
    /// Errors returned by `configure` are passed through.
    pub fn map_path<F>(
        mut self,
        path_match: &str,
        remove_matched_segment: bool,
        configure: F,
    ) -> Result<Self>
    where
        F: FnOnce(&mut PipelineBuilder) -> Result<()>,
    {
        self.pipeline_mut()?
            .map_path(path_match, remove_matched_segment, configure)?;
        Ok(self)
    }

    /// Adds a prepared branch rule to the host pipeline.
    pub fn map_path_with(mut self, options: MapPathOptions) -> Result<Self> {
        self.pipeline_mut()?.map_path_with(options);
        Ok(self)
    }

    /// Adds a branch to the host pipeline for requests `predicate` accepts.
    ///
    /// The branch sees the request path unchanged. Like [`map_path`](Self::map_path)
    /// it only receives requests no route matched.
    ///
    /// # Errors
    ///
    /// Fails with [`InvalidArgument`](crate::ErrorKind::InvalidArgument) when the
    /// host pipeline has already been installed. Errors returned by `configure`
    /// are passed through.
    pub fn map_when<P, F>(mut self, predicate: P, configure: F) -> Result<Self>
    where
        P: Fn(&HttpContext) -> bool + Send + Sync + 'static,
        F: FnOnce(&mut PipelineBuilder) -> Result<()>,
    {
        self.pipeline_mut()?.map_when(predicate, configure)?;
        Ok(self)
    }

    /// Installs the host pipeline as the fallback of the axum router.
    ///
    /// The `[[http.branches]]` entries are appended first, in the order they are
    /// configured, unless the `branches` middleware is disabled. Branches added
    /// with [`map_path`](Self::map_path) are always kept and come before them.
    /// Nothing is installed when the pipeline is empty, so the router keeps its
    /// default 404 fallback.
    ///
    /// # Errors
    ///
    /// Fails when called twice, or when a configured cache header cannot be built.
    pub fn setup_branches(mut self) -> Result<Self> {
        let mut pipeline = self.pipeline.take().ok_or_else(|| {
            Error::invalid_argument("The host pipeline has already been installed")
        })?;

        if self.is_middleware_enabled(HttpMiddleware::Branches) {
            for branch in &self.config.http.branches {
                mount_directory_branch(&mut pipeline, branch)?;
                tracing::info!(
                    path = %branch.path,
                    directory = %branch.directory,
                    remove_matched_segment = branch.remove_matched_segment,
                    spa_fallback = branch.spa_fallback,
                    "Mounted directory branch"
                );
            }
        }

        if !pipeline.is_empty() {
            tracing::debug!(stages = pipeline.len(), "Installing host pipeline");
            self.inner = self
                .inner
                .fallback_service(PipelineService::new(pipeline.build()));
        }

        Ok(self)
    }

    fn pipeline_mut(&mut self) -> Result<&mut PipelineBuilder> {
        self.pipeline.as_mut().ok_or_else(|| {
            Error::invalid_argument(
                "Branches must be added before the host pipeline is installed by setup_branches()",
            )
        })
    }
}

/// Adds a branch serving `branch.directory` to `pipeline`.
fn mount_directory_branch(pipeline: &mut PipelineBuilder, branch: &BranchConfig) -> Result<()> {
    let cache_control = branch
        .cache_max_age
        .map(|max_age| HeaderValue::from_str(&format!("public, max-age={max_age}")))
        .transpose()?;

    let mut branch_builder = pipeline.new_branch();
    branch_builder.use_middleware(|next| Arc::new(RebaseRedirects { next }));
    let serve_dir = ServeDir::new(&branch.directory).append_index_html_on_directories(true);

    if branch.spa_fallback {
        let index = Path::new(&branch.directory).join("index.html");
        run_directory(
            &mut branch_builder,
            ServiceExt::<Request<Body>>::map_response(
                serve_dir.fallback(ServeFile::new(index)),
                IntoResponse::into_response,
            ),
            cache_control,
        );
    } else {
        run_directory(
            &mut branch_builder,
            ServiceExt::<Request<Body>>::map_response(serve_dir, IntoResponse::into_response),
            cache_control,
        );
    }

    let options = MapPathOptions::new(
        branch.path.as_str(),
        branch.remove_matched_segment,
        branch_builder.build(),
    )?
    .ignore_case(branch.ignore_case);
    pipeline.map_path_with(options);

    Ok(())
}

/// Puts the branch's `path_base` back in front of root-relative redirects.
///
/// `ServeDir` answers `/assets` with a redirect to `/assets/`, built from the
/// stripped path it was handed.
struct RebaseRedirects {
    next: RequestDelegate,
}

impl Handler for RebaseRedirects {
    fn call<'a>(&'a self, ctx: &'a mut HttpContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.next.call(ctx).await?;

            let path_base = ctx.path_base().to_owned();
            if path_base.is_empty() {
                return Ok(());
            }
            let Some(response) = ctx.response_mut() else {
                return Ok(());
            };
            if !response.status().is_redirection() {
                return Ok(());
            }

            let location = match response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
            {
                Some(location) if location.starts_with('/') && !location.starts_with("//") => {
                    format!("{path_base}{location}")
                }
                _ => return Ok(()),
            };
            response
                .headers_mut()
                .insert(LOCATION, HeaderValue::from_str(&location)?);
            Ok(())
        })
    }
}

fn run_directory<S>(builder: &mut PipelineBuilder, service: S, cache_control: Option<HeaderValue>)
where
    S: Service<Request<Body>, Response = Response, Error = Infallible>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
{
    match cache_control {
        Some(value) => builder.run_service(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(CACHE_CONTROL, value))
                .service(service),
        ),
        None => builder.run_service(service),
    };
}
