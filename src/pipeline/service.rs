//! Bridges between pipelines and tower services.
//!
//! [`PipelineService`] exposes a built pipeline as a `tower::Service`, so it can
//! be mounted on an axum `Router` or wrapped in tower layers. [`ServiceHandler`]
//! goes the other way and runs any tower service (a `ServeDir`, a nested
//! `Router`) as the terminal handler of a pipeline or branch.

use {
    super::{
        builder::{BoxFuture, Handler, RequestDelegate},
        context::HttpContext,
    },
    crate::{Error, Result},
    axum::{
        body::Body,
        response::{IntoResponse, Response},
    },
    http::{Request, StatusCode},
    std::{
        convert::Infallible,
        fmt,
        task::{Context, Poll},
    },
    tower::{BoxError, Service, ServiceExt},
};

/// A built pipeline served as a `tower::Service`.
///
/// Each call creates a fresh [`HttpContext`], runs the pipeline and returns
/// the response it produced. A pipeline that finishes without a response
/// answers `404 Not Found`; one that fails answers with the error's own
/// status and JSON body.
#[derive(Clone)]
pub struct PipelineService {
    pipeline: RequestDelegate,
}

impl PipelineService {
    pub fn new(pipeline: RequestDelegate) -> Self {
        Self { pipeline }
    }
}

impl fmt::Debug for PipelineService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineService").finish_non_exhaustive()
    }
}

impl Service<Request<Body>> for PipelineService {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, std::result::Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let pipeline = self.pipeline.clone();

        Box::pin(async move {
            let mut ctx = HttpContext::new(req);

            match pipeline.call(&mut ctx).await {
                Ok(()) => Ok(ctx
                    .take_response()
                    .unwrap_or_else(|| StatusCode::NOT_FOUND.into_response())),
                Err(err) => {
                    tracing::warn!(
                        path = %ctx.path(),
                        path_base = %ctx.path_base(),
                        error = %err,
                        "Pipeline failed"
                    );
                    Ok(err.into_response())
                }
            }
        })
    }
}

/// Runs a tower service as a pipeline handler.
///
/// The service receives a request rebuilt by [`HttpContext::to_request`]: the
/// URI path is the context's current `path` and the consumed prefix travels
/// along as a [`PathBase`](super::context::PathBase) extension. Service errors
/// become [`Handler`](crate::ErrorKind::Handler) errors.
#[derive(Clone)]
pub struct ServiceHandler<S> {
    service: S,
}

impl<S> ServiceHandler<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

impl<S> fmt::Debug for ServiceHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandler").finish_non_exhaustive()
    }
}

impl<S> Handler for ServiceHandler<S>
where
    S: Service<Request<Body>> + Clone + Send + Sync + 'static,
    S::Response: IntoResponse,
    S::Error: Into<BoxError>,
    S::Future: Send + 'static,
{
    fn call<'a>(&'a self, ctx: &'a mut HttpContext) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let request = ctx.to_request()?;
            let response = self
                .service
                .clone()
                .oneshot(request)
                .await
                .map_err(Error::from_service)?;
            ctx.set_response(response);
            Ok(())
        })
    }
}
