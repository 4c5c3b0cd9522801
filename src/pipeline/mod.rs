//! Request pipelines with path branching.
//!
//! A pipeline is a chain of [`Handler`]s assembled by a [`PipelineBuilder`].
//! [`PipelineBuilder::map_path`] splits it: requests whose path starts with a
//! prefix (on a segment boundary) run a separately built branch, and all other
//! requests continue down the main chain. [`PipelineBuilder::map_when`] does
//! the same for an arbitrary request predicate and leaves the path alone.

mod builder;
mod context;
mod map_path;
mod map_when;
mod path;
mod service;

pub use builder::{BoxFuture, Handler, HandlerFn, PipelineBuilder, RequestDelegate, handler_fn};
pub use context::{HttpContext, PathBase};
pub use map_path::{MapPathMiddleware, MapPathOptions};
pub use map_when::{MapWhenMiddleware, Predicate};
pub use path::{starts_with_segments, validate_path_match};
pub use service::{PipelineService, ServiceHandler};
