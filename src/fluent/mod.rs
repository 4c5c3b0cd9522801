//! FluentRouter: the axum host for path branches.
//!
//! The functionality is split across submodules:
//!
//! - [`router`] - Core `FluentRouter` struct and initialization
//! - [`branches`] - Host pipeline (`map_path`, `[[http.branches]]`, `setup_branches`)
//! - [`observability`] - Request logging
//! - [`request`] - Request ID
//! - [`features`] - Liveness probe, request timeout
//! - [`control`] - Panic catching
//! - [`builder`] - Orchestration (setup_middleware, start, router delegation)

mod branches;
mod builder;
mod control;
mod features;
mod observability;
mod request;
mod router;

pub use router::FluentRouter;

#[cfg(test)]
mod tests;
