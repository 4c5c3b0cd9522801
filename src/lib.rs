//! # axum-mappath
//!
//! Path branching for Axum services: requests whose path starts with a given
//! prefix, on a segment boundary, are handed to a separate sub-pipeline. The
//! matched prefix can be moved from the request path into a path base while the
//! branch runs, and both are put back afterwards, whether the branch succeeds,
//! fails, panics or is cancelled.
//!
//! The typical use is hosting a single page application build under `/app`
//! next to an API, with both configured through TOML.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use axum_mappath::{Config, FluentRouter, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::default();  // Loads from config/{RUST_ENV}.toml
//!     config.setup_tracing();
//!
//!     let admin = Router::new().route("/stats", get(|| async { "stats" }));
//!
//!     FluentRouter::without_state(config)?
//!         .route("/", get(|| async { "Hello, World!" }))
//!         .map_path("/admin", true, move |branch| {
//!             branch.run_service(admin);
//!             Ok(())
//!         })?
//!         .setup_middleware()
//!         .await?
//!         .start()
//!         .await
//! }
//! ```
//!
//! With `config/dev.toml`:
//! ```toml
//! [http]
//! bind_port = 3000
//!
//! [[http.branches]]
//! path = "/app"
//! directory = "{{ SPA_DIST_DIR }}"
//! spa_fallback = true
//! ```
//!
//! Run with `RUST_ENV=dev cargo run`.
//!
//! # Matching
//!
//! A prefix matches on whole segments only: `/app` matches `/app` and
//! `/app/main.js` but not `/application`. See [`starts_with_segments`].
//! Matching is case-sensitive unless [`MapPathOptions::ignore_case`] is set,
//! and runs on the raw, percent-encoded path.
//!
//! | Request | `remove_matched_segment` | Branch sees `path_base` / `path` |
//! |---------|--------------------------|----------------------------------|
//! | `/app/main.js` | `true` | `/app` / `/main.js` |
//! | `/app` | `true` | `/app` / (empty) |
//! | `/app/main.js` | `false` | (empty) / `/app/main.js` |
//!
//! # Pipelines
//!
//! [`PipelineBuilder`] assembles [`Handler`]s into a pipeline, with
//! [`PipelineBuilder::map_path`] adding path branches and
//! [`PipelineBuilder::map_when`] adding branches on any request predicate.
//! [`PipelineService`] serves a
//! built pipeline as a tower service, and tower services (a `ServeDir`, an axum
//! `Router`) run inside a pipeline through [`PipelineBuilder::run_service`].
//! Services inside a branch see the stripped path in the request URI and the
//! consumed prefix as a [`PathBase`] extension.
//!
//! ```rust
//! use axum_mappath::{PipelineBuilder, PipelineService, handler_fn};
//!
//! # fn example() -> axum_mappath::Result<()> {
//! let mut app = PipelineBuilder::new();
//! app.map_path("/tenants", true, |tenants| {
//!     tenants.run(handler_fn(|ctx| Box::pin(async move {
//!         let body = format!("tenant path {}", ctx.path());
//!         ctx.set_response(body);
//!         Ok(())
//!     })));
//!     Ok(())
//! })?;
//! let service = PipelineService::new(app.build());
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! The library uses a custom [`Result`] type. Errors from branch handlers
//! propagate unchanged to the caller; at the HTTP boundary they convert to
//! structured JSON responses:
//!
//! ```json
//! {
//!   "error_code": "INVALID_INPUT",
//!   "message": "missing tenant"
//! }
//! ```
//!
//! # Middleware Control
//!
//! Enable or disable specific middleware:
//!
//! ```toml
//! [http]
//! exclude = ["timeout", "branches"]
//! ```
mod config;
mod error;
mod fluent;
mod pipeline;
mod utils;

pub use config::*;
pub use error::*;
pub use fluent::*;
pub use pipeline::*;
pub use utils::*;

pub type Result<T> = std::result::Result<T, Error>;
