//! Middleware-specific tests for FluentRouter
//!
//! Tests are organized by middleware type in separate modules. Branch
//! behaviour lives in `super::branches`.

mod catch_panic;
mod config;
mod liveness;
mod request_id;
mod timeout;
