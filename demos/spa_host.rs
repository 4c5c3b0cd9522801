//! SPA Host Example
//!
//! Serves a single page application under `/app` next to a JSON API under
//! `/api`, both as path branches of one server.
//!
//! Run with:
//! ```bash
//! SPA_DIST_DIR=tests/spa cargo run --example spa_host
//! ```
//!
//! Then test:
//! ```bash
//! # Static asset, looked up without the /app prefix
//! curl http://localhost:3000/app/assets/main.js
//!
//! # Client-side route, answered with index.html
//! curl http://localhost:3000/app/settings/profile
//!
//! # API branch, the router only knows /orders and /whoami
//! curl http://localhost:3000/api/orders
//! curl http://localhost:3000/api/whoami
//!
//! # Explicit route, wins over the /api branch
//! curl http://localhost:3000/api/version
//! ```

use axum::{Extension, Json, Router, routing::get};
use axum_mappath::{Config, FluentRouter, PathBase, Result};
use serde::Serialize;

#[derive(Serialize)]
struct Order {
    id: u32,
    item: &'static str,
}

async fn list_orders() -> Json<Vec<Order>> {
    Json(vec![
        Order { id: 1, item: "keyboard" },
        Order { id: 2, item: "monitor" },
    ])
}

async fn whoami(Extension(PathBase(base)): Extension<PathBase>) -> String {
    format!("api mounted at {base}\n")
}

#[tokio::main]
async fn main() -> Result<()> {
    let config: Config = r#"
[http]
bind_addr = "127.0.0.1"
bind_port = 3000
request_timeout = "30s"

[[http.branches]]
path = "/app"
directory = "{{ SPA_DIST_DIR }}"
spa_fallback = true
cache_max_age = 300

[logging]
format = "pretty"
"#
    .parse()?;
    config.setup_tracing();

    let api = Router::new()
        .route("/orders", get(list_orders))
        .route("/whoami", get(whoami));

    FluentRouter::without_state(config)?
        .route("/api/version", get(|| async { "v1\n" }))
        .map_path("/api", true, move |branch| {
            branch.run_service(api);
            Ok(())
        })?
        .setup_middleware()
        .await?
        .start()
        .await
}
