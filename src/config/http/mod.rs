mod branch;
mod middleware;

pub use branch::*;
pub use middleware::*;

use {crate::Result, serde::Deserialize, std::time::Duration};

///
/// Configuration for the HTTP server
///
/// This configuration controls the binding address and port, request and
/// shutdown timeouts, the liveness route, and the static branches mounted on
/// the host pipeline.
///
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// IP address to bind the HTTP server to
    /// The default `bind_addr` is "127.0.0.1".
    #[serde(default = "HttpConfig::default_bind_addr")]
    pub bind_addr: String,

    /// Port to bind the HTTP server to
    /// The default `bind_port` is 3000.
    #[serde(default = "HttpConfig::default_bind_port")]
    pub bind_port: u16,

    /// Maximum allowed time for a request to complete before timing out.
    /// If a request takes longer than this it will be aborted with a 408
    /// Request Timeout response. By default `request_timeout` is None.
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,

    /// Route for liveness checks.
    /// By default `liveness` is "/live".
    #[serde(default = "HttpConfig::default_liveness_route")]
    pub liveness_route: String,

    /// Path branches serving directories, checked in order.
    #[serde(default)]
    pub branches: Vec<BranchConfig>,

    /// Maximum time to wait for graceful shutdown to complete.
    /// After this timeout, the server will force shutdown.
    /// By default `shutdown_timeout` is set to 30 seconds.
    #[serde(
        default = "HttpConfig::default_shutdown_timeout",
        with = "humantime_serde"
    )]
    pub shutdown_timeout: Duration,

    #[serde(flatten)]
    pub middleware: Option<HttpMiddlewareConfig>,
}

impl HttpConfig {
    ///
    /// Returns the full bind address as a string in the format "IP:PORT".
    ///
    pub fn full_bind_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.bind_port)
    }

    fn default_bind_addr() -> String {
        "127.0.0.1".into()
    }

    fn default_bind_port() -> u16 {
        3000
    }

    fn default_liveness_route() -> String {
        "/live".into()
    }

    fn default_shutdown_timeout() -> Duration {
        Duration::from_secs(30)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(crate::Error::invalid_input(
                "HTTP bind_addr is required. Set [http] bind_addr = \"0.0.0.0\" or \"127.0.0.1\" in config.",
            ));
        }

        if self.bind_addr.parse::<std::net::IpAddr>().is_err() {
            return Err(crate::Error::invalid_input(
                "HTTP bind_addr must be a valid IP address. Examples: \"127.0.0.1\", \"0.0.0.0\", \"::1\"",
            ));
        }

        if !self.liveness_route.starts_with('/') {
            return Err(crate::Error::invalid_input(
                "HTTP liveness_route must start with '/'. Set [http] liveness_route = \"/live\" in config.",
            ));
        }

        for branch in &self.branches {
            branch.validate()?;
        }

        // A later branch under an earlier prefix could never be reached.
        for (i, branch) in self.branches.iter().enumerate() {
            let shadowing = self.branches[..i].iter().find(|earlier| {
                crate::starts_with_segments(&branch.path, &earlier.path, earlier.ignore_case)
                    .is_some()
            });
            if let Some(earlier) = shadowing {
                return Err(crate::Error::invalid_input(format!(
                    "Branch path {} is shadowed by the earlier branch {}",
                    branch.path, earlier.path
                )));
            }
        }

        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            bind_addr: Self::default_bind_addr(),
            bind_port: Self::default_bind_port(),
            request_timeout: None,
            liveness_route: Self::default_liveness_route(),
            branches: Vec::new(),
            shutdown_timeout: Self::default_shutdown_timeout(),
            middleware: None,
        }
    }
}
