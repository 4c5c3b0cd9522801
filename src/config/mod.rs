//!
//! Configuration structures for the host server and its path branches.
//!
//! A configuration can be created in many ways:
//! - From an environment-specific TOML file via `Config::from_rust_env` or `Config::from_toml_file`
//! - From a TOML string via `Config::from_toml` or `str::parse`
//! - Constructed programmatically via the builder methods on `Config`
//!
//! In the TOML-based methods, environment variables can be referenced using the
//! {{ VAR_NAME }} syntax and are substituted before parsing (see
//! `replace_handlebars_with_env`). This keeps deployment specific values, such as
//! the directory a SPA build lands in, out of the TOML files.
//!
//! Configuration is split into sections:
//!
//! - `HttpConfig` for HTTP server settings and `[[http.branches]]`
//! - `LoggingConfig` for logging and tracing settings
//!
mod http;
mod logging;

pub use http::*;
pub use logging::*;

use {
    crate::{Error, Result, utils::replace_handlebars_with_env},
    serde::Deserialize,
    std::{env, fs, str::FromStr, time::Duration},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    ///
    /// Creates a default configuration.
    /// This will attempt to load configuration from the file named by the RUST_ENV
    /// environment variable, falling back to built-in defaults when the variable is
    /// not set or the file cannot be loaded. Configuration files live in "config/".
    ///
    fn default() -> Self {
        match Self::from_rust_env() {
            Ok(config) => config,
            Err(_) => Config {
                http: HttpConfig::default(),
                logging: LoggingConfig::default(),
            },
        }
    }
}

impl Config {
    ///
    /// Loads the configuration from "config/{RUST_ENV}.toml".
    ///
    pub fn from_rust_env() -> Result<Config> {
        Self::from_toml_file(env::var("RUST_ENV")?)
    }

    ///
    /// Given an environment name, loads "config/{env}.toml", substitutes any
    /// environment variables, and parses the result.
    ///
    pub fn from_toml_file(env: impl AsRef<str>) -> Result<Config> {
        let path = format!("config/{}.toml", env.as_ref());
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    ///
    /// Parses a configuration string in TOML format into a Config struct.
    ///
    pub fn from_toml(toml_str: &str) -> Result<Config> {
        toml_str.parse()
    }

    /// Sets the HTTP server bind address of the HttpConfig.
    pub fn with_bind_addr<S: AsRef<str>>(mut self, addr: S) -> Self {
        self.http.bind_addr = addr.as_ref().into();
        self
    }

    /// Sets the HTTP server bind port of the HttpConfig.
    pub fn with_bind_port(mut self, port: u16) -> Self {
        self.http.bind_port = port;
        self
    }

    /// Sets the per-request timeout of the HttpConfig.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.http.request_timeout = Some(timeout);
        self
    }

    /// Sets the graceful shutdown timeout of the HttpConfig.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.http.shutdown_timeout = timeout;
        self
    }

    /// Sets the liveness route of the HttpConfig.
    pub fn with_liveness_route(mut self, route: &str) -> Self {
        self.http.liveness_route = route.into();
        self
    }

    /// Sets the log format of the LoggingConfig.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.logging.format = format;
        self
    }

    /// Appends a directory branch. Branches are matched in the order they are added.
    pub fn with_branch(mut self, branch: BranchConfig) -> Self {
        self.http.branches.push(branch);
        self
    }

    /// Sets the middleware configuration of the HttpConfig.
    /// This approach activates only the specified middlewares.
    pub fn with_included_middlewares(mut self, middlewares: Vec<HttpMiddleware>) -> Self {
        self.http.middleware = Some(HttpMiddlewareConfig::Include(middlewares));
        self
    }

    /// Sets the middleware configuration of the HttpConfig.
    /// This approach activates all middlewares except the specified ones.
    pub fn with_excluded_middlewares(mut self, middlewares: Vec<HttpMiddleware>) -> Self {
        self.http.middleware = Some(HttpMiddlewareConfig::Exclude(middlewares));
        self
    }

    /// Ensures that the configuration is valid.
    /// Branch prefixes are checked with the same rules `map_path` applies, so a
    /// malformed `[[http.branches]] path` fails at startup.
    pub fn validate(&self) -> Result<()> {
        self.http.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    ///
    /// Sets up the tracing subscriber for logging based on the LoggingConfig.
    ///
    /// NOTE: This should be called early during startup to ensure logging is configured
    ///       before any log messages are emitted.
    ///
    pub fn setup_tracing(&self) {
        use tracing_subscriber::{EnvFilter, prelude::*};
        let env_filter = EnvFilter::from_default_env();
        let registry = tracing_subscriber::registry().with(env_filter);
        let _ = match self.logging.format {
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init(),
            LogFormat::Default => registry.with(tracing_subscriber::fmt::layer()).try_init(),
            LogFormat::Compact => registry
                .with(tracing_subscriber::fmt::layer().compact())
                .try_init(),
            LogFormat::Pretty => registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init(),
        };
    }
}

///
/// Parses a configuration string with references to environment variables
/// into a Config struct by substituting the environment variables and then
/// parsing the resulting TOML.
///
impl FromStr for Config {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let config_file = replace_handlebars_with_env(s);
        let config = toml::from_str::<Config>(&config_file)?;
        Ok(config)
    }
}
