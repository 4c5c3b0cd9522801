use {
    crate::{Result, pipeline::validate_path_match},
    serde::Deserialize,
};

/// Configuration for a path branch that serves files from a directory.
///
/// Every entry becomes a `map_path` branch on the host pipeline. Requests whose
/// path starts with `path` (on a segment boundary) are answered from
/// `directory`; other requests continue to the next branch or end in a 404.
///
/// # Examples
///
/// In TOML configuration:
/// ```toml
/// # A single-page application mounted under /app
/// [[http.branches]]
/// path = "/app"
/// directory = "ClientApp/dist"
/// spa_fallback = true
/// cache_max_age = 3600
///
/// # Files addressed by their full path, e.g. /docs/guide/index.html
/// # is read from ./site/docs/guide/index.html
/// [[http.branches]]
/// path = "/docs"
/// directory = "./site"
/// remove_matched_segment = false
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct BranchConfig {
    /// Path prefix selecting the branch. Must start with `/` and must not end with `/`.
    pub path: String,

    /// Whether the prefix is moved from the request path to the path base before
    /// the directory is consulted. By default `remove_matched_segment` is true.
    #[serde(default = "BranchConfig::default_remove_matched_segment")]
    pub remove_matched_segment: bool,

    /// Whether `path` is compared ASCII case-insensitively. Defaults to false.
    #[serde(default)]
    pub ignore_case: bool,

    /// Path to the directory containing the files to serve.
    pub directory: String,

    /// When true, requests for files that do not exist are answered with the
    /// directory's `index.html`, letting client-side routing take over.
    #[serde(default)]
    pub spa_fallback: bool,

    /// Maximum age for Cache-Control header in seconds.
    /// If set, adds `Cache-Control: public, max-age={value}` header to responses.
    /// If None, no Cache-Control header is added.
    #[serde(default)]
    pub cache_max_age: Option<u64>,
}

/// Maximum allowed cache_max_age value (1 year in seconds).
pub const MAX_CACHE_AGE_SECONDS: u64 = 31_536_000;

impl BranchConfig {
    /// Creates a branch serving `directory` under `path`, stripping the prefix.
    pub fn new(path: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            remove_matched_segment: Self::default_remove_matched_segment(),
            ignore_case: false,
            directory: directory.into(),
            spa_fallback: false,
            cache_max_age: None,
        }
    }

    pub fn with_remove_matched_segment(mut self, remove: bool) -> Self {
        self.remove_matched_segment = remove;
        self
    }

    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn with_spa_fallback(mut self, spa_fallback: bool) -> Self {
        self.spa_fallback = spa_fallback;
        self
    }

    pub fn with_cache_max_age(mut self, seconds: u64) -> Self {
        self.cache_max_age = Some(seconds);
        self
    }

    fn default_remove_matched_segment() -> bool {
        true
    }

    pub fn validate(&self) -> Result<()> {
        validate_path_match(&self.path)?;

        if self.directory.trim().is_empty() {
            return Err(crate::Error::invalid_input(format!(
                "Branch directory is required for {}. Set [[http.branches]] directory = \"./dist\" in config.",
                self.path
            )));
        }

        if let Some(max_age) = self.cache_max_age
            && max_age > MAX_CACHE_AGE_SECONDS
        {
            return Err(crate::Error::invalid_input(
                "cache_max_age exceeds 31536000 (1 year). Use values like 86400 (1 day) or 604800 (1 week).",
            ));
        }

        Ok(())
    }
}
