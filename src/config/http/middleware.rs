use serde::Deserialize;

/// Selects which host middleware is installed.
///
/// It is flattened into `[http]`, so one of `include` or `exclude` may appear
/// there. Without either, every middleware is enabled.
///
/// ```toml
/// [http]
/// exclude = ["timeout", "liveness"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMiddlewareConfig {
    Include(Vec<HttpMiddleware>),
    Exclude(Vec<HttpMiddleware>),
}

impl HttpMiddlewareConfig {
    pub fn is_enabled(&self, middleware: HttpMiddleware) -> bool {
        match self {
            HttpMiddlewareConfig::Include(list) => list.contains(&middleware),
            HttpMiddlewareConfig::Exclude(list) => !list.contains(&middleware),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum HttpMiddleware {
    RequestId,
    Logging,
    Liveness,
    Timeout,
    CatchPanic,
    Branches,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn test_is_enabled_include() {
        let config =
            HttpMiddlewareConfig::Include(vec![HttpMiddleware::Logging, HttpMiddleware::Branches]);
        assert!(config.is_enabled(HttpMiddleware::Logging));
        assert!(config.is_enabled(HttpMiddleware::Branches));
        assert!(!config.is_enabled(HttpMiddleware::Timeout));
    }

    #[test]
    fn test_is_enabled_exclude() {
        let config = HttpMiddlewareConfig::Exclude(vec![HttpMiddleware::Timeout]);
        assert!(!config.is_enabled(HttpMiddleware::Timeout));
        assert!(config.is_enabled(HttpMiddleware::Logging));
        assert!(config.is_enabled(HttpMiddleware::Branches));
    }

    #[test]
    fn test_empty_include_disables_everything() {
        let config = HttpMiddlewareConfig::Include(vec![]);
        assert!(!config.is_enabled(HttpMiddleware::CatchPanic));
        assert!(!config.is_enabled(HttpMiddleware::Branches));
    }

    #[test]
    fn test_parse_from_toml() {
        let config: Config = r#"
        [http]
        exclude = ["catch-panic", "request-id"]
        "#
        .parse()
        .unwrap();

        let middleware = config.http.middleware.unwrap();
        assert!(!middleware.is_enabled(HttpMiddleware::CatchPanic));
        assert!(!middleware.is_enabled(HttpMiddleware::RequestId));
        assert!(middleware.is_enabled(HttpMiddleware::Branches));
    }
}
