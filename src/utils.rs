//!
//! Helpers shared by the configuration loader and the host router.
//!
//! - [`replace_handlebars_with_env`] substitutes `{{ VAR }}` placeholders in
//!   configuration text with environment variables.
//! - [`RequestIdGenerator`] keeps an incoming `x-request-id` or mints a UUIDv7.
//!

use {
    http::{HeaderValue, Request},
    regex::{Captures, Regex},
    std::{env, sync::LazyLock},
    tower_http::request_id::{MakeRequestId, RequestId},
    uuid::{ContextV7, Timestamp, Uuid},
};

/// Matches `{{ VAR_NAME }}`, whitespace optional, upper-case names only.
static HANDLEBAR_REGEXP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").expect("handlebar pattern is a valid regex")
});

/// Produces the `x-request-id` used to correlate log lines of one request.
///
/// An id supplied by the client is kept as is. Otherwise a time-ordered UUIDv7
/// is generated, so ids sort by arrival.
///
/// ```
/// use axum_mappath::RequestIdGenerator;
/// use tower_http::request_id::SetRequestIdLayer;
///
/// let layer = SetRequestIdLayer::x_request_id(RequestIdGenerator);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, req: &Request<B>) -> Option<RequestId> {
        if let Some(value) = req.headers().get("x-request-id") {
            return Some(RequestId::new(value.clone()));
        }

        let cx = ContextV7::new().with_additional_precision();
        let uuid = Uuid::new_v7(Timestamp::now(cx));
        let value = HeaderValue::from_str(&uuid.to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Replaces `{{ VAR_NAME }}` placeholders with environment variable values.
///
/// Unset variables become empty strings and are reported with a warning.
/// Whitespace inside the braces is ignored.
///
/// ```
/// use axum_mappath::replace_handlebars_with_env;
///
/// let toml = r#"directory = "{{ SPA_DIST_DIR_THAT_IS_NOT_SET }}""#;
/// assert_eq!(replace_handlebars_with_env(toml), r#"directory = """#);
/// ```
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!(
                    variable = %var_name,
                    "Environment variable not found, substituting with empty string"
                );
                String::new()
            })
        })
        .into_owned()
}
