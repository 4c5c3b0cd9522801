//! Segment-boundary prefix matching for request paths.

use crate::{Error, Result};

/// Splits `path` right after `prefix` when `prefix` matches on a segment boundary.
///
/// The match succeeds only when the prefix is followed by the end of the path or
/// by a `/`, so `/app` matches `/app` and `/app/x` but never `/application`.
/// On success returns `(matched, remaining)`, where `matched` is the request's own
/// text for the prefix and `remaining` is empty or starts with `/`.
///
/// With `ignore_case` the prefix is compared ASCII case-insensitively.
///
/// ```
/// use axum_mappath::starts_with_segments;
///
/// assert_eq!(starts_with_segments("/app/users", "/app", false), Some(("/app", "/users")));
/// assert_eq!(starts_with_segments("/app", "/app", false), Some(("/app", "")));
/// assert_eq!(starts_with_segments("/application", "/app", false), None);
/// assert_eq!(starts_with_segments("/APP/x", "/app", true), Some(("/APP", "/x")));
/// ```
pub fn starts_with_segments<'a>(
    path: &'a str,
    prefix: &str,
    ignore_case: bool,
) -> Option<(&'a str, &'a str)> {
    let (matched, remaining) = path.split_at_checked(prefix.len())?;

    let equal = if ignore_case {
        matched.eq_ignore_ascii_case(prefix)
    } else {
        matched == prefix
    };

    if equal && (remaining.is_empty() || remaining.starts_with('/')) {
        Some((matched, remaining))
    } else {
        None
    }
}

/// Checks that `path_match` can be used as a branch prefix.
///
/// A prefix must be non-empty, start with `/` and must not end with `/`.
pub fn validate_path_match(path_match: &str) -> Result<()> {
    if path_match.is_empty() {
        return Err(Error::invalid_argument("The path must not be empty"));
    }

    if !path_match.starts_with('/') {
        return Err(Error::invalid_argument(format!(
            "The path must start with a '/': {path_match:?}"
        )));
    }

    if path_match.ends_with('/') {
        return Err(Error::invalid_argument("The path must not end with a '/'"));
    }

    Ok(())
}
