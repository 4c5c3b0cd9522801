//! Per-request context passed down a pipeline.

use {
    crate::Result,
    axum::{
        body::Body,
        response::{IntoResponse, Response},
    },
    http::{Extensions, HeaderMap, Method, Request, Uri, request::Parts, uri::PathAndQuery},
    std::fmt,
};

/// The part of the request path consumed by enclosing branches.
///
/// [`HttpContext::to_request`] attaches it as a request extension so that
/// services running inside a branch (an axum `Router`, for instance) can see
/// which prefix was stripped:
///
/// ```rust
/// use axum::Extension;
/// use axum_mappath::PathBase;
///
/// async fn whoami(Extension(PathBase(base)): Extension<PathBase>) -> String {
///     format!("mounted at {base}")
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathBase(pub String);

/// Mutable state of a single request as it travels through a pipeline.
///
/// Holds the request parts and body, the response slot, and the pair
/// `path` / `path_base`. `path_base + path` always reconstructs the path the
/// context was created with. Branch middleware may move text from `path` to
/// `path_base` while a branch runs and restores both afterwards.
///
/// Every request owns its context exclusively; handlers borrow it mutably one
/// after the other.
pub struct HttpContext {
    parts: Parts,
    body: Option<Body>,
    path: String,
    path_base: String,
    response: Option<Response>,
}

impl HttpContext {
    /// Creates a context for `request`.
    ///
    /// `path` starts as the URI path. `path_base` is empty unless the request
    /// was dispatched from an enclosing branch and carries a [`PathBase`].
    ///
    /// The path is kept exactly as it appears in the URI, percent-encoding
    /// included. Branch prefixes are compared against that raw text, so
    /// `/%61pp/x` does not match `/app`. ASP.NET hosts unescape the path first
    /// and would match it.
    pub fn new(request: Request<Body>) -> Self {
        let (parts, body) = request.into_parts();
        let path = parts.uri.path().to_string();
        let path_base = parts
            .extensions
            .get::<PathBase>()
            .map(|base| base.0.clone())
            .unwrap_or_default();

        Self {
            parts,
            body: Some(body),
            path,
            path_base,
            response: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// The URI the request arrived with, never rewritten.
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    pub fn extensions(&self) -> &Extensions {
        &self.parts.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.parts.extensions
    }

    /// The portion of the path not yet consumed by enclosing branches.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// The portion of the path already consumed by enclosing branches.
    pub fn path_base(&self) -> &str {
        &self.path_base
    }

    pub fn set_path_base(&mut self, path_base: impl Into<String>) {
        self.path_base = path_base.into();
    }

    /// `path_base` followed by `path`.
    pub fn full_path(&self) -> String {
        format!("{}{}", self.path_base, self.path)
    }

    /// Takes the request body, leaving an empty one behind.
    pub fn take_body(&mut self) -> Body {
        self.body.take().unwrap_or_else(Body::empty)
    }

    /// Stores the response, replacing any previous one.
    pub fn set_response(&mut self, response: impl IntoResponse) {
        self.response = Some(response.into_response());
    }

    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    pub fn response_mut(&mut self) -> Option<&mut Response> {
        self.response.as_mut()
    }

    pub fn has_response(&self) -> bool {
        self.response.is_some()
    }

    pub fn take_response(&mut self) -> Option<Response> {
        self.response.take()
    }

    /// Builds a request for a wrapped service from the current path state.
    ///
    /// The URI carries the current `path` (an empty path becomes `/`) and the
    /// original query. Method, version, headers and extensions are copied, the
    /// body is moved, and the current `path_base` is attached as [`PathBase`].
    pub fn to_request(&mut self) -> Result<Request<Body>> {
        let path = if self.path.is_empty() { "/" } else { self.path.as_str() };
        let path_and_query: PathAndQuery = match self.parts.uri.query() {
            Some(query) => format!("{path}?{query}").parse()?,
            None => path.parse()?,
        };

        let mut uri_parts = self.parts.uri.clone().into_parts();
        uri_parts.path_and_query = Some(path_and_query);
        let uri = Uri::from_parts(uri_parts)?;

        let mut request = Request::new(self.take_body());
        *request.method_mut() = self.parts.method.clone();
        *request.uri_mut() = uri;
        *request.version_mut() = self.parts.version;
        *request.headers_mut() = self.parts.headers.clone();
        *request.extensions_mut() = self.parts.extensions.clone();
        request
            .extensions_mut()
            .insert(PathBase(self.path_base.clone()));

        Ok(request)
    }
}

impl fmt::Debug for HttpContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpContext")
            .field("method", &self.parts.method)
            .field("uri", &self.parts.uri)
            .field("path", &self.path)
            .field("path_base", &self.path_base)
            .field("has_response", &self.response.is_some())
            .finish()
    }
}
