//! The per-call request descriptor.

use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use url::Url;

/// Everything needed to issue one logical API request.
///
/// The descriptor is owned and cloneable so that every retry resends exactly
/// the same request. The path is kept as segments: identifiers added with
/// [`RequestMetadata::segment`] are percent-encoded when the URL is built, so
/// an id can never escape its path position.
///
/// # Examples
///
/// ```
/// use memoryrelay::metadata::RequestMetadata;
/// use http::Method;
///
/// let request = RequestMetadata::new(Method::GET, "/v1/memories")
///     .segment("mem 1")
///     .with_query_param("limit", "10");
///
/// assert_eq!(request.path(), "/v1/memories/mem 1");
/// ```
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    segments: Vec<String>,

    /// Headers for this request, applied over the client defaults.
    pub headers: HeaderMap,

    /// Query parameters, in insertion order.
    pub query_params: Vec<(String, String)>,

    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

impl RequestMetadata {
    /// Creates a descriptor for `method` and a literal `path` such as
    /// `"/v1/memories/search"`.
    pub fn new(method: Method, path: impl AsRef<str>) -> Self {
        Self {
            method,
            segments: path
                .as_ref()
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
            headers: HeaderMap::new(),
            query_params: Vec::new(),
            body: None,
        }
    }

    /// Appends one path segment, encoded as a single segment.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Returns the unencoded path, for logging.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the header name or value is invalid.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::validation(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::validation(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_params.push((key.into(), value.to_string()));
        self
    }

    /// Adds a query parameter only when `value` is present.
    pub fn with_optional_query_param(
        self,
        key: impl Into<String>,
        value: Option<impl ToString>,
    ) -> Self {
        match value {
            Some(value) => self.with_query_param(key, value),
            None => self,
        }
    }

    /// Serializes `body` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `body` cannot be represented as JSON.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let json = serde_json::to_value(body)
            .map_err(|e| Error::validation(format!("Failed to serialize request: {}", e)))?;
        self.body = Some(json);
        Ok(self)
    }

    /// Resolves this request against `base`, keeping any path prefix the base
    /// URL already has.
    pub(crate) fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::validation(format!("Base URL cannot carry a path: {}", base)))?
            .pop_if_empty()
            .extend(&self.segments);

        if !self.query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(
                self.query_params
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            );
        }

        Ok(url)
    }
}
