//! Error types for MemoryRelay API calls.
//!
//! Every failure, whether it comes from the transport, from the server, or from
//! local input validation, is reported as exactly one [`Error`] variant. The set
//! of variants is closed and mirrored by [`ErrorKind`], so callers can branch on
//! the kind without matching payloads.

use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// The closed set of failure categories.
///
/// Mapping from an HTTP status or transport failure to a kind is total and
/// deterministic:
///
/// | Source                         | Kind             |
/// |--------------------------------|------------------|
/// | 401                            | `Authentication` |
/// | 404                            | `NotFound`       |
/// | 429                            | `RateLimited`    |
/// | 400, 422, local validation     | `Validation`     |
/// | any other status >= 400        | `Generic`        |
/// | transport timeout              | `Timeout`        |
/// | any other transport failure    | `Network`        |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authentication,
    RateLimited,
    NotFound,
    Validation,
    Network,
    Timeout,
    Generic,
}

/// The main error type for MemoryRelay API calls.
///
/// Server-originated variants carry the request id from the error envelope
/// (`{"error": {"message": ..., "request_id": ...}}`) when the server sent one,
/// which is what support will ask for.
///
/// # Examples
///
/// ```no_run
/// use memoryrelay::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new("mem_live_key")?;
///
/// match client.memories().get("mem_123").await {
///     Ok(memory) => println!("{}", memory.content),
///     Err(Error::NotFound { .. }) => println!("gone"),
///     Err(Error::RateLimited { retry_after, .. }) => {
///         println!("slow down, retry after {:?}", retry_after)
///     }
///     Err(e) => return Err(e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// The API key was rejected (HTTP 401). Never retried.
    #[error("Authentication failed: {message}")]
    Authentication {
        message: String,
        request_id: Option<String>,
    },

    /// The server throttled the request (HTTP 429).
    ///
    /// `retry_after` is parsed from the `Retry-After` header. This variant is
    /// only surfaced once the retry budget is spent.
    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
        request_id: Option<String>,
    },

    /// The addressed resource does not exist (HTTP 404). Never retried.
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        request_id: Option<String>,
    },

    /// The request was invalid (HTTP 400/422), or failed local validation
    /// before it was sent, in which case `status` is 400.
    #[error("Validation failed ({status}): {message}")]
    Validation {
        message: String,
        status: StatusCode,
        request_id: Option<String>,
    },

    /// Connection refused, DNS failure, reset, and other transport faults.
    #[error("{message}")]
    Network { message: String },

    /// The per-call timeout elapsed, or a job did not finish in time.
    #[error("{message}")]
    Timeout { message: String },

    /// Any other HTTP failure (5xx and unmapped 4xx), or a success response
    /// whose body could not be decoded.
    #[error("API error {status}: {message}")]
    Api {
        message: String,
        status: StatusCode,
        request_id: Option<String>,
    },
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    request_id: Option<String>,
}

impl Error {
    /// Builds a client-side validation error. These never reach the network.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
            status: StatusCode::BAD_REQUEST,
            request_id: None,
        }
    }

    /// Classifies a non-2xx response.
    ///
    /// The message comes from the JSON error envelope when present, otherwise
    /// from the raw body, otherwise it is `"HTTP <code>"`.
    pub fn from_response(status: StatusCode, headers: &HeaderMap, body: &str) -> Self {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
        let request_id = envelope
            .as_ref()
            .and_then(|envelope| envelope.error.request_id.clone());
        let message = envelope
            .and_then(|envelope| envelope.error.message)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {}", status.as_u16())
                } else {
                    body.to_string()
                }
            });

        match status.as_u16() {
            401 => Error::Authentication {
                message,
                request_id,
            },
            404 => Error::NotFound {
                message,
                request_id,
            },
            429 => Error::RateLimited {
                message,
                retry_after: crate::rate_limit::retry_after(headers),
                request_id,
            },
            400 | 422 => Error::Validation {
                message,
                status,
                request_id,
            },
            _ => Error::Api {
                message,
                status,
                request_id,
            },
        }
    }

    /// Classifies a transport failure. `timeout` is the configured per-call
    /// timeout, quoted in the message when the failure was a timeout.
    pub fn from_transport(err: &reqwest::Error, timeout: Option<Duration>) -> Self {
        if err.is_timeout() {
            let message = match timeout {
                Some(timeout) => format!("Request timeout after {:.1}s", timeout.as_secs_f64()),
                None => format!("Request timeout: {}", error_chain(err)),
            };
            Error::Timeout { message }
        } else {
            Error::Network {
                message: format!("Network error: {}", error_chain(err)),
            }
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::RateLimited { .. } => ErrorKind::RateLimited,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Network { .. } => ErrorKind::Network,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Api { .. } => ErrorKind::Generic,
        }
    }

    /// Returns `true` if the request pipeline retries this error.
    ///
    /// Network errors, timeouts, rate limits and 5xx responses are retryable.
    /// Any other 4xx, and a success response that could not be decoded, is
    /// terminal.
    ///
    /// # Examples
    ///
    /// ```
    /// use memoryrelay::Error;
    ///
    /// assert!(Error::Timeout { message: "slow".into() }.is_retryable());
    /// assert!(!Error::validation("content cannot be empty").is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network { .. } | Error::Timeout { .. } | Error::RateLimited { .. } => true,
            // unmapped 4xx and undecodable success bodies will not change on retry
            Error::Api { status, .. } => status.is_server_error(),
            Error::Authentication { .. } | Error::NotFound { .. } | Error::Validation { .. } => {
                false
            }
        }
    }

    /// Returns the HTTP status code, if this error has one.
    ///
    /// Transport failures have none.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Authentication { .. } => Some(StatusCode::UNAUTHORIZED),
            Error::RateLimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            Error::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Error::Validation { status, .. } | Error::Api { status, .. } => Some(*status),
            Error::Network { .. } | Error::Timeout { .. } => None,
        }
    }

    /// Returns the human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::Authentication { message, .. }
            | Error::RateLimited { message, .. }
            | Error::NotFound { message, .. }
            | Error::Validation { message, .. }
            | Error::Network { message }
            | Error::Timeout { message }
            | Error::Api { message, .. } => message,
        }
    }

    /// Returns the server-assigned request id, if the server sent one.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Error::Authentication { request_id, .. }
            | Error::RateLimited { request_id, .. }
            | Error::NotFound { request_id, .. }
            | Error::Validation { request_id, .. }
            | Error::Api { request_id, .. } => request_id.as_deref(),
            Error::Network { .. } | Error::Timeout { .. } => None,
        }
    }

    /// Returns the server's requested wait for a rate-limited request.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Renders an error with its source chain; reqwest keeps the useful part
/// ("Connection refused") in the sources.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !rendered.contains(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        source = cause.source();
    }
    rendered
}

/// A specialized `Result` type for MemoryRelay API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn classify(status: u16, body: &str) -> Error {
        Error::from_response(
            StatusCode::from_u16(status).unwrap(),
            &HeaderMap::new(),
            body,
        )
    }

    #[test]
    fn test_status_mapping_is_total() {
        assert_eq!(classify(401, "").kind(), ErrorKind::Authentication);
        assert_eq!(classify(404, "").kind(), ErrorKind::NotFound);
        assert_eq!(classify(429, "").kind(), ErrorKind::RateLimited);
        assert_eq!(classify(400, "").kind(), ErrorKind::Validation);
        assert_eq!(classify(422, "").kind(), ErrorKind::Validation);
        assert_eq!(classify(403, "").kind(), ErrorKind::Generic);
        assert_eq!(classify(409, "").kind(), ErrorKind::Generic);
        assert_eq!(classify(500, "").kind(), ErrorKind::Generic);
        assert_eq!(classify(503, "").kind(), ErrorKind::Generic);
    }

    #[test]
    fn test_envelope_message_and_request_id() {
        let err = classify(
            401,
            r#"{"error": {"message": "Invalid API key", "request_id": "req_123"}}"#,
        );
        assert_eq!(err.message(), "Invalid API key");
        assert_eq!(err.request_id(), Some("req_123"));
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_fallback_to_raw_text() {
        let err = classify(500, "Internal Server Error");
        assert_eq!(err.message(), "Internal Server Error");
        assert!(err.request_id().is_none());
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_fallback_to_status_code_when_body_empty() {
        let err = classify(502, "");
        assert_eq!(err.message(), "HTTP 502");
    }

    #[test]
    fn test_rate_limit_carries_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("60"));
        let err = Error::from_response(
            StatusCode::TOO_MANY_REQUESTS,
            &headers,
            r#"{"error": {"message": "Rate limit exceeded", "request_id": null}}"#,
        );

        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));
        assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert!(err.message().contains("Rate limit exceeded"));
        assert!(err.request_id().is_none());
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(classify(500, "").is_retryable());
        assert!(classify(429, "").is_retryable());
        assert!(!classify(401, "").is_retryable());
        assert!(!classify(404, "").is_retryable());
        assert!(!classify(422, "").is_retryable());
        assert!(!classify(409, "").is_retryable());
        assert!(Error::Network {
            message: "Network error: refused".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_local_validation_error() {
        let err = Error::validation("content cannot be empty");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_transport_errors_have_no_status() {
        let err = Error::Timeout {
            message: "Request timeout after 1.0s".into(),
        };
        assert!(err.status().is_none());
        assert_eq!(err.to_string(), "Request timeout after 1.0s");
    }
}
