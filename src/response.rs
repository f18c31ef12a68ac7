//! Successful call results.
//!
//! A successful HTTP exchange yields an [`Outcome`]: either a parsed JSON body
//! or nothing (204 No Content). The pipeline wraps it in a [`Response`] with
//! the transaction metadata, and the resource facades decode it into typed
//! entities. Failures never produce a `Response`; they are the `Err` side of
//! the pipeline's `Result`.

use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// The body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A JSON document.
    Json(Value),
    /// No content: HTTP 204, or a 2xx with an empty body.
    Empty,
}

impl Outcome {
    /// Interprets the body of a 2xx response.
    ///
    /// 204 is never parsed. Any other status with a non-empty body must carry
    /// JSON; otherwise this is a generic API error.
    pub fn from_body(status: StatusCode, body: &str) -> Result<Self> {
        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(Outcome::Empty);
        }

        serde_json::from_str(body)
            .map(Outcome::Json)
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    raw_response = %body,
                    "Failed to parse response body"
                );
                Error::Api {
                    message: format!("Failed to parse response body: {}", e),
                    status,
                    request_id: None,
                }
            })
    }

    /// Returns `true` for [`Outcome::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    /// Returns the JSON document, if there is one.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Outcome::Json(value) => Some(value),
            Outcome::Empty => None,
        }
    }

    /// Converts into a JSON value; `Empty` becomes `null`.
    pub fn into_json(self) -> Value {
        match self {
            Outcome::Json(value) => value,
            Outcome::Empty => Value::Null,
        }
    }
}

/// A successful response with its transaction metadata.
///
/// # Examples
///
/// ```no_run
/// use memoryrelay::{metadata::RequestMetadata, Client};
/// use http::Method;
///
/// # async fn example() -> Result<(), memoryrelay::Error> {
/// let client = Client::new("mem_live_key")?;
///
/// let response = client
///     .execute(RequestMetadata::new(Method::GET, "/v1/health"))
///     .await?;
///
/// println!("status {} after {} attempt(s)", response.status, response.attempts);
/// println!("took {:?}", response.latency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    /// The parsed body.
    pub outcome: Outcome,

    /// The HTTP status code of the final attempt.
    pub status: StatusCode,

    /// The response headers of the final attempt.
    pub headers: HeaderMap,

    /// Time from the first attempt until this response, including backoff.
    pub latency: Duration,

    /// The number of attempts made; `1` if the first one succeeded.
    pub attempts: usize,
}

impl Response {
    pub fn new(
        outcome: Outcome,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            outcome,
            status,
            headers,
            latency,
            attempts,
        }
    }

    /// Returns `true` if the request required retries.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Decodes the whole body into `T`.
    ///
    /// An empty outcome decodes as JSON `null`, so `T = ()` or `Option<_>`
    /// accept it and struct types reject it.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        let status = self.status;
        serde_json::from_value(self.outcome.into_json()).map_err(|e| decode_error(status, e))
    }

    /// Decodes each element of the body's `data` array into `T`.
    ///
    /// A missing `data` field is an empty list.
    pub fn decode_data<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        let status = self.status;
        let items = match self.outcome {
            Outcome::Json(Value::Object(mut body)) => match body.remove("data") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => {
                    return Err(Error::Api {
                        message: format!("Expected `data` to be an array, got {}", other),
                        status,
                        request_id: None,
                    })
                }
            },
            Outcome::Json(Value::Array(items)) => items,
            Outcome::Json(_) | Outcome::Empty => Vec::new(),
        };

        items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(|e| decode_error(status, e)))
            .collect()
    }
}

fn decode_error(status: StatusCode, err: serde_json::Error) -> Error {
    tracing::error!(error = %err, status = status.as_u16(), "Failed to decode response");
    Error::Api {
        message: format!("Failed to decode response: {}", err),
        status,
        request_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    fn response(outcome: Outcome) -> Response {
        Response::new(
            outcome,
            StatusCode::OK,
            HeaderMap::new(),
            Duration::from_millis(5),
            1,
        )
    }

    #[test]
    fn test_no_content_is_empty() {
        let outcome = Outcome::from_body(StatusCode::NO_CONTENT, "ignored").unwrap();
        assert!(outcome.is_empty());

        let outcome = Outcome::from_body(StatusCode::OK, "  ").unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_invalid_json_is_api_error() {
        let err = Outcome::from_body(StatusCode::OK, "not json").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Generic);
        assert_eq!(err.status(), Some(StatusCode::OK));
    }

    #[test]
    fn test_decode_data_maps_each_element() {
        let items: Vec<Item> = response(Outcome::Json(json!({
            "data": [{"id": "a"}, {"id": "b"}],
            "total": 2
        })))
        .decode_data()
        .unwrap();

        assert_eq!(
            items,
            vec![Item { id: "a".into() }, Item { id: "b".into() }]
        );
    }

    #[test]
    fn test_decode_data_missing_field_is_empty() {
        let items: Vec<Item> = response(Outcome::Json(json!({})))
            .decode_data()
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_decode_empty_into_unit() {
        response(Outcome::Empty).decode::<()>().unwrap();
        assert!(response(Outcome::Empty).decode::<Item>().is_err());
    }
}
