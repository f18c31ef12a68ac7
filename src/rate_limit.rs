//! `Retry-After` parsing for rate-limited responses.
//!
//! MemoryRelay answers throttled requests with HTTP 429 and, usually, a
//! `Retry-After` header. The pipeline waits that long before the next attempt
//! instead of using its exponential backoff.

use http::HeaderMap;
use std::time::{Duration, SystemTime};

/// Parses the `Retry-After` header.
///
/// Supports both delay-seconds (`"60"`) and HTTP-date formats. A date in the
/// past yields a zero wait. Returns `None` when the header is missing or
/// unparsable.
///
/// # Examples
///
/// ```
/// use memoryrelay::rate_limit::retry_after;
/// use http::HeaderMap;
/// use std::time::Duration;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("retry-after", "60".parse().unwrap());
///
/// assert_eq!(retry_after(&headers), Some(Duration::from_secs(60)));
/// ```
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let header = headers.get(http::header::RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(seconds) = header.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let date_time = httpdate::parse_http_date(header).ok()?;
    Some(
        date_time
            .duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO),
    )
}
