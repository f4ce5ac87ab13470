use std::time::Duration;

use tracing::debug;

use crate::error::{Result, SizeError};
use crate::http::HttpClient;

/// Default bound on a size request.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Ask `client` for the size of `url`, giving up after `timeout`.
pub async fn content_length<C: HttpClient>(
    client: &C,
    url: &str,
    timeout: Duration,
) -> Result<Option<u64>> {
    match tokio::time::timeout(timeout, client.head(url)).await {
        Ok(Ok(len)) => Ok(len),
        Ok(Err(e)) => Err(SizeError::Request(Box::new(e))),
        Err(_) => Err(SizeError::Timeout(timeout)),
    }
}

/// Size of `url` in bytes, or `None` on any failure.
///
/// Failures are logged at debug level and never surfaced; callers fall back
/// to a nominal size.
pub async fn size_hint<C: HttpClient>(client: &C, url: &str, timeout: Duration) -> Option<u64> {
    match content_length(client, url, timeout).await {
        Ok(Some(len)) => Some(len),
        Ok(None) => {
            debug!(url, "no content length reported");
            None
        }
        Err(e) => {
            debug!(url, error = %e, "size hint unavailable");
            None
        }
    }
}
