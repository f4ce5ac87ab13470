use std::future::Future;

/// Minimal HTTP surface needed to learn a remote file's size.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient {
    /// Error type for HTTP operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Query the Content-Length header without downloading the body.
    ///
    /// `Ok(None)` when the header is absent (chunked encoding, for instance).
    fn head(&self, url: &str) -> impl Future<Output = Result<Option<u64>, Self::Error>>;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new() -> Result<Self, reqwest::Error> {
            let client = reqwest::Client::builder()
                .user_agent(concat!("dlbench/", env!("CARGO_PKG_VERSION")))
                .build()?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn head(&self, url: &str) -> Result<Option<u64>, Self::Error> {
            let response = self.client.head(url).send().await?.error_for_status()?;
            let content_length = response
                .headers()
                .get(reqwest::header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok());

            Ok(content_length)
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
