//! Page source -- the network seam the fetcher reads page bytes through.

use crate::config::Config;
use crate::error::FetchError;

/// Raw result of one page request
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// HTTP status code of the response
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl PageResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over page retrieval, enabling testability.
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Retrieve the resource at `url` for page `page`
    async fn fetch(&self, page: u32, url: &str) -> Result<PageResponse, FetchError>;
}

/// Production [`PageSource`] backed by a shared `reqwest` client.
///
/// No authentication headers are sent.
#[derive(Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    /// Build the HTTP client from configuration
    pub fn new(config: &Config) -> crate::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?))
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, page: u32, url: &str) -> Result<PageResponse, FetchError> {
        let request_error = |e: reqwest::Error| {
            let reason = if e.is_timeout() {
                format!("timed out: {e}")
            } else if e.is_connect() {
                format!("connection failed: {e}")
            } else {
                e.to_string()
            };
            FetchError::Request {
                page,
                url: url.to_string(),
                reason,
            }
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(request_error)?;

        Ok(PageResponse {
            status,
            body: body.to_vec(),
        })
    }
}
