use super::DEFAULT_TIMEOUT;
use super::client::HttpClient;
use async_trait::async_trait;
use std::time::Duration;

/// Plain `reqwest` client whose requests give up after `timeout`.
pub struct BasicClient {
    inner: reqwest::Client,
    timeout: Duration,
}

impl BasicClient {
    /// Client bounded by [`DEFAULT_TIMEOUT`].
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            inner: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Applies the client timeout unless the request already carries one.
    fn prepare(&self, mut req: reqwest::Request) -> reqwest::Request {
        req.timeout_mut().get_or_insert(self.timeout);
        req
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.inner.execute(self.prepare(req)).await
    }
}
