//! Production HTTP client implementation using reqwest.

use std::time::Duration;

use crate::config::defaults;

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Production HTTP client using reqwest.
///
/// A thin wrapper around `reqwest::Client` implementing [`HttpClient`].
/// Connection pooling belongs to the wrapped client.
///
/// # Example
///
/// ```no_run
/// use feishu_bot::webhook::{ReqwestClient, HttpClient, HttpRequest};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://open.feishu.cn/open-apis/bot/v2/hook/xxx")?;
/// let request = HttpRequest::post(url).with_body(br#"{"msg_type":"text"}"#.to_vec());
/// let response = client.request(request).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
    timeout: Option<Duration>,
}

impl ReqwestClient {
    /// Creates a client with the default overall request timeout
    /// ([`defaults::request_timeout`]).
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(defaults::request_timeout())
    }

    /// Creates a client whose requests never run longer than `timeout`.
    ///
    /// The limit is applied to each request, together with any shorter
    /// timeout the request carries.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            inner: reqwest::Client::new(),
            timeout: Some(timeout),
        }
    }

    /// Creates an HTTP client from an existing reqwest client.
    ///
    /// Useful when you need custom configuration (proxy, TLS, etc.).
    /// The wrapped client's own timeout settings apply.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self {
            inner: client,
            timeout: None,
        }
    }

    /// Returns the overall limit applied to every request, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the timeout for one request: the shorter of the client's
    /// limit and the request's own.
    pub(super) fn effective_timeout(&self, requested: Option<Duration>) -> Option<Duration> {
        match (self.timeout, requested) {
            (Some(limit), Some(requested)) => Some(limit.min(requested)),
            (limit, requested) => limit.or(requested),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self.inner.request(req.method, req.url.as_str());

        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        if let Some(timeout) = self.effective_timeout(req.timeout) {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(map_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        // Buffering the body releases the connection back to the pool
        let body = response.bytes().await.map_err(map_error)?.to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}

fn map_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else {
        HttpError::Connection(Box::new(e))
    }
}
