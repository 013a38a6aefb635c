//! Fragment fetching over HTTP.

use std::future::Future;

use url::Url;

use crate::FRAGMENT_HEADER;

/// Header carrying the dashboard's shared token.
pub const TOKEN_HEADER: &str = "x-bridge-token";

/// Errors from the fetch layer. Only transport failures count; a non-2xx
/// response still yields a body to swap.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The element's URL could not be resolved against the base URL.
    #[error("Invalid fragment URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP request itself failed (network, DNS, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Test and in-memory hosts report failures with a message.
    #[error("{0}")]
    Transport(String),
}

/// Source of fragment bodies.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// [`Fetcher`] backed by [`reqwest`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl HttpFetcher {
    /// Create a fetcher resolving element URLs against `base`, e.g.
    /// `http://127.0.0.1:8787/`.
    pub fn new(base: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base)
    }

    /// Create a fetcher reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base: Url) -> Self {
        Self {
            client,
            base,
            token: None,
        }
    }

    /// Send `token` in the [`TOKEN_HEADER`] of every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
    }

    pub fn resolve(&self, url: &str) -> Result<Url, FetchError> {
        Ok(self.base.join(url)?)
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let url = self.resolve(url)?;
        let mut request = self.client.get(url).header(FRAGMENT_HEADER, "true");
        if let Some(token) = &self.token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Fragment fetch answered non-2xx");
        }
        Ok(response.text().await?)
    }
}
