//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{instrument, trace};
use url::Url;

use alma_core::error::TransportError;
use alma_core::{Result, Transport, TransportResponse};

/// HTTP transport for the Alma webservice.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with default settings.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Wrap an already configured reqwest client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    // the query string may carry patron credentials; only the path is recorded
    #[instrument(skip(self, url), fields(path = %url.path()))]
    async fn get(&self, url: &Url) -> Result<TransportResponse> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        trace!(status = %status, "Alma response");

        let error = if status.is_success() {
            String::new()
        } else {
            status
                .canonical_reason()
                .map(|reason| format!(" {reason}"))
                .unwrap_or_default()
        };

        let body = response.bytes().await.map_err(transport_error)?;

        Ok(TransportResponse {
            code: status.as_u16(),
            body: body.to_vec(),
            error,
        })
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    user_agent: String,
    timeout: Option<Duration>,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self {
            user_agent: concat!("alma-http/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

impl HttpTransportBuilder {
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Total time allowed per request, body included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be initialized.
    pub fn build(self) -> Result<HttpTransport> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport_error)?;
        Ok(HttpTransport { client })
    }
}

fn transport_error(err: reqwest::Error) -> alma_core::Error {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    err.into()
}
