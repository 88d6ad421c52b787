//! Transport abstraction.

use async_trait::async_trait;
use url::Url;

use crate::Result;

/// Raw outcome of one HTTP GET.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub code: u16,
    /// Response body.
    pub body: Vec<u8>,
    /// Transport-supplied error text, empty on success.
    pub error: String,
}

impl TransportResponse {
    /// A 200 response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            code: 200,
            body: body.into(),
            error: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// Performs the network call for the client.
///
/// Implementations return `Ok` for any response the server produced,
/// whatever its status code; `Err` is reserved for failures to obtain a
/// response at all. TLS, timeouts and connection reuse are the
/// implementation's concern.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<TransportResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(&self, url: &Url) -> Result<TransportResponse> {
        (**self).get(url).await
    }
}
