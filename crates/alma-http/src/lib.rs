//! alma-http - HTTP transport for the Alma catalogue client.
//!
//! # Example
//!
//! ```no_run
//! use alma_core::{ClientConfig, SearchQuery};
//!
//! # async fn example() -> Result<(), alma_core::Error> {
//! let client = alma_http::connect(&ClientConfig::new("https://alma.example.org/alma/"))?;
//! let page = client.search(&SearchQuery::new("dc.title=hobbit")).await?;
//! let detail = client.catalogue_record_detail(&page.record_ids).await?;
//! println!("{} records", detail.records.len());
//! # Ok(())
//! # }
//! ```

mod transport;

use alma_core::{AlmaClient, ClientConfig, Result};

pub use transport::{HttpTransport, HttpTransportBuilder};

/// An [`AlmaClient`] talking HTTP.
pub type HttpAlmaClient = AlmaClient<HttpTransport>;

/// Create an HTTP client from a configuration.
///
/// # Errors
///
/// Returns a configuration error for an invalid configuration, or a
/// transport error if the HTTP client cannot be initialized.
pub fn connect(config: &ClientConfig) -> Result<HttpAlmaClient> {
    AlmaClient::with_config(config, HttpTransport::new()?)
}

/// Create an HTTP client configured from `ALMA_*` environment variables.
///
/// # Errors
///
/// See [`ClientConfig::from_env`] and [`connect`].
pub fn connect_from_env() -> Result<HttpAlmaClient> {
    connect(&ClientConfig::from_env()?)
}
