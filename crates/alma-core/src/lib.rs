//! alma-core - Client pipeline for the Alma library catalogue webservice.
//!
//! This crate turns Alma's XML responses into catalogue records: it checks
//! the status element embedded in every response, fans detail lookups out
//! in bounded chunks, and rebuilds periodical holdings into a
//! year → issue structure with per-branch availability totals.
//!
//! The network call sits behind the [`Transport`] trait; `alma-http`
//! provides a `reqwest` implementation.
//!
//! # Example
//!
//! ```no_run
//! use alma_core::{AlmaClient, SearchQuery, Transport};
//!
//! # async fn example<T: Transport>(transport: T) -> Result<(), alma_core::Error> {
//! let client = AlmaClient::new("https://alma.example.org/alma/", transport)?;
//! let (page, detail) = client
//!     .search_with_details(&SearchQuery::new("dc.title=hobbit"))
//!     .await?;
//!
//! for id in &page.record_ids {
//!     if let Some(record) = detail.records.get(id) {
//!         println!("{}: {:?}", id, record.titles);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalogue;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod redact;
pub mod status;
pub mod transport;
pub mod types;

pub use catalogue::{
    CatalogueDetail, CatalogueRecord, Holding, Holdings, IssueAggregate, PeriodicalHoldings,
    SearchQuery, SearchResult, SearchType,
};
pub use client::AlmaClient;
pub use config::ClientConfig;
pub use document::{Document, DocumentNode, Element};
pub use error::Error;
pub use transport::{Transport, TransportResponse};
pub use types::BaseUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
