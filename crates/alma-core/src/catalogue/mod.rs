//! Catalogue domain types.
//!
//! This module defines the records, holdings and search results produced
//! from Alma responses. Fetching them is done through
//! [`AlmaClient`](crate::AlmaClient).

mod holdings;
mod record;
mod search;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use holdings::{
    COMPOSITE_HOLDINGS_TAG, HOLDING_TAG, Holding, HoldingLocation, Holdings, IssueAggregate,
    PeriodicalHoldings, YearIssueMap, extract_holdings, extract_periodical_holdings,
};
pub use record::{
    CatalogueRecord, DETAIL_RECORD_TAG, PERIODICAL_MEDIA_CLASS, RecordCounts,
};
pub use search::{SEARCH_RECORD_TAG, SearchQuery, SearchResult, SearchType};

/// Output of a catalogue detail lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueDetail {
    /// True when every chunk response carried an `ok` status.
    pub status_ok: bool,
    /// Records keyed by record id.
    pub records: BTreeMap<String, CatalogueRecord>,
}
