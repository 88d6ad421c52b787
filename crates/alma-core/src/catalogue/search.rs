//! Free-text catalogue search.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentNode};
use crate::status::Status;

/// Tag of one hit in a search response.
pub const SEARCH_RECORD_TAG: &str = "catalogueRecord";

/// Query language of a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchType {
    /// The library system's native CCL query language.
    #[default]
    Native,
    FullText,
    NamedList,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Native => "native",
            SearchType::FullText => "fullText",
            SearchType::NamedList => "namedList",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page request against `catalogue/fulltextsearch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub search_type: SearchType,
    /// 1-based position of the first record to return.
    pub start: u32,
    pub page_size: u32,
}

impl SearchQuery {
    /// A native query for the first page of 30 records.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            search_type: SearchType::Native,
            start: 1,
            page_size: 30,
        }
    }

    pub fn search_type(mut self, search_type: SearchType) -> Self {
        self.search_type = search_type;
        self
    }

    pub fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Query string parameters, in the order the webservice documents them.
    pub fn params(&self) -> Vec<(String, String)> {
        vec![
            ("searchText".to_string(), self.text.clone()),
            ("searchType".to_string(), self.search_type.as_str().to_string()),
            ("startNo".to_string(), self.start.to_string()),
            ("nofRecords".to_string(), self.page_size.to_string()),
        ]
    }
}

/// One page of search hits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Whether the response status was `ok`.
    pub status_ok: bool,
    /// Number of records in this page (`nofRecords`).
    pub record_count: u32,
    /// Total hits for the query (`nofRecordsTotal`).
    pub total_count: u32,
    /// 1-based position of the first hit in this page (`startNo`).
    pub window_start: u32,
    /// 1-based position of the last hit in this page (`stopNo`).
    pub window_end: u32,
    /// Record ids in response order.
    pub record_ids: Vec<String>,
}

impl SearchResult {
    /// Read the paging envelope and hit ids of a search response.
    ///
    /// The status is reported rather than enforced; envelope numbers that are
    /// absent or unparsable read as zero.
    pub fn from_document(doc: &Document) -> Self {
        let number = |tag: &str| -> u32 {
            doc.text_of(tag)
                .and_then(|text| text.parse().ok())
                .unwrap_or(0)
        };

        Self {
            status_ok: Status::of(doc).is_ok(),
            record_count: number("nofRecords"),
            total_count: number("nofRecordsTotal"),
            window_start: number("startNo"),
            window_end: number("stopNo"),
            record_ids: doc
                .find_all(SEARCH_RECORD_TAG)
                .into_iter()
                .map(|e| e.attr("id").to_string())
                .collect(),
        }
    }

    /// True when hits exist beyond this page.
    pub fn has_more(&self) -> bool {
        self.window_end < self.total_count
    }
}
