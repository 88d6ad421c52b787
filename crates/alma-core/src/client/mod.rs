//! Alma webservice client.
//!
//! [`AlmaClient`] issues REST calls through a [`Transport`], parses the
//! returned documents and checks their status, and turns search and detail
//! responses into catalogue types.

mod batch;
mod endpoints;

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, instrument};

use crate::Result;
use crate::catalogue::{
    CatalogueDetail, CatalogueRecord, DETAIL_RECORD_TAG, SearchQuery, SearchResult,
};
use crate::config::ClientConfig;
use crate::document::Document;
use crate::error::TransportError;
use crate::redact::Redactor;
use crate::status::{self, Status};
use crate::transport::{Transport, TransportResponse};
use crate::types::BaseUrl;

pub use batch::chunk_record_ids;
pub use endpoints::{CATALOGUE_DETAIL, CATALOGUE_RECORD_KEY, CATALOGUE_SEARCH};

/// Query string parameters of one request, in order.
pub type Params = Vec<(String, String)>;

/// Client for the Alma catalogue webservice.
///
/// The client holds no mutable state. Its redaction salt is drawn once at
/// construction and only read afterwards, so one client can serve
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct AlmaClient<T> {
    base_url: BaseUrl,
    transport: T,
    redactor: Redactor,
    enable_logging: bool,
    filter_params: bool,
    batch_size: usize,
}

impl<T: Transport> AlmaClient<T> {
    /// Create a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `base_url` is not an absolute http(s)
    /// URL.
    pub fn new(base_url: impl Into<String>, transport: T) -> Result<Self> {
        Self::with_config(&ClientConfig::new(base_url), transport)
    }

    /// Create a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the configuration does not validate.
    pub fn with_config(config: &ClientConfig, transport: T) -> Result<Self> {
        let base_url = config.validate()?;

        Ok(Self {
            base_url,
            transport,
            redactor: Redactor::random(),
            enable_logging: config.enable_logging,
            filter_params: config.filter_params,
            batch_size: config.batch_size,
        })
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Record ids sent per detail request.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Perform one request and return the parsed response.
    ///
    /// With `check_status` the response's status element must be `ok`.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`](crate::Error::Transport) if no response was
    ///   obtained or its code is not 2xx, whatever `check_status` says.
    /// - [`Error::Parse`](crate::Error::Parse) for a malformed body.
    /// - [`Error::Communication`](crate::Error::Communication) for a non-ok
    ///   status when `check_status` is set.
    #[instrument(skip(self, params), fields(base = %self.base_url))]
    pub async fn request(
        &self,
        method: &str,
        params: &[(String, String)],
        check_status: bool,
    ) -> Result<Document> {
        let response = self.send(method, params).await?;
        process_response(response, check_status)
    }

    /// Run a free-text search and return one page of record ids.
    ///
    /// A non-ok search status is reported in [`SearchResult::status_ok`]
    /// instead of failing the call.
    #[instrument(skip(self), fields(text = %query.text))]
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let doc = self.request(CATALOGUE_SEARCH, &query.params(), false).await?;
        let result = SearchResult::from_document(&doc);

        debug!(
            total = result.total_count,
            start = result.window_start,
            stop = result.window_end,
            "search returned {} ids",
            result.record_ids.len()
        );

        Ok(result)
    }

    /// Fetch details for the given record ids.
    ///
    /// Ids are sent in chunks of [`batch_size`](Self::batch_size), all
    /// chunks concurrently. The call fails as a whole if any chunk fails.
    #[instrument(skip(self, ids), fields(ids = ids.len()))]
    pub async fn catalogue_record_detail<S>(&self, ids: &[S]) -> Result<CatalogueDetail>
    where
        S: AsRef<str>,
    {
        if ids.is_empty() {
            return Ok(CatalogueDetail {
                status_ok: true,
                records: BTreeMap::new(),
            });
        }

        let param_sets: Vec<Params> = chunk_record_ids(ids, self.batch_size)
            .into_iter()
            .map(|chunk| vec![(CATALOGUE_RECORD_KEY.to_string(), chunk.join(","))])
            .collect();

        let docs = self.multi_request(CATALOGUE_DETAIL, &param_sets, true).await?;

        let status_ok = docs.iter().all(|doc| Status::of(doc).is_ok());
        let mut records = BTreeMap::new();
        for doc in &docs {
            for node in doc.find_all(DETAIL_RECORD_TAG) {
                let record = CatalogueRecord::from_node(node);
                records.insert(record.id.clone(), record);
            }
        }

        debug!(records = records.len(), "catalogue details parsed");

        Ok(CatalogueDetail { status_ok, records })
    }

    /// Run a search and fetch details for every id it returned.
    pub async fn search_with_details(
        &self,
        query: &SearchQuery,
    ) -> Result<(SearchResult, CatalogueDetail)> {
        let result = self.search(query).await?;
        let detail = self.catalogue_record_detail(&result.record_ids).await?;
        Ok((result, detail))
    }

    async fn send(&self, method: &str, params: &[(String, String)]) -> Result<TransportResponse> {
        let url = self.base_url.method_url(method, params);
        debug!(method, "Alma request");

        let started = Instant::now();
        let response = self.transport.get(&url).await?;
        let seconds = started.elapsed().as_secs_f64();

        if self.enable_logging {
            let logged = if self.filter_params {
                self.base_url
                    .method_url(method, &self.redactor.filter(params))
            } else {
                url
            };
            debug!(url = %logged, seconds, code = response.code, "Sent request");
        }

        Ok(response)
    }
}

/// Turn a raw response into a validated document.
fn process_response(response: TransportResponse, check_status: bool) -> Result<Document> {
    if !response.is_success() {
        return Err(TransportError::Status {
            code: response.code,
            message: response.error,
        }
        .into());
    }

    let doc = Document::parse(&response.body)?;
    if check_status {
        status::validate(&doc)?;
    }
    Ok(doc)
}
