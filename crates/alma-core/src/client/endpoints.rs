//! Alma REST method names and parameter keys.

/// Free-text search, answering with record ids and a paging envelope.
pub const CATALOGUE_SEARCH: &str = "catalogue/fulltextsearch";

/// Record details for a comma separated list of record ids.
pub const CATALOGUE_DETAIL: &str = "catalogue/detail";

/// Parameter carrying the record ids of a detail request.
pub const CATALOGUE_RECORD_KEY: &str = "catalogueRecordKey";
