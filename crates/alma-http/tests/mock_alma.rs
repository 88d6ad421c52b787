//! Mock Alma tests for the HTTP client.
//!
//! These tests use wiremock to stand in for the Alma webservice and check
//! the full pipeline over real HTTP.

use std::time::Duration;

use alma_core::error::TransportError;
use alma_core::{AlmaClient, ClientConfig, Error, SearchQuery, SearchType};
use alma_http::{HttpAlmaClient, HttpTransport};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn mock_base_url(server: &MockServer) -> String {
    format!("http://127.0.0.1:{}/alma/", server.address().port())
}

fn client_for(server: &MockServer) -> HttpAlmaClient {
    let mut config = ClientConfig::new(mock_base_url(server));
    config.enable_logging = true;
    alma_http::connect(&config).unwrap()
}

fn detail_body(ids: &[String], status: &str) -> String {
    let records: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<detailCatalogueRecord id="{id}" mediaClass="book">
                     <title value="Title {id}"/>
                     <holding branchId="main" nofAvailableForLoan="2" reservable="yes"/>
                   </detailCatalogueRecord>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
           <getCatalogueRecordDetailResponse>
             <status value="{status}" key="{status}Key"/>
             {records}
           </getCatalogueRecordDetailResponse>"#
    )
}

fn ids(range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|i| i.to_string()).collect()
}

async fn mount_detail_chunk(server: &MockServer, chunk: &[String], status: &str) {
    Mock::given(method("GET"))
        .and(path("/alma/catalogue/detail"))
        .and(query_param("catalogueRecordKey", chunk.join(",")))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_body(chunk, status)))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_page() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alma/catalogue/fulltextsearch"))
        .and(query_param("searchText", "tolkien"))
        .and(query_param("searchType", "fullText"))
        .and(query_param("startNo", "31"))
        .and(query_param("nofRecords", "30"))
        .and(header("user-agent", concat!("alma-http/", env!("CARGO_PKG_VERSION"))))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<searchCatalogueResponse>
                 <status value="ok"/>
                 <nofRecords>2</nofRecords>
                 <nofRecordsTotal>32</nofRecordsTotal>
                 <startNo>31</startNo>
                 <stopNo>32</stopNo>
                 <catalogueRecords>
                   <catalogueRecord id="a1"/>
                   <catalogueRecord id="a2"/>
                 </catalogueRecords>
               </searchCatalogueResponse>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = SearchQuery::new("tolkien")
        .search_type(SearchType::FullText)
        .start(31);
    let page = client.search(&query).await.unwrap();

    assert!(page.status_ok);
    assert_eq!(page.record_ids, vec!["a1", "a2"]);
    assert_eq!(page.total_count, 32);
    assert_eq!((page.window_start, page.window_end), (31, 32));
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_search_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alma/catalogue/fulltextsearch"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<searchCatalogueResponse><status value="error" key="searchError"/></searchCatalogueResponse>"#,
        ))
        .mount(&server)
        .await;

    let page = client_for(&server)
        .search(&SearchQuery::new("((("))
        .await
        .unwrap();

    assert!(!page.status_ok);
    assert!(page.record_ids.is_empty());
}

// ============================================================================
// Detail
// ============================================================================

#[tokio::test]
async fn test_detail_in_chunks() {
    init_tracing();
    let server = MockServer::start().await;
    let all = ids(0..120);

    mount_detail_chunk(&server, &all[0..50], "ok").await;
    mount_detail_chunk(&server, &all[50..100], "ok").await;
    mount_detail_chunk(&server, &all[100..120], "ok").await;

    let detail = client_for(&server)
        .catalogue_record_detail(&all)
        .await
        .unwrap();

    assert!(detail.status_ok);
    assert_eq!(detail.records.len(), 120);
    assert_eq!(detail.records["119"].titles, vec!["Title 119"]);
    assert_eq!(detail.records["0"].holdings.as_flat().unwrap()[0].available_count, 2);
}

#[tokio::test]
async fn test_detail_chunk_with_bad_status() {
    let server = MockServer::start().await;
    let all = ids(0..75);

    mount_detail_chunk(&server, &all[0..50], "ok").await;
    mount_detail_chunk(&server, &all[50..75], "error").await;

    let err = client_for(&server)
        .catalogue_record_detail(&all)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Communication(_)));
    assert_eq!(err.communication_key(), Some("errorKey"));
    assert_eq!(err.to_string(), "communication error: Status is not okay: errorKey");
}

#[tokio::test]
async fn test_detail_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alma/catalogue/detail"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .catalogue_record_detail(&["1"])
        .await
        .unwrap_err();

    match err {
        Error::Transport(TransportError::Status { code, ref message }) => {
            assert_eq!(code, 500);
            assert_eq!(message, " Internal Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_detail_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alma/catalogue/detail"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<getCatalogueRecordDetailResponse>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .catalogue_record_detail(&["1"])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Parse(_)));
}

#[tokio::test]
async fn test_periodical_detail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alma/catalogue/detail"))
        .and(query_param("catalogueRecordKey", "p1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<getCatalogueRecordDetailResponse>
                 <status value="ok"/>
                 <detailCatalogueRecord id="p1" mediaClass="periodical">
                   <compositeHoldings>
                     <holdingsYear value="2023">
                       <holdingsIssue value="4">
                         <holding branchId="north" nofAvailableForLoan="1" reservable="no"/>
                         <holding branchId="south" nofAvailableForLoan="2" reservable="yes"/>
                         <holding branchId="north" nofAvailableForLoan="1" reservable="yes"/>
                       </holdingsIssue>
                     </holdingsYear>
                   </compositeHoldings>
                 </detailCatalogueRecord>
               </getCatalogueRecordDetailResponse>"#,
        ))
        .mount(&server)
        .await;

    let detail = client_for(&server)
        .catalogue_record_detail(&["p1"])
        .await
        .unwrap();
    let record = &detail.records["p1"];
    assert!(record.is_periodical());

    let issue = record.holdings.as_periodical().unwrap().issue("2023", "4").unwrap();
    assert_eq!(issue.available_count, 4);
    assert_eq!(issue.branch_availability["north"], 2);
    assert_eq!(issue.branch_availability["south"], 2);
    assert_eq!(issue.reservable, "no");
}

// ============================================================================
// Transport
// ============================================================================

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<r/>")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::builder()
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let client = AlmaClient::new(mock_base_url(&server), transport).unwrap();

    let err = client.search(&SearchQuery::new("slow")).await.unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::Timeout)));
}

#[tokio::test]
async fn test_connection_refused() {
    let server = MockServer::start().await;
    let base = mock_base_url(&server);
    drop(server);

    let client = AlmaClient::new(base, HttpTransport::new().unwrap()).unwrap();
    let err = client.search(&SearchQuery::new("offline")).await.unwrap_err();

    assert!(matches!(err, Error::Transport(TransportError::Connection { .. })));
}
