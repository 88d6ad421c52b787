//! Catalogue record details.

use serde::{Deserialize, Serialize};

use crate::document::DocumentNode;

use super::holdings::{Holdings, extract_holdings, extract_periodical_holdings};

/// Tag of one record in a `catalogue/detail` response.
pub const DETAIL_RECORD_TAG: &str = "detailCatalogueRecord";

/// `mediaClass` value that selects the nested holdings shape.
pub const PERIODICAL_MEDIA_CLASS: &str = "periodical";

/// Record-level circulation counters, kept as the raw attribute text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCounts {
    pub reservation_count: String,
    pub loan_count_year: String,
    pub loan_count_total: String,
    pub available_count: String,
}

impl RecordCounts {
    pub fn reservations(&self) -> Option<u32> {
        parse_count(&self.reservation_count)
    }

    pub fn loans_year(&self) -> Option<u32> {
        parse_count(&self.loan_count_year)
    }

    pub fn loans_total(&self) -> Option<u32> {
        parse_count(&self.loan_count_total)
    }

    pub fn available(&self) -> Option<u32> {
        parse_count(&self.available_count)
    }
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

/// A normalized catalogue record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueRecord {
    pub id: String,
    pub media_class: String,
    pub target_audience: String,
    pub resource_type: String,
    pub publication_year: String,
    pub edition: String,
    pub category: String,
    pub extent: String,
    pub title_series: String,
    pub title_original: String,
    pub titles: Vec<String>,
    pub authors: Vec<String>,
    pub descriptions: Vec<String>,
    pub isbns: Vec<String>,
    pub languages: Vec<String>,
    pub notes: Vec<String>,
    pub counts: RecordCounts,
    pub show_reservation_button: bool,
    pub holdings: Holdings,
}

impl CatalogueRecord {
    /// Parse one `detailCatalogueRecord` element.
    ///
    /// Records whose `mediaClass` is exactly `periodical` get nested
    /// year/issue holdings; everything else gets the flat list.
    pub fn from_node<N: DocumentNode>(node: &N) -> Self {
        let media_class = node.attr("mediaClass").to_string();

        let holdings = if media_class == PERIODICAL_MEDIA_CLASS {
            Holdings::Periodical(extract_periodical_holdings(node))
        } else {
            Holdings::Flat {
                holdings: extract_holdings(node),
            }
        };

        Self {
            id: node.attr("id").to_string(),
            target_audience: node.attr("targetAudience").to_string(),
            resource_type: node.attr("resourceType").to_string(),
            publication_year: node.attr("publicationYear").to_string(),
            edition: node.attr("edition").to_string(),
            category: node.attr("category").to_string(),
            extent: node.attr("extent").to_string(),
            title_series: node.attr("titleSeries").to_string(),
            title_original: node.attr("titleOriginal").to_string(),
            titles: values(node, "title"),
            authors: values(node, "author"),
            descriptions: values(node, "description"),
            isbns: values(node, "isbn"),
            languages: values(node, "language"),
            notes: values(node, "note"),
            counts: RecordCounts {
                reservation_count: node.attr("nofReservations").to_string(),
                loan_count_year: node.attr("nofLoansYear").to_string(),
                loan_count_total: node.attr("nofLoansTotal").to_string(),
                available_count: node.attr("nofAvailableForLoan").to_string(),
            },
            show_reservation_button: node.attr("showReservationButton") == "yes",
            media_class,
            holdings,
        }
    }

    pub fn is_periodical(&self) -> bool {
        self.holdings.is_periodical()
    }
}

/// `value` attributes of every descendant with the given tag.
fn values<N: DocumentNode>(node: &N, tag: &str) -> Vec<String> {
    node.find_all(tag)
        .into_iter()
        .map(|e| e.attr("value").to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    const BOOK: &str = r#"<detailCatalogueRecord id="123" mediaClass="book"
        targetAudience="adult" resourceType="text" publicationYear="2009"
        edition="2. udg." category="fiction" extent="412 s." titleSeries="Millennium"
        titleOriginal="Luftslottet som sprangdes" nofReservations="14"
        nofLoansYear="210" nofLoansTotal="n/a" nofAvailableForLoan="2"
        showReservationButton="yes">
      <titles><title value="Luftkastellet der blev sprængt"/></titles>
      <authors><author value="Larsson, Stieg"/><author value="Jensen, Anne"/></authors>
      <isbns><isbn value="9788770530439"/></isbns>
      <languages><language value="dan"/></languages>
      <holdings>
        <holding reservable="yes" branchId="hb" nofAvailableForLoan="2" nofTotal="5"/>
        <holding reservable="yes" branchId="nb" nofAvailableForLoan="0" nofTotal="1"/>
      </holdings>
    </detailCatalogueRecord>"#;

    fn parse(body: &str) -> CatalogueRecord {
        let doc = Document::parse(body.as_bytes()).unwrap();
        CatalogueRecord::from_node(doc.root_element())
    }

    #[test]
    fn scalar_attributes() {
        let record = parse(BOOK);
        assert_eq!(record.id, "123");
        assert_eq!(record.media_class, "book");
        assert_eq!(record.publication_year, "2009");
        assert_eq!(record.title_series, "Millennium");
        assert_eq!(record.extent, "412 s.");
        assert!(record.show_reservation_button);
    }

    #[test]
    fn repeated_children_in_order() {
        let record = parse(BOOK);
        assert_eq!(record.authors, vec!["Larsson, Stieg", "Jensen, Anne"]);
        assert_eq!(record.titles, vec!["Luftkastellet der blev sprængt"]);
        assert_eq!(record.isbns, vec!["9788770530439"]);
        assert!(record.descriptions.is_empty());
        assert!(record.notes.is_empty());
    }

    #[test]
    fn record_counts_stay_raw() {
        let record = parse(BOOK);
        assert_eq!(record.counts.loan_count_total, "n/a");
        assert_eq!(record.counts.loans_total(), None);
        assert_eq!(record.counts.reservations(), Some(14));
        assert_eq!(record.counts.available(), Some(2));
    }

    #[test]
    fn non_periodical_is_flat() {
        let record = parse(BOOK);
        assert!(!record.is_periodical());
        let holdings = record.holdings.as_flat().unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0].location.branch_id, "hb");
        assert!(record.holdings.as_periodical().is_none());
    }

    #[test]
    fn reservation_button_requires_exact_yes() {
        for (attr, expected) in [
            (r#"showReservationButton="yes""#, true),
            (r#"showReservationButton="Yes""#, false),
            (r#"showReservationButton="no""#, false),
            (r#"showReservationButton="""#, false),
            ("", false),
        ] {
            let record = parse(&format!(r#"<detailCatalogueRecord id="1" {attr}/>"#));
            assert_eq!(record.show_reservation_button, expected, "{attr}");
        }
    }

    #[test]
    fn periodical_is_nested() {
        let record = parse(
            r#"<detailCatalogueRecord id="9" mediaClass="periodical">
              <compositeHoldings>
                <holdings value="2020">
                  <holdings value="1">
                    <holding branchId="A" nofAvailableForLoan="3" reservable="yes"/>
                    <holding branchId="B" nofAvailableForLoan="0" reservable="no"/>
                  </holdings>
                </holdings>
              </compositeHoldings>
            </detailCatalogueRecord>"#,
        );

        assert!(record.is_periodical());
        assert!(record.holdings.as_flat().is_none());
        let periodical = record.holdings.as_periodical().unwrap();
        let agg = periodical.issue("2020", "1").unwrap();
        assert_eq!(agg.available_count, 3);
        assert_eq!(agg.branch_availability.len(), 1);
        assert_eq!(agg.branch_availability["A"], 3);
        assert_eq!(agg.reservable, "yes");
        assert_eq!(periodical.issue_holdings("2020", "1").unwrap().len(), 2);
    }

    #[test]
    fn media_class_match_is_exact() {
        let record = parse(
            r#"<detailCatalogueRecord id="9" mediaClass="Periodical">
              <compositeHoldings><year value="2020"><issue value="1">
                <holding branchId="A" nofAvailableForLoan="3"/>
              </issue></year></compositeHoldings>
            </detailCatalogueRecord>"#,
        );
        assert!(!record.is_periodical());
        assert_eq!(record.holdings.as_flat().unwrap().len(), 1);
    }
}
