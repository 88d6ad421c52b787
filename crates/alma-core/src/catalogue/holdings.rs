//! Holdings extraction and periodical aggregation.

use std::collections::BTreeMap;
use std::num::IntErrorKind;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::document::DocumentNode;

/// Tag of a single holding entry.
pub const HOLDING_TAG: &str = "holding";

/// Tag of the periodical year/issue container.
pub const COMPOSITE_HOLDINGS_TAG: &str = "compositeHoldings";

/// Where a holding is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingLocation {
    pub collection_id: String,
    pub sublocation_id: String,
    pub location_id: String,
    pub department_id: String,
    pub branch_id: String,
    pub organisation_id: String,
}

/// One physical or logical copy with its availability counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    /// Raw reservable flag as sent by the server (usually `yes`/`no`).
    pub reservable: String,
    pub status: String,
    pub ordered_count: i64,
    pub checked_out_count: i64,
    pub reference_count: i64,
    pub total_count: i64,
    pub available_count: i64,
    pub shelf_mark: String,
    /// Raw `firstLoanDueDate` attribute.
    pub available_from: String,
    pub location: HoldingLocation,
}

impl Holding {
    /// Read one `holding` element.
    pub fn from_node<N: DocumentNode>(node: &N) -> Self {
        Self {
            reservable: node.attr("reservable").to_string(),
            status: node.attr("status").to_string(),
            ordered_count: count(node, "nofOrdered"),
            checked_out_count: count(node, "nofCheckedOut"),
            reference_count: count(node, "nofReference"),
            total_count: count(node, "nofTotal"),
            available_count: count(node, "nofAvailableForLoan"),
            shelf_mark: node.attr("shelfMark").to_string(),
            available_from: node.attr("firstLoanDueDate").to_string(),
            location: HoldingLocation {
                collection_id: node.attr("collectionId").to_string(),
                sublocation_id: node.attr("subLocationId").to_string(),
                location_id: node.attr("locationId").to_string(),
                department_id: node.attr("departmentId").to_string(),
                branch_id: node.attr("branchId").to_string(),
                organisation_id: node.attr("organisationId").to_string(),
            },
        }
    }

    /// True iff the reservable flag is exactly `yes`.
    pub fn is_reservable(&self) -> bool {
        self.reservable == "yes"
    }

    /// The date the holding becomes available, when it is a valid ISO date.
    pub fn available_from_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.available_from.trim(), "%Y-%m-%d").ok()
    }
}

/// Holding counters coerce to integers from their leading digits, so `3.0`
/// and `3 copies` read as 3. No leading digits counts as zero; values past
/// the `i64` range clamp to its bounds.
fn count<N: DocumentNode>(node: &N, name: &str) -> i64 {
    leading_integer(node.attr(name))
}

fn leading_integer(raw: &str) -> i64 {
    let raw = raw.trim_start();
    let sign_len = usize::from(raw.starts_with(['+', '-']));
    let digits_len = raw[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    match raw[..sign_len + digits_len].parse::<i64>() {
        Ok(value) => value,
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => 0,
        },
    }
}

/// Availability totals for one periodical issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueAggregate {
    /// Sum of positive `available_count` over the issue's holdings.
    pub available_count: i64,
    /// Positive availability summed per branch id.
    pub branch_availability: BTreeMap<String, i64>,
    /// Reservable flag of the first holding in the issue.
    pub reservable: String,
}

impl IssueAggregate {
    /// Aggregate an issue's holdings.
    ///
    /// Holdings with zero or negative availability contribute neither to the
    /// total nor to the branch map. Sums saturate at `i64::MAX`. An empty
    /// issue yields the zero value.
    pub fn from_holdings(holdings: &[Holding]) -> Self {
        let Some(first) = holdings.first() else {
            return Self::default();
        };

        let mut aggregate = Self {
            reservable: first.reservable.clone(),
            ..Self::default()
        };

        for holding in holdings.iter().filter(|h| h.available_count > 0) {
            aggregate.available_count = aggregate
                .available_count
                .saturating_add(holding.available_count);
            let branch = aggregate
                .branch_availability
                .entry(holding.location.branch_id.clone())
                .or_insert(0);
            *branch = branch.saturating_add(holding.available_count);
        }

        aggregate
    }
}

/// Nested periodical holdings keyed by year label, then issue label.
pub type YearIssueMap<T> = BTreeMap<String, BTreeMap<String, T>>;

/// Holdings of a periodical, grouped by year and issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicalHoldings {
    pub holdings: YearIssueMap<Vec<Holding>>,
    pub issues: YearIssueMap<IssueAggregate>,
}

impl PeriodicalHoldings {
    /// Holdings of one issue.
    pub fn issue_holdings(&self, year: &str, issue: &str) -> Option<&[Holding]> {
        self.holdings
            .get(year)
            .and_then(|issues| issues.get(issue))
            .map(Vec::as_slice)
    }

    /// Aggregate of one issue.
    pub fn issue(&self, year: &str, issue: &str) -> Option<&IssueAggregate> {
        self.issues.get(year).and_then(|issues| issues.get(issue))
    }
}

/// The two mutually exclusive holdings shapes of a catalogue record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Holdings {
    /// Non-periodical material: a flat list in document order.
    Flat { holdings: Vec<Holding> },
    /// Periodicals: year → issue → holdings, plus per-issue aggregates.
    Periodical(PeriodicalHoldings),
}

impl Holdings {
    /// The flat holdings list, for non-periodicals.
    pub fn as_flat(&self) -> Option<&[Holding]> {
        match self {
            Holdings::Flat { holdings } => Some(holdings.as_slice()),
            Holdings::Periodical(_) => None,
        }
    }

    /// The nested holdings, for periodicals.
    pub fn as_periodical(&self) -> Option<&PeriodicalHoldings> {
        match self {
            Holdings::Flat { .. } => None,
            Holdings::Periodical(p) => Some(p),
        }
    }

    pub fn is_periodical(&self) -> bool {
        matches!(self, Holdings::Periodical(_))
    }
}

/// Read every `holding` element beneath `node`, in document order.
pub fn extract_holdings<N: DocumentNode>(node: &N) -> Vec<Holding> {
    node.find_all(HOLDING_TAG)
        .into_iter()
        .map(Holding::from_node)
        .collect()
}

/// Build the year → issue structure of a periodical record.
///
/// Year groups are the element children of each `compositeHoldings`
/// container and issue groups are the element children of a year group;
/// both carry their label in a `value` attribute. A repeated year or issue
/// label replaces the earlier entry.
pub fn extract_periodical_holdings<N: DocumentNode>(node: &N) -> PeriodicalHoldings {
    let mut periodical = PeriodicalHoldings::default();

    for container in node.find_all(COMPOSITE_HOLDINGS_TAG) {
        for year_group in container.children() {
            let year = year_group.attr("value");
            for issue_group in year_group.children() {
                let issue = issue_group.attr("value");
                let holdings = extract_holdings(issue_group);
                let aggregate = IssueAggregate::from_holdings(&holdings);

                periodical
                    .holdings
                    .entry(year.to_string())
                    .or_default()
                    .insert(issue.to_string(), holdings);
                periodical
                    .issues
                    .entry(year.to_string())
                    .or_default()
                    .insert(issue.to_string(), aggregate);
            }
        }
    }

    periodical
}
