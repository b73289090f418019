use std::collections::BTreeMap;
use std::fmt;

/// Spelling of the unresolved sentinel at the catalog boundary.
pub const UNKNOWN: &str = "Unknown";

/// Identity of a series: exact name plus publication year, both kept as the
/// strings the sources provide. Ordering by (name, year) gives the
/// deterministic processing order for a run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub name: String,
    pub year: String,
}

impl SeriesKey {
    pub fn new(name: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            year: year.into(),
        }
    }

    /// Reading-list names may carry commas that the catalog spelling lacks;
    /// matching tries this form after the exact one.
    pub fn without_commas(&self) -> SeriesKey {
        SeriesKey {
            name: self.name.replace(',', ""),
            year: self.year.clone(),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.year)
    }
}

/// One issue within a series. `issue_id` is `None` until the metadata
/// service resolves it; the catalog serializes that as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueEntry {
    pub number: String,
    pub issue_id: Option<u64>,
}

impl IssueEntry {
    pub fn unresolved(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            issue_id: None,
        }
    }
}

/// One catalog row: a series plus everything learned about it so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRecord {
    pub key: SeriesKey,
    pub issues: Vec<IssueEntry>,
    pub publisher: Option<String>,
    pub comic_id: Option<u64>,
    pub issue_count: Option<u64>,
    pub in_library: bool,
}

impl SeriesRecord {
    /// A record first seen in a reading list: all metadata unresolved.
    pub fn new_unresolved(key: SeriesKey, issues: Vec<IssueEntry>) -> Self {
        Self {
            key,
            issues,
            publisher: None,
            comic_id: None,
            issue_count: None,
            in_library: false,
        }
    }

    pub fn has_unresolved_issues(&self) -> bool {
        self.issues.iter().any(|issue| issue.issue_id.is_none())
    }

    pub fn resolved_issue_count(&self) -> usize {
        self.issues.iter().filter(|i| i.issue_id.is_some()).count()
    }
}

/// The working set for one run: exactly one record per key, iterated in
/// sorted key order.
pub type WorkingSet = BTreeMap<SeriesKey, SeriesRecord>;

/// One `(series, year, issueNumber)` triple extracted from a reading-list
/// document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingEntry {
    pub series: String,
    pub year: String,
    pub number: String,
}

/// A metadata-service search result for one series/printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub id: u64,
    pub name: String,
    pub start_year: String,
    pub publisher: String,
    pub issue_count: u64,
}

/// Issue-level identifier from the metadata service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeIssue {
    pub id: u64,
    pub number: String,
}
