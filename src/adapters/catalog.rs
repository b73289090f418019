use crate::domain::model::{IssueEntry, SeriesKey, SeriesRecord, WorkingSet, UNKNOWN};
use crate::utils::error::{CatalogError, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

pub const CSV_HEADERS: [&str; 7] = [
    "Series",
    "Year",
    "IssueList",
    "Publisher",
    "ComicID",
    "NumIssues",
    "InMylar",
];

/// The persisted catalog: one CSV file, one row per series. Loaded whole at
/// run start and rewritten whole (atomically, via a temp file) at run end.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all catalog rows. A missing file is an empty catalog, not an
    /// error; a malformed row is an error at this boundary.
    pub fn load(&self) -> Result<Vec<SeriesRecord>> {
        if !self.path.exists() {
            tracing::info!("no catalog at {}, starting fresh", self.path.display());
            return Ok(Vec::new());
        }
        tracing::debug!("reading catalog from {}", self.path.display());

        // Each serialized issue is two whitespace-delimited tokens: the
        // number, then the id (or the sentinel) in brackets.
        let issue_pattern =
            Regex::new(r"([^\s\[\]]+) \[([0-9]+|Unknown)\]").expect("issue pattern is valid");

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row?;
            if row.len() != CSV_HEADERS.len() {
                return Err(CatalogError::ParseError {
                    message: format!(
                        "{} row {}: expected {} columns, found {}",
                        self.path.display(),
                        index + 2,
                        CSV_HEADERS.len(),
                        row.len()
                    ),
                });
            }

            let issues = issue_pattern
                .captures_iter(&row[2])
                .map(|caps| IssueEntry {
                    number: caps[1].to_string(),
                    issue_id: caps[2].parse().ok(),
                })
                .collect();

            records.push(SeriesRecord {
                key: SeriesKey::new(&row[0], &row[1]),
                issues,
                publisher: field_value(&row[3]),
                comic_id: row[4].parse().ok(),
                issue_count: row[5].parse().ok(),
                in_library: &row[6] == "True",
            });
        }

        Ok(records)
    }

    /// Rewrite the whole catalog. The new content lands in a temp file that
    /// is renamed over the old one, so a crash mid-write never leaves a
    /// half-written catalog behind.
    pub fn save(&self, set: &WorkingSet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&tmp_path)?;
            writer.write_record(CSV_HEADERS)?;
            for record in set.values() {
                let issue_list = issue_list_field(&record.issues);
                let publisher = sentinel_or(record.publisher.as_deref());
                let comic_id = sentinel_or(record.comic_id.map(|id| id.to_string()).as_deref());
                let issue_count =
                    sentinel_or(record.issue_count.map(|n| n.to_string()).as_deref());
                writer.write_record([
                    record.key.name.as_str(),
                    record.key.year.as_str(),
                    issue_list.as_str(),
                    publisher.as_str(),
                    comic_id.as_str(),
                    issue_count.as_str(),
                    if record.in_library { "True" } else { "False" },
                ])?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::info!(
            "wrote {} series to {}",
            set.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn field_value(raw: &str) -> Option<String> {
    if raw.is_empty() || raw == UNKNOWN {
        None
    } else {
        Some(raw.to_string())
    }
}

fn sentinel_or(value: Option<&str>) -> String {
    value.unwrap_or(UNKNOWN).to_string()
}

fn issue_list_field(issues: &[IssueEntry]) -> String {
    issues
        .iter()
        .map(|issue| {
            let id = issue
                .issue_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string());
            format!("{} [{}]; ", issue.number, id)
        })
        .collect()
}
