use crate::core::availability::LibraryStatus;
use crate::core::reconcile::MergeStats;
use crate::core::volume::MatchBranch;
use crate::domain::model::SeriesKey;
use std::fmt::Write;

/// Volume-resolution tallies, one increment per series.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeStats {
    pub match_existing: usize,
    pub match_single: usize,
    pub match_multiple: usize,
    pub no_match_blacklist: usize,
    pub no_match: usize,
    pub lookup_failed: usize,
}

impl VolumeStats {
    pub fn record(&mut self, branch: MatchBranch) {
        match branch {
            MatchBranch::Single => self.match_single += 1,
            MatchBranch::Multiple => self.match_multiple += 1,
            MatchBranch::BlacklistOnly => self.no_match_blacklist += 1,
            MatchBranch::NoMatch => self.no_match += 1,
            MatchBranch::Failed => self.lookup_failed += 1,
        }
    }
}

/// Issue-id coverage for one series, itemized in the summary when partial or
/// zero.
#[derive(Debug, Clone)]
pub struct IssueCoverage {
    pub key: SeriesKey,
    pub comic_id: Option<u64>,
    pub found: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default)]
pub struct IssueStats {
    pub full: usize,
    pub partial: Vec<IssueCoverage>,
    pub none: Vec<IssueCoverage>,
}

impl IssueStats {
    pub fn record(&mut self, coverage: IssueCoverage) {
        if coverage.found == 0 {
            self.none.push(coverage);
        } else if coverage.found != coverage.total {
            self.partial.push(coverage);
        } else {
            self.full += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryStats {
    pub found_added: usize,
    pub found_not_added: usize,
    pub found_unchecked: usize,
    pub missing_not_added: usize,
    pub missing_add_failed: usize,
    pub missing_unchecked: usize,
}

impl LibraryStats {
    pub fn record(&mut self, status: LibraryStatus) {
        match status {
            LibraryStatus::FoundAdded => self.found_added += 1,
            LibraryStatus::FoundNotAdded => self.found_not_added += 1,
            LibraryStatus::FoundUnchecked => self.found_unchecked += 1,
            LibraryStatus::MissingNotAdded => self.missing_not_added += 1,
            LibraryStatus::MissingAddFailed => self.missing_add_failed += 1,
            LibraryStatus::MissingUnchecked => self.missing_unchecked += 1,
        }
    }
}

/// Everything the run summary needs, threaded through the driver instead of
/// living in globals.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub merge: MergeStats,
    pub series_total: usize,
    pub searches_used: u64,
    pub volume: VolumeStats,
    pub issues: IssueStats,
    pub library: LibraryStats,
}

impl RunStats {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "*** SUMMARY ***");
        let _ = writeln!(out);
        let _ = writeln!(out, "Series: {}", self.series_total);
        let _ = writeln!(
            out,
            "  {} from catalog, {} in reading lists, {} new",
            self.merge.catalog_series, self.merge.reading_list_series, self.merge.new_series
        );
        let _ = writeln!(out, "Metadata searches used: {}", self.searches_used);
        let _ = writeln!(out);

        let _ = writeln!(out, "Volumes:");
        let _ = writeln!(out, "  Match (Existing) = {}", self.volume.match_existing);
        let _ = writeln!(out, "  Match (Single) = {}", self.volume.match_single);
        let _ = writeln!(out, "  Match (Multiple) = {}", self.volume.match_multiple);
        let _ = writeln!(
            out,
            "  No Match (Blacklist) = {}",
            self.volume.no_match_blacklist
        );
        let _ = writeln!(out, "  No Match (Unfound) = {}", self.volume.no_match);
        let _ = writeln!(out, "  Lookup Failed = {}", self.volume.lookup_failed);
        let _ = writeln!(out);

        let _ = writeln!(out, "Issues:");
        let _ = writeln!(out, "  Full Match = {}", self.issues.full);
        let _ = writeln!(out, "  Partial Match = {}", self.issues.partial.len());
        for coverage in &self.issues.partial {
            let _ = writeln!(out, "    {}", format_coverage(coverage));
        }
        let _ = writeln!(out, "  No Match = {}", self.issues.none.len());
        for coverage in &self.issues.none {
            let _ = writeln!(out, "    {}", format_coverage(coverage));
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "Library status:");
        let _ = writeln!(out, "  Found (Added) = {}", self.library.found_added);
        let _ = writeln!(out, "  Found (Not Added) = {}", self.library.found_not_added);
        let _ = writeln!(out, "  Found (Unchecked) = {}", self.library.found_unchecked);
        let _ = writeln!(
            out,
            "  Missing (Not Added) = {}",
            self.library.missing_not_added
        );
        let _ = writeln!(
            out,
            "  Missing (Add Failed) = {}",
            self.library.missing_add_failed
        );
        let _ = writeln!(
            out,
            "  Missing (Unchecked) = {}",
            self.library.missing_unchecked
        );

        out
    }
}

fn format_coverage(coverage: &IssueCoverage) -> String {
    let id = coverage
        .comic_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| crate::domain::model::UNKNOWN.to_string());
    format!(
        "{} [{}] : {} / {}",
        coverage.key, id, coverage.found, coverage.total
    )
}
