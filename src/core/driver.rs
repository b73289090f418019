use crate::core::availability::{self, AvailabilityOptions, LibraryStatus};
use crate::core::issues::{self, IssueOutcome};
use crate::core::reconcile::MergeStats;
use crate::core::report::{IssueCoverage, RunStats};
use crate::core::volume::{self, PublisherPolicy};
use crate::domain::model::{SeriesKey, SeriesRecord, WorkingSet, UNKNOWN};
use crate::domain::ports::{LibraryManager, MetadataService};
use std::time::{Duration, Instant};

/// Resolved run parameters for one enrichment pass.
#[derive(Debug, Clone)]
pub struct EnrichmentOptions {
    /// Maximum metadata search calls for this run. Zero disables volume
    /// resolution entirely.
    pub search_limit: u64,
    /// Minimum spacing between metadata-service calls.
    pub rate_limit: Duration,
    pub metadata_enabled: bool,
    pub library_enabled: bool,
    pub force_recheck_metadata: bool,
    pub force_recheck_availability: bool,
    pub auto_add: bool,
    pub validate_issues: bool,
    pub policy: PublisherPolicy,
}

impl Default for EnrichmentOptions {
    fn default() -> Self {
        Self {
            search_limit: 10_000,
            rate_limit: Duration::from_secs(2),
            metadata_enabled: true,
            library_enabled: true,
            force_recheck_metadata: false,
            force_recheck_availability: false,
            auto_add: false,
            validate_issues: true,
            policy: PublisherPolicy::default(),
        }
    }
}

/// Earliest-next-call rate limit for metadata calls. The readiness
/// computation takes an explicit `now` so pacing is testable without real
/// delays; only `pace` actually sleeps.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    next_call: Option<Instant>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_call: None,
        }
    }

    /// How long until the next call is allowed at `now`. Zero before the
    /// first call of the run.
    pub fn ready_in(&self, now: Instant) -> Duration {
        self.next_call
            .map(|at| at.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }

    pub fn record_call(&mut self, now: Instant) {
        self.next_call = Some(now + self.min_interval);
    }

    async fn pace(&mut self) {
        let wait = self.ready_in(Instant::now());
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        self.record_call(Instant::now());
    }
}

/// Process-wide cap on metadata search calls. Consumed exactly once per
/// attempted volume search.
#[derive(Debug)]
pub struct CallBudget {
    limit: u64,
    used: u64,
}

impl CallBudget {
    pub fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    pub fn try_acquire(&mut self) -> bool {
        if self.used < self.limit {
            self.used += 1;
            true
        } else {
            false
        }
    }

    pub fn used(&self) -> u64 {
        self.used
    }
}

/// Drives volume resolution, issue validation and availability checking over
/// every series in the working set, strictly sequentially in sorted key
/// order. Every stage degrades to sentinels on failure, so each series
/// always reaches its per-series report and the loop never aborts.
pub struct EnrichmentDriver<M, L> {
    metadata: M,
    library: L,
    options: EnrichmentOptions,
}

impl<M: MetadataService, L: LibraryManager> EnrichmentDriver<M, L> {
    pub fn new(metadata: M, library: L, options: EnrichmentOptions) -> Self {
        Self {
            metadata,
            library,
            options,
        }
    }

    pub async fn enrich(&self, set: &mut WorkingSet, merge: MergeStats) -> RunStats {
        let mut stats = RunStats {
            merge,
            series_total: set.len(),
            ..Default::default()
        };
        let mut pacer = Pacer::new(self.options.rate_limit);
        let mut budget = CallBudget::new(self.options.search_limit);
        let total = set.len();

        for (index, (key, record)) in set.iter_mut().enumerate() {
            self.process_series(
                key,
                record,
                index + 1,
                total,
                &mut pacer,
                &mut budget,
                &mut stats,
            )
            .await;
        }

        stats.searches_used = budget.used();
        stats
    }

    async fn process_series(
        &self,
        key: &SeriesKey,
        record: &mut SeriesRecord,
        position: usize,
        total: usize,
        pacer: &mut Pacer,
        budget: &mut CallBudget,
        stats: &mut RunStats,
    ) {
        let options = &self.options;
        let mut search_report = None;

        if record.comic_id.is_some() && !options.force_recheck_metadata {
            stats.volume.match_existing += 1;
        }

        if (record.comic_id.is_none() || options.force_recheck_metadata)
            && options.metadata_enabled
        {
            if budget.try_acquire() {
                pacer.pace().await;
                let resolution = volume::resolve(&self.metadata, key, &options.policy).await;
                stats.volume.record(resolution.branch);
                search_report = Some((resolution.raw_results, resolution.exact_matches));
                record.publisher = resolution.publisher;
                record.comic_id = resolution.comic_id;
                record.issue_count = resolution.issue_count;
            } else {
                tracing::debug!("search budget exhausted, skipping volume lookup for {}", key);
            }
        }

        if options.validate_issues
            && options.metadata_enabled
            && record.has_unresolved_issues()
            && record.comic_id.is_some()
        {
            pacer.pace().await;
            match issues::resolve(&self.metadata, record.comic_id, &mut record.issues).await {
                IssueOutcome::Resolved { resolved } => {
                    tracing::debug!("resolved {} issue ids for {}", resolved, key);
                }
                IssueOutcome::Skipped | IssueOutcome::Failed => {}
            }
        }

        let status = if options.library_enabled {
            let availability_options = AvailabilityOptions {
                force_recheck: options.force_recheck_availability,
                auto_add: options.auto_add,
            };
            let (in_library, status) = availability::check(
                &self.library,
                record.comic_id,
                record.in_library,
                availability_options,
            )
            .await;
            record.in_library = in_library;
            status
        } else if record.in_library {
            LibraryStatus::FoundUnchecked
        } else {
            LibraryStatus::MissingUnchecked
        };
        stats.library.record(status);

        let found = record.resolved_issue_count();
        let issue_total = record.issues.len();
        stats.issues.record(IssueCoverage {
            key: key.clone(),
            comic_id: record.comic_id,
            found,
            total: issue_total,
        });

        let id_label = record
            .comic_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());
        tracing::info!("[{}/{}] {} [{}]", position, total, key, id_label);
        if let Some((raw, matches)) = search_report {
            tracing::info!("    volumes: {} results, {} matches", raw, matches);
        }
        tracing::info!("    issues: {} / {}", found, issue_total);
        tracing::info!("    library: {}", status.label());
    }
}
