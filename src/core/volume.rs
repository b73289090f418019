use crate::domain::model::{SeriesKey, Volume};
use crate::domain::ports::MetadataService;

/// Publisher filtering applied to exact-match volumes.
#[derive(Debug, Clone, Default)]
pub struct PublisherPolicy {
    pub blacklist: Vec<String>,
    pub preferred: Vec<String>,
}

impl PublisherPolicy {
    fn is_blacklisted(&self, publisher: &str) -> bool {
        self.blacklist.iter().any(|p| p == publisher)
    }

    fn is_preferred(&self, publisher: &str) -> bool {
        self.preferred.iter().any(|p| p == publisher)
    }
}

/// Which selection branch fired, for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchBranch {
    /// Exactly one exact match, selected.
    Single,
    /// Multiple exact matches; selection policy picked one (or none, when
    /// every remaining candidate was blacklisted).
    Multiple,
    /// The only exact match had a blacklisted publisher.
    BlacklistOnly,
    /// No exact name+year match in the results.
    NoMatch,
    /// The search call itself failed.
    Failed,
}

/// Result of one volume search, sentinel-valued when unresolved.
#[derive(Debug, Clone)]
pub struct VolumeResolution {
    pub publisher: Option<String>,
    pub comic_id: Option<u64>,
    pub issue_count: Option<u64>,
    pub branch: MatchBranch,
    pub raw_results: usize,
    pub exact_matches: usize,
}

impl VolumeResolution {
    fn unresolved(branch: MatchBranch, raw_results: usize, exact_matches: usize) -> Self {
        Self {
            publisher: None,
            comic_id: None,
            issue_count: None,
            branch,
            raw_results,
            exact_matches,
        }
    }

    fn selected(volume: &Volume, branch: MatchBranch, raw: usize, exact: usize) -> Self {
        Self {
            publisher: Some(volume.publisher.clone()),
            comic_id: Some(volume.id),
            issue_count: Some(volume.issue_count),
            branch,
            raw_results: raw,
            exact_matches: exact,
        }
    }
}

/// Issue one search call and run the selection policy over the results.
/// A failed call degrades to an unresolved result for this series only.
pub async fn resolve<M: MetadataService + ?Sized>(
    service: &M,
    key: &SeriesKey,
    policy: &PublisherPolicy,
) -> VolumeResolution {
    tracing::debug!("searching volumes for {}", key);
    match service.search_volumes(&key.name).await {
        Ok(volumes) => choose(key, &volumes, policy),
        Err(e) => {
            tracing::warn!("volume search failed for {}: {}", key, e);
            VolumeResolution::unresolved(MatchBranch::Failed, 0, 0)
        }
    }
}

/// The selection policy over raw search results. Pure, so the branch logic
/// is testable without a live service.
///
/// Results are filtered down to exact name+year matches (strict equality,
/// never fuzzy), then partitioned by publisher into blacklisted, preferred
/// and other-allowed buckets. One exact match is taken unless blacklisted;
/// with several, the preferred bucket wins when non-empty, then the allowed
/// bucket, and within the winning bucket the volume with the most issues is
/// taken (ties go to the first encountered, which skips collected editions
/// that shadow an ongoing series under the same name).
pub fn choose(key: &SeriesKey, volumes: &[Volume], policy: &PublisherPolicy) -> VolumeResolution {
    let raw_results = volumes.len();

    let exact: Vec<&Volume> = volumes
        .iter()
        .filter(|v| v.name == key.name && v.start_year == key.year)
        .collect();

    let blacklisted: Vec<&Volume> = exact
        .iter()
        .copied()
        .filter(|v| policy.is_blacklisted(&v.publisher))
        .collect();
    let preferred: Vec<&Volume> = exact
        .iter()
        .copied()
        .filter(|v| !policy.is_blacklisted(&v.publisher) && policy.is_preferred(&v.publisher))
        .collect();
    let allowed: Vec<&Volume> = exact
        .iter()
        .copied()
        .filter(|v| !policy.is_blacklisted(&v.publisher) && !policy.is_preferred(&v.publisher))
        .collect();

    let exact_matches = exact.len().saturating_sub(blacklisted.len());

    match exact.len() {
        0 => {
            tracing::info!("no exact matches found for {}", key);
            VolumeResolution::unresolved(MatchBranch::NoMatch, raw_results, exact_matches)
        }
        1 => {
            if !blacklisted.is_empty() {
                tracing::info!(
                    "only blacklisted results for {} (publisher: {})",
                    key,
                    blacklisted[0].publisher
                );
                VolumeResolution::unresolved(MatchBranch::BlacklistOnly, raw_results, exact_matches)
            } else {
                VolumeResolution::selected(exact[0], MatchBranch::Single, raw_results, exact_matches)
            }
        }
        _ => {
            let publishers: Vec<&str> = exact.iter().map(|v| v.publisher.as_str()).collect();
            tracing::warn!(
                "multiple exact matches for {} (publishers: {})",
                key,
                publishers.join(", ")
            );

            let pool = if !preferred.is_empty() {
                &preferred
            } else if !allowed.is_empty() {
                &allowed
            } else {
                tracing::info!(
                    "no valid results for {}: {} blacklisted matches",
                    key,
                    blacklisted.len()
                );
                return VolumeResolution::unresolved(
                    MatchBranch::Multiple,
                    raw_results,
                    exact_matches,
                );
            };

            let best = most_issues(pool).expect("candidate pool is non-empty");
            VolumeResolution::selected(best, MatchBranch::Multiple, raw_results, exact_matches)
        }
    }
}

/// Strictly-greater comparison keeps the first encountered on ties.
fn most_issues<'a>(pool: &[&'a Volume]) -> Option<&'a Volume> {
    let mut best: Option<&'a Volume> = None;
    for &volume in pool {
        if best.map_or(true, |b| volume.issue_count > b.issue_count) {
            best = Some(volume);
        }
    }
    best
}
