use crate::domain::model::IssueEntry;
use crate::domain::ports::MetadataService;
use std::collections::HashMap;

/// Outcome of the issue-id pass for one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueOutcome {
    /// The series id is still the sentinel; nothing to look up.
    Skipped,
    /// The lookup ran; `resolved` entries gained an id this pass.
    Resolved { resolved: usize },
    /// The lookup call failed; the list is unchanged.
    Failed,
}

/// Fill sentinel issue ids from the metadata service's issue list for the
/// resolved series id. Entries that already carry an id are never
/// re-validated; a transport failure leaves the whole list untouched.
pub async fn resolve<M: MetadataService + ?Sized>(
    service: &M,
    comic_id: Option<u64>,
    issues: &mut [IssueEntry],
) -> IssueOutcome {
    let Some(comic_id) = comic_id else {
        return IssueOutcome::Skipped;
    };

    let listing = match service.list_issues(comic_id).await {
        Ok(listing) => listing,
        Err(e) => {
            tracing::warn!("issue lookup failed for volume {}: {}", comic_id, e);
            return IssueOutcome::Failed;
        }
    };

    // First occurrence wins when the service reports a number twice.
    let mut by_number: HashMap<&str, u64> = HashMap::new();
    for issue in &listing {
        by_number.entry(issue.number.as_str()).or_insert(issue.id);
    }

    let mut resolved = 0;
    for entry in issues.iter_mut().filter(|e| e.issue_id.is_none()) {
        if let Some(&id) = by_number.get(entry.number.as_str()) {
            entry.issue_id = Some(id);
            resolved += 1;
        }
    }

    IssueOutcome::Resolved { resolved }
}
