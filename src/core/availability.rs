use crate::domain::ports::LibraryManager;

/// Per-series library outcome. Each series lands in exactly one bucket per
/// run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryStatus {
    FoundNotAdded,
    FoundAdded,
    FoundUnchecked,
    MissingNotAdded,
    MissingAddFailed,
    MissingUnchecked,
}

impl LibraryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LibraryStatus::FoundNotAdded => "Found (Not Added)",
            LibraryStatus::FoundAdded => "Found (Added)",
            LibraryStatus::FoundUnchecked => "Found (Unchecked)",
            LibraryStatus::MissingNotAdded => "Missing (Not Added)",
            LibraryStatus::MissingAddFailed => "Missing (Add Failed)",
            LibraryStatus::MissingUnchecked => "Missing (Unchecked)",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AvailabilityOptions {
    pub force_recheck: bool,
    pub auto_add: bool,
}

/// Check (and optionally update) whether the series is tracked by the
/// library manager. Returns the new `in_library` flag plus the status
/// bucket.
///
/// The check is skipped when the catalog already says the series is tracked,
/// unless a recheck is forced. A sentinel series id short-circuits to "not
/// found" without a network call, and any transport failure degrades the
/// same way.
pub async fn check<L: LibraryManager + ?Sized>(
    library: &L,
    comic_id: Option<u64>,
    in_library: bool,
    options: AvailabilityOptions,
) -> (bool, LibraryStatus) {
    let check_needed = !in_library || options.force_recheck;

    let (mut in_library, mut status) = if check_needed {
        let found = match comic_id {
            Some(id) => match library.has_series(id).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!("library check failed for {}: {}", id, e);
                    false
                }
            },
            None => false,
        };
        if found {
            (true, LibraryStatus::FoundNotAdded)
        } else {
            (false, LibraryStatus::MissingNotAdded)
        }
    } else if in_library {
        (true, LibraryStatus::FoundUnchecked)
    } else {
        (false, LibraryStatus::MissingUnchecked)
    };

    if !in_library && options.auto_add {
        let added = match comic_id {
            Some(id) => match library.add_series(id).await {
                Ok(added) => added,
                Err(e) => {
                    tracing::warn!("library add failed for {}: {}", id, e);
                    false
                }
            },
            None => false,
        };
        if added {
            in_library = true;
            status = LibraryStatus::FoundAdded;
        } else {
            status = LibraryStatus::MissingAddFailed;
        }
    }

    (in_library, status)
}
