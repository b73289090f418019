use crate::domain::model::{Volume, VolumeIssue};
use crate::utils::error::LookupError;
use async_trait::async_trait;

/// External metadata lookup service (ComicVine-shaped). Rate limiting is the
/// caller's responsibility.
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Search volumes by name. Returns the raw candidate list; exact-match
    /// filtering happens in the resolver.
    async fn search_volumes(&self, name: &str) -> Result<Vec<Volume>, LookupError>;

    /// Full issue list for one volume id.
    async fn list_issues(&self, volume_id: u64) -> Result<Vec<VolumeIssue>, LookupError>;
}

/// External library manager (Mylar-shaped). Sentinel ids never reach these
/// methods; callers short-circuit them to "not found".
#[async_trait]
pub trait LibraryManager: Send + Sync {
    /// Whether the series is already tracked.
    async fn has_series(&self, comic_id: u64) -> Result<bool, LookupError>;

    /// Ask the library to start tracking the series. Returns whether the
    /// service reported success.
    async fn add_series(&self, comic_id: u64) -> Result<bool, LookupError>;
}
