use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "longbox")]
#[command(about = "Reconcile a comic catalog with CBL reading lists and enrich it from ComicVine/Mylar")]
pub struct CliConfig {
    /// Path to the TOML settings file
    #[arg(short, long, default_value = "longbox.toml")]
    pub config: String,

    /// Re-run metadata searches for series that already have a resolved id
    #[arg(long)]
    pub force_recheck_metadata: bool,

    /// Re-check library availability for series already marked as tracked
    #[arg(long)]
    pub force_recheck_library: bool,

    /// Add missing series to the library manager
    #[arg(long)]
    pub auto_add: bool,

    /// Skip issue-level id resolution
    #[arg(long)]
    pub skip_issue_validation: bool,

    /// Cap on metadata search calls for this run (overrides the settings file)
    #[arg(long)]
    pub search_limit: Option<u64>,

    /// Seconds between metadata-service calls (overrides the settings file)
    #[arg(long)]
    pub rate_seconds: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
