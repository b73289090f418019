pub mod availability;
pub mod driver;
pub mod issues;
pub mod reconcile;
pub mod report;
pub mod volume;

pub use driver::{EnrichmentDriver, EnrichmentOptions};
pub use report::RunStats;
