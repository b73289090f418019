pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{CliConfig, FileConfig, RunConfig};
pub use core::{EnrichmentDriver, EnrichmentOptions, RunStats};
pub use utils::error::{CatalogError, Result};
