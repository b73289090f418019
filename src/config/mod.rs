pub mod cli;
pub mod file;

pub use cli::CliConfig;
pub use file::{ComicVineConfig, FileConfig, LibraryConfig, PathsConfig, PublisherConfig};

use crate::core::volume::PublisherPolicy;
use crate::core::EnrichmentOptions;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{validate_path, validate_positive_number, validate_url, Validate};
use std::path::PathBuf;
use std::time::Duration;

/// Settings file merged with CLI overrides: everything one run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_file: PathBuf,
    pub reading_lists: PathBuf,
    pub results_dir: PathBuf,
    pub comicvine: ComicVineConfig,
    pub library: LibraryConfig,
    pub options: EnrichmentOptions,
}

impl RunConfig {
    pub fn resolve(cli: &CliConfig, file: FileConfig) -> Self {
        let options = EnrichmentOptions {
            search_limit: cli.search_limit.unwrap_or(file.comicvine.search_limit),
            rate_limit: Duration::from_secs(
                cli.rate_seconds.unwrap_or(file.comicvine.rate_seconds),
            ),
            metadata_enabled: file.comicvine.enabled,
            library_enabled: file.library.enabled,
            force_recheck_metadata: cli.force_recheck_metadata || file.comicvine.force_recheck,
            force_recheck_availability: cli.force_recheck_library || file.library.force_recheck,
            auto_add: cli.auto_add || file.library.auto_add,
            validate_issues: file.comicvine.validate_issues && !cli.skip_issue_validation,
            policy: PublisherPolicy {
                blacklist: file.publishers.blacklist.clone(),
                preferred: file.publishers.preferred.clone(),
            },
        };

        Self {
            data_file: PathBuf::from(&file.paths.data_file),
            reading_lists: PathBuf::from(&file.paths.reading_lists),
            results_dir: PathBuf::from(&file.paths.results_dir),
            comicvine: file.comicvine,
            library: file.library,
            options,
        }
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validate_path("paths.data_file", &self.data_file.to_string_lossy())?;
        validate_path("paths.reading_lists", &self.reading_lists.to_string_lossy())?;

        if self.comicvine.enabled {
            validate_url("comicvine.base_url", &self.comicvine.base_url)?;
            // Turning metadata lookups off is spelled `enabled = false`, not
            // a zero search limit.
            validate_positive_number("comicvine.search_limit", self.options.search_limit, 1)?;
            if self.comicvine.api_key.is_empty() {
                return Err(CatalogError::ConfigError {
                    message: "comicvine.api_key is required when comicvine.enabled is set"
                        .to_string(),
                });
            }
        }
        if self.library.enabled {
            validate_url("library.base_url", &self.library.base_url)?;
            if self.library.api_key.is_empty() {
                return Err(CatalogError::ConfigError {
                    message: "library.api_key is required when library.enabled is set".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> CliConfig {
        CliConfig::parse_from(std::iter::once("longbox").chain(args.iter().copied()))
    }

    #[test]
    fn cli_flags_override_the_settings_file() {
        let file = FileConfig::default();
        let run = RunConfig::resolve(
            &cli(&[
                "--force-recheck-metadata",
                "--search-limit",
                "5",
                "--rate-seconds",
                "0",
                "--skip-issue-validation",
            ]),
            file,
        );

        assert!(run.options.force_recheck_metadata);
        assert_eq!(run.options.search_limit, 5);
        assert_eq!(run.options.rate_limit, Duration::ZERO);
        assert!(!run.options.validate_issues);
    }

    #[test]
    fn settings_defaults_flow_through_when_cli_is_silent() {
        let run = RunConfig::resolve(&cli(&[]), FileConfig::default());

        assert_eq!(run.options.search_limit, 10_000);
        assert_eq!(run.options.rate_limit, Duration::from_secs(2));
        assert!(run.options.validate_issues);
        assert!(!run.options.auto_add);
        assert_eq!(run.data_file, PathBuf::from("Data/data.csv"));
        assert_eq!(run.options.policy.preferred, vec!["Marvel", "DC Comics"]);
    }

    #[test]
    fn enabled_comicvine_requires_an_api_key() {
        let run = RunConfig::resolve(&cli(&[]), FileConfig::default());
        // Default config enables ComicVine but has no key.
        assert!(run.validate().is_err());

        let mut file = FileConfig::default();
        file.comicvine.api_key = "abc".to_string();
        let run = RunConfig::resolve(&cli(&[]), file);
        assert!(run.validate().is_ok());
    }

    #[test]
    fn zero_search_limit_with_comicvine_enabled_is_rejected() {
        let mut file = FileConfig::default();
        file.comicvine.api_key = "abc".to_string();
        file.comicvine.search_limit = 0;
        let run = RunConfig::resolve(&cli(&[]), file);
        assert!(run.validate().is_err());

        let mut file = FileConfig::default();
        file.comicvine.enabled = false;
        file.comicvine.search_limit = 0;
        let run = RunConfig::resolve(&cli(&[]), file);
        assert!(run.validate().is_ok());
    }

    #[test]
    fn disabled_services_skip_url_and_key_checks() {
        let mut file = FileConfig::default();
        file.comicvine.enabled = false;
        file.comicvine.base_url = "not a url".to_string();
        let run = RunConfig::resolve(&cli(&[]), file);
        assert!(run.validate().is_ok());
    }
}
