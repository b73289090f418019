use anyhow::Context;
use clap::Parser;
use longbox::adapters::catalog::CatalogStore;
use longbox::adapters::comicvine::ComicVineClient;
use longbox::adapters::mylar::MylarClient;
use longbox::adapters::reading_list;
use longbox::core::reconcile;
use longbox::utils::{logger, validation::Validate};
use longbox::{CliConfig, EnrichmentDriver, FileConfig, RunConfig};
use std::fs;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting longbox");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let file = FileConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading settings from {}", cli.config))?;
    let run = RunConfig::resolve(&cli, file);
    if let Err(e) = run.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    tracing::info!("Loading data");
    let store = CatalogStore::new(&run.data_file);
    let catalog = store
        .load()
        .with_context(|| format!("reading catalog {}", run.data_file.display()))?;
    let entries = reading_list::load_reading_lists(&run.reading_lists)
        .with_context(|| format!("scanning {}", run.reading_lists.display()))?;

    let (mut set, merge_stats) = reconcile::merge(catalog, &entries);
    tracing::info!(
        "Found {} series in catalog, {} new from reading lists",
        merge_stats.catalog_series,
        merge_stats.new_series
    );

    tracing::info!("Checking series");
    let metadata = ComicVineClient::new(&run.comicvine.base_url, &run.comicvine.api_key);
    let library = MylarClient::new(&run.library.base_url, &run.library.api_key);
    let driver = EnrichmentDriver::new(metadata, library, run.options.clone());
    let stats = driver.enrich(&mut set, merge_stats).await;

    store
        .save(&set)
        .with_context(|| format!("writing catalog {}", run.data_file.display()))?;

    let summary = stats.render();
    println!("{}", summary);
    let results_path = write_results_file(&run.results_dir, &summary)?;
    tracing::info!("Summary written to {}", results_path.display());

    Ok(())
}

fn write_results_file(dir: &Path, summary: &str) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let name = format!("results-{}.txt", chrono::Local::now().format("%y%m%d%H%M%S"));
    let path = dir.join(name);
    fs::write(&path, summary).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
