use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

use election_scraper::cli::Cli;
use election_scraper::config::Config;
use election_scraper::diagnostics::TracingSink;
use election_scraper::infra::ReqwestFetcher;
use election_scraper::output::{check_writable, write_csv_file, write_summary};
use election_scraper::{logging, Pipeline, RetryPolicy};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging();

    let cli = Cli::parse();
    if let Err(e) = cli.validate() {
        warn!("{}", e);
        return Ok(ExitCode::FAILURE);
    }

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    info!("Election results URL: {}", cli.url);

    let fetcher = Arc::new(ReqwestFetcher::new(&config.http)?);
    let pipeline = Pipeline::new(fetcher, Arc::new(TracingSink), RetryPolicy::from(&config.retry));
    let result = pipeline
        .run(&cli.url)
        .await
        .with_context(|| format!("Failed to scrape index page {}", cli.url))?;

    if !result.skipped.is_empty() {
        warn!("{} municipalities skipped:", result.skipped.len());
        for skipped in &result.skipped {
            warn!("   - {} ({}): {}", skipped.municipality.name, skipped.municipality.id, skipped.error);
        }
    }

    if let Err(e) = check_writable(&result.table, config.output.min_columns) {
        warn!("{}; nothing written", e);
        return Ok(ExitCode::FAILURE);
    }

    let rows = write_csv_file(&result.table, &cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    info!("Saved {} rows to '{}'", rows, cli.output.display());

    if config.output.write_summary && !cli.no_summary {
        let path = &config.output.summary_path;
        write_summary(&result.table, &cli.url, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Summary written to '{}'", path.display());
    }

    Ok(ExitCode::SUCCESS)
}
