use clap::Parser;
use reqwest::Url;
use std::path::{Path, PathBuf};

use crate::constants::OUTPUT_EXTENSION;
use crate::error::{Result, ScraperError};

#[derive(Debug, Parser)]
#[command(name = "election_scraper")]
#[command(about = "Scrapes municipal election results from volby.cz into a CSV file")]
#[command(version)]
pub struct Cli {
    /// Territorial unit results page, e.g.
    /// https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=2&xnumnuts=2109
    pub url: String,

    /// Output file (.csv)
    pub output: PathBuf,

    /// Config file (TOML); defaults to $ELECTION_SCRAPER_CONFIG or ./config.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Do not generate the summary document
    #[arg(long)]
    pub no_summary: bool,
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        validate_index_url(&self.url)?;
        validate_output_path(&self.output)
    }
}

pub fn validate_index_url(url: &str) -> Result<Url> {
    let invalid = |message: &str| ScraperError::InvalidUrl {
        url: url.to_string(),
        message: message.to_string(),
    };
    let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid("URL has no host"));
    }
    Ok(parsed)
}

pub fn validate_output_path(path: &Path) -> Result<()> {
    let name = path.to_string_lossy();
    if !name.ends_with(OUTPUT_EXTENSION) || name.len() == OUTPUT_EXTENSION.len() {
        return Err(ScraperError::Validation(format!(
            "output file '{}' must end with {}",
            name, OUTPUT_EXTENSION
        )));
    }
    Ok(())
}
