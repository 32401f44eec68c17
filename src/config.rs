use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::MIN_OUTPUT_COLUMNS;
use crate::error::{Result, ScraperError};

pub const CONFIG_ENV_VAR: &str = "ELECTION_SCRAPER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub retry: RetryConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("election_scraper/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 500,
            backoff_factor: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub summary_path: PathBuf,
    pub write_summary: bool,
    /// Runs producing fewer columns than this are treated as failed and nothing is written
    pub min_columns: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            summary_path: PathBuf::from("README.md"),
            write_summary: true,
            min_columns: MIN_OUTPUT_COLUMNS,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Resolve the config file: explicit path, then `ELECTION_SCRAPER_CONFIG`,
    /// then `config.toml` if it exists, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Self::load_from(Path::new(&path));
            }
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::load_from(default_path);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(ScraperError::Config("retry.max_attempts must be at least 1".into()));
        }
        if !self.retry.backoff_factor.is_finite() || self.retry.backoff_factor < 1.0 {
            return Err(ScraperError::Config("retry.backoff_factor must be >= 1.0".into()));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ScraperError::Config("http.timeout_seconds must be positive".into()));
        }
        Ok(())
    }
}
