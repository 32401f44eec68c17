use thiserror::Error;

/// Coarse failure category, stable enough for tests and run reports to match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    IndexParse,
    FieldParse,
    PageParse,
    Io,
    Output,
    Config,
    InvalidUrl,
    Validation,
}

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Index page could not be parsed: {0}")]
    IndexParse(String),

    /// Kind behind `SummaryFieldUnparsable` and `UnparsableVotes` diagnostics.
    /// Field failures are contained in the page parser and reported, never returned.
    #[error("Field '{field}' could not be parsed from '{text}'")]
    FieldParse { field: String, text: String },

    #[error("Detail page could not be parsed: {0}")]
    PageParse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl ScraperError {
    pub fn fetch(url: &str, message: impl Into<String>) -> Self {
        ScraperError::Fetch {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScraperError::Fetch { .. } => ErrorKind::Fetch,
            ScraperError::IndexParse(_) => ErrorKind::IndexParse,
            ScraperError::FieldParse { .. } => ErrorKind::FieldParse,
            ScraperError::PageParse(_) => ErrorKind::PageParse,
            ScraperError::Io(_) => ErrorKind::Io,
            ScraperError::Csv(_) => ErrorKind::Output,
            ScraperError::Toml(_) | ScraperError::Config(_) => ErrorKind::Config,
            ScraperError::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            ScraperError::Validation(_) => ErrorKind::Validation,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;
