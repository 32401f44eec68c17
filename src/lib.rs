//! Scrapes municipal election results from volby.cz report pages.
//!
//! A run fetches one territorial-unit index page, follows every municipality
//! link on it, parses each detail page into a [`types::MunicipalityRecord`]
//! and reconciles the records into a single [`types::ResultTable`] whose party
//! columns are the union of all parties seen.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod infra;
pub mod logging;
pub mod metrics;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod reconcile;
pub mod types;

pub use app::ports::PageFetcher;
pub use error::{ErrorKind, Result, ScraperError};
pub use pipeline::{Pipeline, PipelineResult, RetryPolicy};
pub use reconcile::reconcile;
