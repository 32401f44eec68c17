//! Structured per-item events reported by the parsers and the pipeline.
//!
//! Nothing below the binary logs through a global handle for these events;
//! callers hand in a [`DiagnosticSink`]. The binary uses [`TracingSink`],
//! tests use [`CollectingSink`] and assert on what was reported.

use std::fmt;
use std::sync::Mutex;

use crate::error::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    NoTablesFound,
    NoMunicipalityLinks,
    LinkWithoutNameCell { href: String },
    UnresolvableLink { href: String },
    MunicipalityFound { id: String, name: String, url: String },
    SummaryFieldMissing { field: &'static str },
    SummaryFieldUnparsable { field: &'static str, text: String },
    PartyRowWithoutVotes { party: String },
    VoteCellWithoutParty { text: String },
    UnparsableVotes { party: String, text: String },
    FetchRetry { url: String, attempt: u32, error: String },
    MunicipalitySkipped { id: String, name: String, kind: ErrorKind, error: String },
    MunicipalityDegraded { id: String, name: String, error: String },
}

impl Diagnostic {
    /// Failure category this diagnostic stands for, if it reports a failure
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Diagnostic::SummaryFieldUnparsable { .. } | Diagnostic::UnparsableVotes { .. } => {
                Some(ErrorKind::FieldParse)
            }
            Diagnostic::FetchRetry { .. } => Some(ErrorKind::Fetch),
            Diagnostic::MunicipalitySkipped { kind, .. } => Some(*kind),
            Diagnostic::MunicipalityDegraded { .. } => Some(ErrorKind::PageParse),
            _ => None,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::MunicipalityFound { .. } | Diagnostic::FetchRetry { .. } => Severity::Info,
            Diagnostic::MunicipalitySkipped { .. } | Diagnostic::MunicipalityDegraded { .. } => {
                Severity::Error
            }
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoTablesFound => write!(f, "no tables found on index page"),
            Diagnostic::NoMunicipalityLinks => write!(f, "no municipality links found on index page"),
            Diagnostic::LinkWithoutNameCell { href } => {
                write!(f, "municipality link {} has no name cell", href)
            }
            Diagnostic::UnresolvableLink { href } => write!(f, "cannot resolve link {}", href),
            Diagnostic::MunicipalityFound { id, name, url } => {
                write!(f, "found municipality {} ({}) at {}", name, id, url)
            }
            Diagnostic::SummaryFieldMissing { field } => write!(f, "summary field {} missing", field),
            Diagnostic::SummaryFieldUnparsable { field, text } => {
                write!(f, "summary field {} unparsable: '{}'", field, text)
            }
            Diagnostic::PartyRowWithoutVotes { party } => {
                write!(f, "party row '{}' has no vote cell", party)
            }
            Diagnostic::VoteCellWithoutParty { text } => {
                write!(f, "vote cell '{}' has no party name cell", text)
            }
            Diagnostic::UnparsableVotes { party, text } => {
                write!(f, "votes for '{}' unparsable: '{}', row dropped", party, text)
            }
            Diagnostic::FetchRetry { url, attempt, error } => {
                write!(f, "retrying {} after attempt {}: {}", url, attempt, error)
            }
            Diagnostic::MunicipalitySkipped { id, name, kind, error } => {
                write!(f, "skipping municipality {} ({}): {:?} {}", name, id, kind, error)
            }
            Diagnostic::MunicipalityDegraded { id, name, error } => {
                write!(f, "municipality {} ({}) kept with empty data: {}", name, id, error)
            }
        }
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing` at a level matching their severity
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Info => tracing::info!("{}", diagnostic),
            Severity::Warning => tracing::warn!("{}", diagnostic),
            Severity::Error => tracing::error!("{}", diagnostic),
        }
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    items: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.items.lock() {
            Ok(items) => items.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count_where(&self, predicate: impl Fn(&Diagnostic) -> bool) -> usize {
        self.diagnostics().iter().filter(|d| predicate(d)).count()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match self.items.lock() {
            Ok(mut items) => items.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
