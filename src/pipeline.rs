use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::app::ports::PageFetcher;
use crate::config::RetryConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{ErrorKind, Result, ScraperError};
use crate::parser::{parse_detail, parse_index};
use crate::reconcile::reconcile;
use crate::types::{MunicipalityRecord, MunicipalityRef, ResultTable};

/// How often, and how patiently, a failed fetch is repeated
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub backoff_factor: f64,
}

impl RetryPolicy {
    /// Exactly one attempt
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
            backoff_factor: 1.0,
        }
    }

    /// Pause before the attempt following `attempt` (1-based).
    ///
    /// A backoff factor below 1.0 or not finite counts as 1.0; an overflowing delay saturates.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        if self.delay.is_zero() {
            return Duration::ZERO;
        }
        let factor = if self.backoff_factor.is_finite() && self.backoff_factor >= 1.0 {
            self.backoff_factor
        } else {
            1.0
        };
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        Duration::try_from_secs_f64(self.delay.as_secs_f64() * factor.powi(exponent))
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: Duration::from_millis(config.delay_ms),
            backoff_factor: config.backoff_factor.max(1.0),
        }
    }
}

/// A municipality that contributed no row
#[derive(Debug, Clone)]
pub struct SkippedMunicipality {
    pub municipality: MunicipalityRef,
    pub kind: ErrorKind,
    pub error: String,
}

/// Result of a complete pipeline run
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub table: ResultTable,
    pub discovered: usize,
    pub parsed: usize,
    pub degraded: usize,
    pub skipped: Vec<SkippedMunicipality>,
}

impl PipelineResult {
    /// No municipality produced a row. The run finished, but there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Index discovery, then sequential per-municipality fetch and parse, then reconciliation
pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    sink: Arc<dyn DiagnosticSink>,
    retry: RetryPolicy,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        sink: Arc<dyn DiagnosticSink>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            fetcher,
            sink,
            retry,
        }
    }

    /// Run and return only the reconciled table
    pub async fn run_table(&self, index_url: &str) -> Result<ResultTable> {
        Ok(self.run(index_url).await?.table)
    }

    /// Run the whole scrape for one territorial unit.
    ///
    /// Only a failure to fetch or parse the index page is returned as an error.
    /// Municipality failures are recorded in the result and the run goes on.
    #[instrument(skip(self))]
    pub async fn run(&self, index_url: &str) -> Result<PipelineResult> {
        info!("Fetching municipality index");
        let index_markup = self.fetch_with_retry(index_url).await?;
        let municipalities = parse_index(&index_markup, index_url, self.sink.as_ref())?;
        info!("Discovered {} municipalities", municipalities.len());
        crate::metrics::municipalities_discovered(municipalities.len());

        let discovered = municipalities.len();
        let mut records = Vec::with_capacity(discovered);
        let mut skipped = Vec::new();
        let mut degraded = 0;

        for (i, municipality) in municipalities.into_iter().enumerate() {
            info!(
                "Processing municipality {}/{}: {} ({})",
                i + 1,
                discovered,
                municipality.name,
                municipality.id
            );

            let markup = match self.fetch_with_retry(&municipality.detail_url).await {
                Ok(markup) => markup,
                Err(e) => {
                    self.sink.report(Diagnostic::MunicipalitySkipped {
                        id: municipality.id.clone(),
                        name: municipality.name.clone(),
                        kind: e.kind(),
                        error: e.to_string(),
                    });
                    crate::metrics::municipality_skipped();
                    skipped.push(SkippedMunicipality {
                        municipality,
                        kind: e.kind(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            match parse_detail(&markup, self.sink.as_ref()) {
                Ok(page) => {
                    crate::metrics::municipality_parsed();
                    records.push(MunicipalityRecord::new(municipality, page));
                }
                Err(e) => {
                    self.sink.report(Diagnostic::MunicipalityDegraded {
                        id: municipality.id.clone(),
                        name: municipality.name.clone(),
                        error: e.to_string(),
                    });
                    crate::metrics::municipality_degraded();
                    degraded += 1;
                    records.push(MunicipalityRecord::degraded(municipality));
                }
            }
        }

        let parsed = records.len() - degraded;
        let table = reconcile(&records);
        if table.is_empty() {
            warn!("No municipality produced data; result table is empty");
        }
        info!(
            "Run finished: {} rows, {} columns ({} parsed, {} degraded, {} skipped)",
            table.row_count(),
            table.column_count(),
            parsed,
            degraded,
            skipped.len()
        );

        Ok(PipelineResult {
            table,
            discovered,
            parsed,
            degraded,
            skipped,
        })
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<String> {
        let mut attempt = 1;
        loop {
            match self.fetcher.fetch(url).await {
                Ok(markup) => return Ok(markup),
                Err(e @ ScraperError::Fetch { .. }) if attempt < self.retry.max_attempts => {
                    self.sink.report(Diagnostic::FetchRetry {
                        url: url.to_string(),
                        attempt,
                        error: e.to_string(),
                    });
                    crate::metrics::fetch_retried();
                    tokio::time::sleep(self.retry.delay_after(attempt)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::infra::memory_fetcher::InMemoryFetcher;

    const INDEX: &str = "https://www.volby.cz/pls/ps2017nss/ps32?xjazyk=CZ&xkraj=2&xnumnuts=2109";
    const DETAIL_A: &str = "https://www.volby.cz/pls/ps2017nss/ps311?xobec=1";

    fn index_page() -> String {
        r#"<table><tr>
            <td class="cislo" headers="t1sa1 t1sb1"><a href="ps311?xobec=1">1</a></td>
            <td class="overflow_name" headers="t1sa1 t1sb2">Alpha</td>
        </tr></table>"#
            .to_string()
    }

    fn detail_page() -> String {
        r#"<table><tr>
            <td headers="sa2">10</td><td headers="sa3">8</td><td headers="sa6">8</td>
        </tr></table>
        <table><tr>
            <td class="overflow_name" headers="t1sa1 t1sb2">P</td>
            <td class="cislo" headers="t1sa2 t1sb3">8</td>
        </tr></table>"#
            .to_string()
    }

    fn build(
        fetcher: InMemoryFetcher,
        retry: RetryPolicy,
    ) -> (Pipeline, Arc<InMemoryFetcher>, Arc<CollectingSink>) {
        let fetcher = Arc::new(fetcher);
        let sink = Arc::new(CollectingSink::new());
        (Pipeline::new(fetcher.clone(), sink.clone(), retry), fetcher, sink)
    }

    #[test]
    fn test_backoff_grows() {
        let policy = RetryPolicy {
            max_attempts: 4,
            delay: Duration::from_millis(100),
            backoff_factor: 2.0,
        };
        assert_eq!(policy.delay_after(1), Duration::from_millis(100));
        assert_eq!(policy.delay_after(2), Duration::from_millis(200));
        assert_eq!(policy.delay_after(3), Duration::from_millis(400));
    }

    #[test]
    fn test_invalid_backoff_factor_keeps_base_delay() {
        for backoff_factor in [f64::NAN, f64::INFINITY, -2.0, 0.5] {
            let policy = RetryPolicy {
                max_attempts: 3,
                delay: Duration::from_millis(100),
                backoff_factor,
            };
            assert_eq!(policy.delay_after(2), Duration::from_millis(100));
        }
    }

    #[test]
    fn test_huge_backoff_saturates() {
        let policy = RetryPolicy {
            max_attempts: u32::MAX,
            delay: Duration::from_secs(1),
            backoff_factor: 10.0,
        };
        assert_eq!(policy.delay_after(400), Duration::MAX);
    }

    #[tokio::test]
    async fn test_transient_index_failure_is_retried() {
        let fetcher = InMemoryFetcher::new()
            .with_page(INDEX, index_page())
            .with_page(DETAIL_A, detail_page())
            .fail_times(INDEX, 2);
        let retry = RetryPolicy {
            max_attempts: 3,
            delay: Duration::ZERO,
            backoff_factor: 1.0,
        };
        let (pipeline, fetcher, sink) = build(fetcher, retry);

        let result = pipeline.run(INDEX).await.unwrap();
        assert_eq!(result.table.row_count(), 1);
        assert_eq!(fetcher.request_count(INDEX), 3);
        assert_eq!(
            sink.count_where(|d| matches!(d, Diagnostic::FetchRetry { url, .. } if url == INDEX)),
            2
        );
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let fetcher = InMemoryFetcher::new()
            .with_page(INDEX, index_page())
            .with_page(DETAIL_A, detail_page())
            .fail_times(DETAIL_A, 2);
        let retry = RetryPolicy {
            max_attempts: 3,
            delay: Duration::ZERO,
            backoff_factor: 1.0,
        };
        let (pipeline, fetcher, sink) = build(fetcher, retry);

        let result = pipeline.run(INDEX).await.unwrap();
        assert_eq!(result.table.row_count(), 1);
        assert_eq!(fetcher.request_count(DETAIL_A), 3);
        assert_eq!(
            sink.count_where(|d| matches!(d, Diagnostic::FetchRetry { .. })),
            2
        );
    }

    #[tokio::test]
    async fn test_retries_exhausted_skips_municipality() {
        let fetcher = InMemoryFetcher::new()
            .with_page(INDEX, index_page())
            .with_page(DETAIL_A, detail_page())
            .fail_times(DETAIL_A, 5);
        let (pipeline, fetcher, _sink) = build(fetcher, RetryPolicy::none());

        let result = pipeline.run(INDEX).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].kind, ErrorKind::Fetch);
        assert_eq!(fetcher.request_count(DETAIL_A), 1);
    }

    #[tokio::test]
    async fn test_index_failure_aborts_run() {
        let (pipeline, _fetcher, _sink) = build(InMemoryFetcher::new(), RetryPolicy::none());
        let err = pipeline.run(INDEX).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fetch);
    }

    #[tokio::test]
    async fn test_unparsable_page_degrades_record() {
        let fetcher = InMemoryFetcher::new()
            .with_page(INDEX, index_page())
            .with_page(DETAIL_A, "<html><body>Chyba</body></html>");
        let (pipeline, _fetcher, sink) = build(fetcher, RetryPolicy::none());

        let result = pipeline.run(INDEX).await.unwrap();
        assert_eq!(result.degraded, 1);
        assert_eq!(result.parsed, 0);
        assert_eq!(result.table.rows[0].eligible_voters, None);
        assert!(result.table.party_columns.is_empty());
        assert_eq!(
            sink.count_where(|d| matches!(d, Diagnostic::MunicipalityDegraded { .. })),
            1
        );
    }
}
