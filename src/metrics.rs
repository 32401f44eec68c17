//! Run counters recorded through the `metrics` facade.
//!
//! No recorder is installed by this crate; an embedding application that
//! installs one gets these series, otherwise every call is a no-op.

pub fn page_fetched(bytes: usize, duration_secs: f64) {
    ::metrics::counter!("election_scraper_pages_fetched_total").increment(1);
    ::metrics::counter!("election_scraper_page_bytes_total").increment(bytes as u64);
    ::metrics::histogram!("election_scraper_fetch_duration_seconds").record(duration_secs);
}

pub fn fetch_failed() {
    ::metrics::counter!("election_scraper_fetch_errors_total").increment(1);
}

pub fn fetch_retried() {
    ::metrics::counter!("election_scraper_fetch_retries_total").increment(1);
}

pub fn municipalities_discovered(count: usize) {
    ::metrics::histogram!("election_scraper_municipalities_per_run").record(count as f64);
}

pub fn municipality_parsed() {
    ::metrics::counter!("election_scraper_municipalities_parsed_total").increment(1);
}

pub fn municipality_degraded() {
    ::metrics::counter!("election_scraper_municipalities_degraded_total").increment(1);
}

pub fn municipality_skipped() {
    ::metrics::counter!("election_scraper_municipalities_skipped_total").increment(1);
}

pub fn rows_written(rows: usize) {
    ::metrics::counter!("election_scraper_rows_written_total").increment(rows as u64);
}
