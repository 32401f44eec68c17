//! Page markers for the volby.cz two-level report layout.
//! Index page: table rows link each municipality id to its detail page.
//! Detail page: summary counters keyed by `headers`, plus up to three party tables.

/// Substring identifying a municipality detail link on the index page
pub const DETAIL_LINK_MARKER: &str = "xobec";

/// Class carried by name cells on both page levels
pub const NAME_CELL_CLASS: &str = "overflow_name";

/// Class carried by numeric result cells
pub const NUMBER_CELL_CLASS: &str = "cislo";

/// `headers` values of the municipality name column, one per index table
pub const INDEX_NAME_HEADERS: [&str; 3] = ["t1sa1 t1sb2", "t2sa1 t2sb2", "t3sa1 t3sb2"];

/// `headers` values of the party name and vote count columns across the three party tables
pub const PARTY_HEADERS_PATTERN: &str = r"t[1-3]sa[1-2] t[1-3]sb[2-3]";

pub const ELIGIBLE_VOTERS_HEADER: &str = "sa2";
pub const ENVELOPES_ISSUED_HEADER: &str = "sa3";
pub const VALID_VOTES_HEADER: &str = "sa6";

// Output column names for the fixed part of every row
pub const COLUMN_ID: &str = "id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_ELIGIBLE_VOTERS: &str = "eligible_voters";
pub const COLUMN_ENVELOPES_ISSUED: &str = "envelopes_issued";
pub const COLUMN_VALID_VOTES: &str = "valid_votes";

pub const SUMMARY_COLUMNS: [&str; 5] = [
    COLUMN_ID,
    COLUMN_NAME,
    COLUMN_ELIGIBLE_VOTERS,
    COLUMN_ENVELOPES_ISSUED,
    COLUMN_VALID_VOTES,
];

pub const CSV_DELIMITER: u8 = b';';
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
pub const OUTPUT_EXTENSION: &str = ".csv";

/// Preview size embedded in the summary document
pub const PREVIEW_ROWS: usize = 5;
pub const PREVIEW_COLUMNS: usize = 7;

/// Tables narrower than this are treated as a failed extraction and not written
pub const MIN_OUTPUT_COLUMNS: usize = 7;
