pub mod csv_writer;
pub mod summary;

pub use csv_writer::{write_csv, write_csv_file};
pub use summary::{render_grid, render_summary, write_summary};

use crate::error::{Result, ScraperError};
use crate::types::ResultTable;

/// Refuse to write a table that carries no rows or fewer than `min_columns` columns.
pub fn check_writable(table: &ResultTable, min_columns: usize) -> Result<()> {
    let columns = table.column_count();
    if table.is_empty() || columns < min_columns {
        return Err(ScraperError::Validation(format!(
            "extraction unsuccessful: {} rows, {} columns (need at least {})",
            table.row_count(),
            columns,
            min_columns
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MIN_OUTPUT_COLUMNS;
    use crate::error::ErrorKind;
    use crate::types::ResultRow;

    fn table_with_parties(parties: &[&str]) -> ResultTable {
        ResultTable {
            party_columns: parties.iter().map(|p| p.to_string()).collect(),
            rows: vec![ResultRow {
                id: "506761".to_string(),
                name: "Alojzov".to_string(),
                eligible_voters: Some(205),
                envelopes_issued: Some(145),
                valid_votes: Some(144),
                votes: vec![1; parties.len()],
            }],
        }
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let err = check_writable(&ResultTable::default(), MIN_OUTPUT_COLUMNS).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_six_columns_is_rejected() {
        let table = table_with_parties(&["ANO"]);
        assert_eq!(table.column_count(), 6);

        let err = check_writable(&table, MIN_OUTPUT_COLUMNS).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("6 columns"));
    }

    #[test]
    fn test_seven_columns_is_accepted() {
        let table = table_with_parties(&["ANO", "ODS"]);
        assert_eq!(table.column_count(), 7);
        assert!(check_writable(&table, MIN_OUTPUT_COLUMNS).is_ok());
    }

    #[test]
    fn test_threshold_is_configurable() {
        let table = table_with_parties(&["ANO"]);
        assert!(check_writable(&table, 6).is_ok());
        assert!(check_writable(&table, 8).is_err());
    }
}
