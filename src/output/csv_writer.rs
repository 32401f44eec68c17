use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::constants::{CSV_DELIMITER, UTF8_BOM};
use crate::error::Result;
use crate::types::{Cell, ResultTable};

/// Write the table as `;`-separated UTF-8 with a byte-order mark.
///
/// Every null counter is written as `0`, so the file cannot distinguish an
/// unknown summary value from a real zero. Returns the number of data rows.
pub fn write_csv<W: Write>(table: &ResultTable, mut out: W) -> Result<usize> {
    out.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_writer(out);
    writer.write_record(table.columns())?;
    for row in &table.rows {
        writer.write_record(row.cells().iter().map(Cell::render))?;
    }
    writer.flush()?;

    crate::metrics::rows_written(table.row_count());
    Ok(table.row_count())
}

pub fn write_csv_file(table: &ResultTable, path: &Path) -> Result<usize> {
    let file = File::create(path)?;
    write_csv(table, BufWriter::new(file))
}
