use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

use crate::constants::{PREVIEW_COLUMNS, PREVIEW_ROWS};
use crate::error::Result;
use crate::types::{Cell, ResultTable};

/// Grid-text rendering of the top-left corner of the table.
///
/// ```text
/// +--------+---------+
/// | id     | name    |
/// +========+=========+
/// | 506761 | Alojzov |
/// +--------+---------+
/// ```
pub fn render_grid(table: &ResultTable, max_rows: usize, max_cols: usize) -> String {
    let headers: Vec<&str> = table.columns().into_iter().take(max_cols).collect();
    let body: Vec<Vec<Cell<'_>>> = table
        .rows
        .iter()
        .take(max_rows)
        .map(|row| row.cells().into_iter().take(max_cols).collect())
        .collect();

    // A column is right-aligned when it holds counts; text and empty columns go left.
    let numeric: Vec<bool> = (0..headers.len())
        .map(|c| body.first().is_some_and(|row| row[c].is_numeric()))
        .collect();
    let rendered: Vec<Vec<String>> = body
        .iter()
        .map(|row| row.iter().map(Cell::render).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(c, header)| {
            rendered
                .iter()
                .map(|row| row[c].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = |fill: char| {
        let mut line = String::from("+");
        for width in &widths {
            line.extend(std::iter::repeat(fill).take(width + 2));
            line.push('+');
        }
        line
    };
    let line = |cells: &[&str]| {
        let mut out = String::from("|");
        for (c, text) in cells.iter().enumerate() {
            let pad = widths[c] - text.chars().count();
            if numeric[c] {
                out.push_str(&format!(" {}{} |", " ".repeat(pad), text));
            } else {
                out.push_str(&format!(" {}{} |", text, " ".repeat(pad)));
            }
        }
        out
    };

    let mut lines = vec![border('-'), line(&headers), border('=')];
    for row in &rendered {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(line(&cells));
        lines.push(border('-'));
    }
    lines.join("\n")
}

/// Markdown summary of a finished run with a small preview of the data
pub fn render_summary(table: &ResultTable, source_url: &str, generated_at: DateTime<Local>) -> String {
    let mut doc = String::new();
    doc.push_str("# Election results\n\n");
    doc.push_str(&format!("Source page: <{}>\n\n", source_url));
    doc.push_str(&format!(
        "Generated: {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    doc.push_str(&format!(
        "The table holds {} municipalities and {} columns: the fixed columns `{}` followed by {} party columns in alphabetical order. \
         Missing values, including parties absent from a municipality's page, are written as `0`.\n\n",
        table.row_count(),
        table.column_count(),
        table.columns().iter().take(5).copied().collect::<Vec<_>>().join("`, `"),
        table.party_columns.len()
    ));

    doc.push_str("## Preview\n\n");
    if table.is_empty() {
        doc.push_str("No data is available for this run.\n");
    } else {
        doc.push_str(&format!(
            "First {} rows and {} columns of the output:\n\n```text\n{}\n```\n",
            PREVIEW_ROWS.min(table.row_count()),
            PREVIEW_COLUMNS.min(table.column_count()),
            render_grid(table, PREVIEW_ROWS, PREVIEW_COLUMNS)
        ));
    }
    doc
}

pub fn write_summary(table: &ResultTable, source_url: &str, path: &Path) -> Result<()> {
    fs::write(path, render_summary(table, source_url, Local::now()))?;
    Ok(())
}
