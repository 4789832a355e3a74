//! Export a table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! original column names, ISO dates, money with exactly two decimals.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{SortColumn, Table};
use crate::error::PipelineError;

/// Default download name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("sales_data_{}.csv", date.format("%Y%m%d"))
}

/// Write `table` as CSV (header row first) to any writer.
pub fn write_table_csv<W: Write>(writer: W, table: &Table) -> Result<(), PipelineError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(SortColumn::ALL.iter().map(|c| c.name()))
        .map_err(csv_error)?;

    for r in table {
        wtr.write_record([
            r.date.format("%Y-%m-%d").to_string(),
            r.product.to_string(),
            r.category.to_string(),
            r.region.to_string(),
            r.quantity.to_string(),
            format!("{:.2}", r.price),
            format!("{:.2}", r.revenue),
            r.month.clone(),
            r.year.to_string(),
        ])
        .map_err(csv_error)?;
    }

    wtr.flush().map_err(|e| PipelineError::Io {
        path: "<csv writer>".to_string(),
        source: e,
    })?;
    Ok(())
}

/// Render `table` as a UTF-8 CSV string.
pub fn table_to_csv_string(table: &Table) -> Result<String, PipelineError> {
    let mut buf = Vec::new();
    write_table_csv(&mut buf, table)?;
    String::from_utf8(buf).map_err(|e| PipelineError::Csv {
        line: 0,
        message: format!("export is not valid UTF-8: {e}"),
    })
}

/// Write `table` to a CSV file at `path`.
pub fn export_table_csv(path: &Path, table: &Table) -> Result<(), PipelineError> {
    let file = File::create(path).map_err(|e| PipelineError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    write_table_csv(file, table)?;
    info!(path = %path.display(), rows = table.len(), "exported CSV");
    Ok(())
}

pub(crate) fn csv_error(e: csv::Error) -> PipelineError {
    PipelineError::Csv {
        line: e.position().map(|p| p.line()).unwrap_or(0),
        message: e.to_string(),
    }
}
