//! CSV ingest + validation.
//!
//! Reads a table previously written by [`crate::io::export`] back into memory so
//! a saved export can be filtered and aggregated again. Rows are rebuilt through
//! [`Transaction::new`], so the derived columns are recomputed; when the file
//! carries them too they must agree.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{Category, Product, Region, Table, Transaction};
use crate::error::PipelineError;
use crate::io::export::csv_error;

const REQUIRED_COLUMNS: [&str; 5] = ["Date", "Product", "Region", "Quantity", "Price"];

/// Load a CSV export from disk.
pub fn load_table_csv(path: &Path) -> Result<Table, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let table = read_table_csv(file)?;
    info!(path = %path.display(), rows = table.len(), "loaded CSV");
    Ok(table)
}

/// Parse CSV text (header row required) into a table.
pub fn read_table_csv<R: Read>(reader: R) -> Result<Table, PipelineError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(csv_error)?.clone();
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_string(), i))
        .collect();

    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !header_map.contains_key(**c)) {
        return Err(PipelineError::Csv {
            line: 1,
            message: format!("Missing required column: `{missing}`"),
        });
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row = parse_row(&record, &header_map).map_err(|message| PipelineError::Csv { line, message })?;
        rows.push(row);
    }

    Ok(Table::new(rows))
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Transaction, String> {
    let date = parse_date(get_required(record, header_map, "Date")?)?;
    let product = parse_dimension::<Product>(get_required(record, header_map, "Product")?)?;
    let region = parse_dimension::<Region>(get_required(record, header_map, "Region")?)?;
    let quantity = get_required(record, header_map, "Quantity")?
        .parse::<u32>()
        .map_err(|e| format!("Invalid `Quantity`: {e}"))?;
    let price = parse_money(get_required(record, header_map, "Price")?, "Price")?;

    let row = Transaction::new(date, product, region, quantity, price);

    // Derived columns are optional, but must be consistent when present.
    if let Some(s) = get_optional(record, header_map, "Category") {
        let category = parse_dimension::<Category>(s)?;
        if category != row.category {
            return Err(format!("`Category` {category} does not match product {product}"));
        }
    }
    if let Some(s) = get_optional(record, header_map, "Revenue") {
        let revenue = parse_money(s, "Revenue")?;
        if revenue != row.revenue {
            return Err(format!("`Revenue` {revenue} != Price x Quantity ({})", row.revenue));
        }
    }
    if let Some(s) = get_optional(record, header_map, "Month") {
        if s != row.month {
            return Err(format!("`Month` {s} does not match date {date}"));
        }
    }
    if let Some(s) = get_optional(record, header_map, "Year") {
        if s.parse::<i32>().ok() != Some(row.year) {
            return Err(format!("`Year` {s} does not match date {date}"));
        }
    }

    Ok(row)
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    get_optional(record, header_map, name).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("Invalid date '{s}'. Expected YYYY-MM-DD."))
}

fn parse_money(s: &str, column: &str) -> Result<Decimal, String> {
    let v = Decimal::from_str(s).map_err(|e| format!("Invalid `{column}` '{s}': {e}"))?;
    if v.is_sign_negative() {
        return Err(format!("Invalid `{column}` '{s}': must not be negative"));
    }
    Ok(v)
}

fn parse_dimension<T>(s: &str) -> Result<T, String>
where
    T: FromStr<Err = PipelineError>,
{
    s.parse::<T>().map_err(|e| e.to_string())
}
