use std::fmt::Display;

use churn_common::error::{ChurnError, ChurnResult};
use churn_scoring::{Batch, Value};

/// Parse an uploaded CSV file (header row first) into a batch.
pub fn parse_csv(bytes: &[u8]) -> ChurnResult<Batch> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(read_error)?
        .iter()
        .map(str::to_owned)
        .collect();

    if columns.is_empty() {
        return Err(read_error("the file has no header row"));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_error)?;
        rows.push(record.iter().map(Value::from_cell).collect());
    }

    Batch::new(columns, rows).map_err(|e| match e {
        ChurnError::Validation(msg) => read_error(msg),
        other => other,
    })
}

fn read_error(e: impl Display) -> ChurnError {
    ChurnError::Parse(format!("error reading CSV: {e}"))
}
