use churn_common::error::{ChurnError, ChurnResult};
use churn_scoring::EnrichedBatch;

pub fn format_enriched_csv(batch: &EnrichedBatch) -> ChurnResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(batch.columns()).map_err(write_error)?;
    for record in batch.records() {
        writer
            .write_record(record.to_row().iter().map(ToString::to_string))
            .map_err(write_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ChurnError::Internal(format!("cannot flush CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| ChurnError::Internal(format!("CSV is not UTF-8: {e}")))
}

fn write_error(e: csv::Error) -> ChurnError {
    ChurnError::Internal(format!("cannot write CSV: {e}"))
}
