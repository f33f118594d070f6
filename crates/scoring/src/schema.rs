use std::collections::HashSet;

use crate::error::MissingColumns;
use crate::record::{Batch, RequiredColumns};

/// Check that every required column is present in the batch header.
///
/// Missing names are reported in the order they were declared.
/// An empty requirement set always passes.
pub fn validate(batch: &Batch, required: &RequiredColumns) -> Result<(), MissingColumns> {
    let present: HashSet<&str> = batch.columns().iter().map(String::as_str).collect();

    let missing: Vec<String> = required
        .iter()
        .filter(|column| !present.contains(column))
        .map(str::to_owned)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingColumns(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;

    fn batch(columns: &[&str]) -> Batch {
        let row: Vec<Value> = columns.iter().map(|_| Value::Number(1.0)).collect();
        Batch::new(columns.iter().map(|c| c.to_string()).collect(), vec![row])
            .expect("valid batch")
    }

    #[test]
    fn superset_of_required_passes() {
        let b = batch(&["customer_id", "tenure", "open_tickets", "plan"]);
        let required = RequiredColumns::new(["tenure", "open_tickets"]);
        assert!(validate(&b, &required).is_ok());
    }

    #[test]
    fn exact_match_passes() {
        let b = batch(&["tenure", "open_tickets"]);
        let required = RequiredColumns::new(["open_tickets", "tenure"]);
        assert!(validate(&b, &required).is_ok());
    }

    #[test]
    fn missing_names_follow_declared_order() {
        let b = batch(&["b", "customer_id"]);
        let required = RequiredColumns::new(["d", "b", "a", "c"]);
        let err = validate(&b, &required).expect_err("columns are missing");
        assert_eq!(err.0, vec!["d", "a", "c"]);
    }

    #[test]
    fn single_missing_column_is_reported() {
        let b = batch(&["tenure"]);
        let required = RequiredColumns::new(["tenure", "late_invoices"]);
        let err = validate(&b, &required).expect_err("late_invoices is missing");
        assert_eq!(err, MissingColumns(vec!["late_invoices".to_string()]));
    }

    #[test]
    fn empty_requirement_always_passes() {
        let required = RequiredColumns::default();
        assert!(validate(&batch(&[]), &required).is_ok());
        assert!(validate(&batch(&["anything"]), &required).is_ok());
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let b = batch(&["Tenure"]);
        let required = RequiredColumns::new(["tenure"]);
        assert!(validate(&b, &required).is_err());
    }
}
