//! Column classification from a single sample row.
//!
//! Only the first record is inspected. Later rows are not re-validated here;
//! each analyzer filters them when it extracts values.

use serde::Serialize;
use tracing::debug;

use tabula_core::Dataset;

/// Inferred schema: numeric columns in schema order plus at most one date column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub numeric: Vec<String>,
    pub date: Option<String>,
}

impl Schema {
    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.iter().any(|c| c == column)
    }
}

/// Classify the dataset's columns by looking at the first record.
///
/// A column is numeric if its first value coerces to a finite number, and
/// date-like if it parses as a date. The first date-like column wins.
pub fn classify(dataset: &Dataset) -> Schema {
    let Some(first) = dataset.rows().first() else {
        return Schema::default();
    };

    let mut schema = Schema::default();
    for (column, value) in first {
        if value.to_number().is_ok() {
            schema.numeric.push(column.clone());
        }
        if schema.date.is_none() && value.to_date().is_ok() {
            schema.date = Some(column.clone());
        }
    }

    debug!(
        numeric = schema.numeric.len(),
        date = ?schema.date,
        "classified columns"
    );
    schema
}
