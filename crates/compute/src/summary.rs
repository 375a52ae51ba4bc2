//! Per-column overview of a dataset, shown before running analyses.

use serde::Serialize;

use tabula_core::Dataset;

use crate::algorithms::stats::{mean, min_max, population_std_dev};
use crate::schema::classify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Date,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    /// Rows that coerce to the column's kind (all rows for text columns
    /// that are present and non-null).
    pub valid: usize,
    pub skipped: usize,
    pub stats: Option<NumericStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
}

/// Summarize every column using the same classification the analyzers use.
pub fn describe(dataset: &Dataset) -> DatasetSummary {
    let schema = classify(dataset);
    let columns = dataset
        .columns()
        .into_iter()
        .map(|name| {
            if schema.is_numeric(name) {
                let extracted = dataset.numbers(name);
                let values = extracted.plain();
                let stats = min_max(&values).map(|(min, max)| NumericStats {
                    min,
                    max,
                    mean: mean(&values),
                    std_dev: population_std_dev(&values),
                });
                ColumnSummary {
                    name: name.to_owned(),
                    kind: ColumnKind::Numeric,
                    valid: extracted.len(),
                    skipped: extracted.skipped.len(),
                    stats,
                }
            } else if schema.date.as_deref() == Some(name) {
                let extracted = dataset.dates(name);
                ColumnSummary {
                    name: name.to_owned(),
                    kind: ColumnKind::Date,
                    valid: extracted.len(),
                    skipped: extracted.skipped.len(),
                    stats: None,
                }
            } else {
                let valid = dataset
                    .rows()
                    .iter()
                    .filter(|r| r.get(name).is_some_and(|v| !v.is_null()))
                    .count();
                ColumnSummary {
                    name: name.to_owned(),
                    kind: ColumnKind::Text,
                    valid,
                    skipped: dataset.len() - valid,
                    stats: None,
                }
            }
        })
        .collect();

    DatasetSummary {
        rows: dataset.len(),
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::dataset;

    #[test]
    fn summarizes_each_kind() {
        let ds = dataset(
            &["Date", "Region", "Sales"],
            &[
                vec!["2024-01-01", "North", "10"],
                vec!["2024-01-02", "South", "30"],
                vec!["bad", "East", "n/a"],
            ],
        );
        let summary = describe(&ds);
        assert_eq!(summary.rows, 3);

        let date = &summary.columns[0];
        assert_eq!(date.kind, ColumnKind::Date);
        assert_eq!((date.valid, date.skipped), (2, 1));

        assert_eq!(summary.columns[1].kind, ColumnKind::Text);
        assert_eq!(summary.columns[1].valid, 3);

        let sales = &summary.columns[2];
        assert_eq!(sales.kind, ColumnKind::Numeric);
        assert_eq!((sales.valid, sales.skipped), (2, 1));
        let stats = sales.stats.as_ref().unwrap();
        assert_eq!((stats.min, stats.max, stats.mean, stats.std_dev), (10.0, 30.0, 20.0, 10.0));
    }

    #[test]
    fn empty_dataset() {
        let summary = describe(&Dataset::default());
        assert_eq!(summary.rows, 0);
        assert!(summary.columns.is_empty());
    }
}
