//! The five analyzers. Each one reads the dataset through an
//! [`AnalysisContext`] and degrades to "no insight" per column or pair on
//! any [`AnalysisError`].

pub mod anomaly;
pub mod correlation;
pub mod prediction;
pub mod segment;
pub mod trend;

use tracing::{debug, warn};

use tabula_core::{Dataset, Insight, TimeSeriesPoint};

use crate::error::AnalysisError;
use crate::schema::Schema;

pub use anomaly::AnomalyAnalyzer;
pub use correlation::CorrelationAnalyzer;
pub use prediction::PredictionAnalyzer;
pub use segment::SegmentAnalyzer;
pub use trend::TrendAnalyzer;

/// Read-only inputs shared by every analyzer in one run.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    pub dataset: &'a Dataset,
    pub schema: &'a Schema,
}

/// A stateless producer of insights.
///
/// Implementations must not fail the run: column-level faults are logged and
/// skipped inside `analyze`.
pub trait Analyzer: Send + Sync {
    /// Human-readable name for logging and run reports.
    fn name(&self) -> &'static str;

    /// Produce this analyzer's insights, in column order.
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight>;
}

/// Pair `date_column` with `value_column`, dropping rows where either side
/// does not coerce, sorted ascending by date (stable for equal dates).
pub fn time_series(dataset: &Dataset, date_column: &str, value_column: &str) -> Vec<TimeSeriesPoint> {
    let mut points = Vec::with_capacity(dataset.len());
    let mut skipped = 0usize;
    for row in dataset.rows() {
        let date = row.get(date_column).map(|v| v.to_date());
        let value = row.get(value_column).map(|v| v.to_number());
        match (date, value) {
            (Some(Ok(date)), Some(Ok(value))) => points.push(TimeSeriesPoint { date, value }),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(date_column, value_column, skipped, "dropped rows from time series");
    }
    points.sort_by_key(|p| p.date);
    points
}

/// Log a column-level skip at a level matching its cause.
pub(crate) fn log_skip(analyzer: &str, subject: &str, err: &AnalysisError) {
    match err {
        AnalysisError::InsufficientData { .. }
        | AnalysisError::DegenerateVariance(_)
        | AnalysisError::LengthMismatch(..) => {
            debug!(analyzer, subject, reason = %err, "skipping");
        }
        AnalysisError::NonFinite(_) => {
            warn!(analyzer, subject, error = %err, "computation fault, skipping");
        }
    }
}
