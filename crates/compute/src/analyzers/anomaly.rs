//! Mean/standard-deviation outlier detection per numeric column.

use tabula_core::config::AnomalyConfig;
use tabula_core::{AnomalyData, AnomalyPoint, Dataset, Insight, InsightData};

use super::{log_skip, AnalysisContext, Analyzer};
use crate::algorithms::stats::{mean, population_std_dev};
use crate::error::{AnalysisError, AnalysisResult};

/// Flags values further than `std_multiplier` population standard
/// deviations from the column mean.
#[derive(Debug, Clone, Default)]
pub struct AnomalyAnalyzer {
    config: AnomalyConfig,
}

impl AnomalyAnalyzer {
    pub fn new(config: AnomalyConfig) -> Self {
        Self { config }
    }

    fn analyze_column(&self, dataset: &Dataset, column: &str) -> AnalysisResult<Option<Insight>> {
        let extracted = dataset.numbers(column);
        let total = extracted.len();
        if total < self.config.min_values {
            return Err(AnalysisError::InsufficientData {
                required: self.config.min_values,
                actual: total,
            });
        }

        let values = extracted.plain();
        let mean = mean(&values);
        let std_dev = population_std_dev(&values);
        let threshold = self.config.std_multiplier * std_dev;
        if !threshold.is_finite() {
            return Err(AnalysisError::NonFinite("anomaly threshold"));
        }

        let anomalies: Vec<AnomalyPoint> = extracted
            .values
            .iter()
            .filter_map(|&(row, value)| {
                let deviation = (value - mean).abs();
                (deviation > threshold).then_some(AnomalyPoint {
                    row,
                    value,
                    deviation,
                })
            })
            .collect();
        if anomalies.is_empty() {
            return Ok(None);
        }

        let ratio = anomalies.len() as f64 / total as f64;
        let confidence = (ratio * self.config.confidence_scale).min(self.config.confidence_cap);

        Ok(Some(Insight::new(
            format!("{} anomalies detected in {}", anomalies.len(), column),
            format!(
                "{} of {} values in {} deviate from the mean ({:.2}) by more than {:.2}",
                anomalies.len(),
                total,
                column,
                mean,
                threshold,
            ),
            confidence,
            InsightData::Anomaly(AnomalyData {
                column: column.to_owned(),
                mean,
                std_dev,
                threshold,
                total_values: total,
                anomalies,
            }),
        )))
    }
}

impl Analyzer for AnomalyAnalyzer {
    fn name(&self) -> &'static str {
        "anomaly"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let mut insights = Vec::new();
        for column in &ctx.schema.numeric {
            match self.analyze_column(ctx.dataset, column) {
                Ok(Some(insight)) => insights.push(insight),
                Ok(None) => {}
                Err(e) => log_skip(self.name(), column, &e),
            }
        }
        insights
    }
}
