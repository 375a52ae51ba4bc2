//! One-step-ahead linear forecast per date-ordered numeric column.

use chrono::{DateTime, Utc};

use tabula_core::config::PredictionConfig;
use tabula_core::{Dataset, Insight, InsightData, PredictionData, TimeSeriesPoint};

use super::{log_skip, time_series, AnalysisContext, Analyzer};
use crate::algorithms::regression::fit_indexed;
use crate::error::{AnalysisError, AnalysisResult};

/// Extends the trend fit to the index one past the last observation,
/// reporting only fits with R² above `min_r_squared`.
#[derive(Debug, Clone, Default)]
pub struct PredictionAnalyzer {
    config: PredictionConfig,
}

impl PredictionAnalyzer {
    pub fn new(config: PredictionConfig) -> Self {
        Self { config }
    }

    fn analyze_column(
        &self,
        dataset: &Dataset,
        date_column: &str,
        column: &str,
    ) -> AnalysisResult<Option<Insight>> {
        let series = time_series(dataset, date_column, column);
        if series.len() < self.config.min_points {
            return Err(AnalysisError::InsufficientData {
                required: self.config.min_points,
                actual: series.len(),
            });
        }

        let values: Vec<f64> = series.iter().map(|p| p.value).collect();
        let fit = fit_indexed(&values)?;
        if fit.r_squared <= self.config.min_r_squared {
            return Ok(None);
        }

        let predicted_index = series.len();
        let predicted_value = fit.predict(predicted_index as f64);
        if !predicted_value.is_finite() {
            return Err(AnalysisError::NonFinite("prediction"));
        }
        let confidence = (fit.r_squared * 100.0).min(self.config.confidence_cap).max(0.0);

        Ok(Some(Insight::new(
            format!("Forecast for {}", column),
            format!(
                "The next value of {} is projected at {:.2} based on {} observations (R² = {:.2})",
                column,
                predicted_value,
                series.len(),
                fit.r_squared,
            ),
            confidence,
            InsightData::Prediction(PredictionData {
                column: column.to_owned(),
                date_column: date_column.to_owned(),
                predicted_value,
                predicted_index,
                predicted_date: next_date(&series),
                r_squared: fit.r_squared,
                slope: fit.slope,
                historical: series,
            }),
        )))
    }
}

/// Last date plus the mean spacing between observations.
fn next_date(series: &[TimeSeriesPoint]) -> Option<DateTime<Utc>> {
    let (first, last) = (series.first()?, series.last()?);
    let gaps = i32::try_from(series.len().checked_sub(1)?).ok().filter(|&g| g > 0)?;
    let step = (last.date - first.date) / gaps;
    last.date.checked_add_signed(step)
}

impl Analyzer for PredictionAnalyzer {
    fn name(&self) -> &'static str {
        "prediction"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let Some(date_column) = ctx.schema.date.as_deref() else {
            return Vec::new();
        };

        let mut insights = Vec::new();
        for column in &ctx.schema.numeric {
            match self.analyze_column(ctx.dataset, date_column, column) {
                Ok(Some(insight)) => insights.push(insight),
                Ok(None) => {}
                Err(e) => log_skip(self.name(), column, &e),
            }
        }
        insights
    }
}
