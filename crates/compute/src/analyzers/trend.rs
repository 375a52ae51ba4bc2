//! Linear trend over a date-ordered numeric column.

use tabula_core::config::TrendConfig;
use tabula_core::{Dataset, Direction, Insight, InsightData, TrendData};

use super::{log_skip, time_series, AnalysisContext, Analyzer};
use crate::algorithms::regression::fit_indexed;
use crate::error::{AnalysisError, AnalysisResult};

/// Fits each numeric column against its chronological sequence index and
/// reports slopes steeper than `min_abs_slope`.
#[derive(Debug, Clone, Default)]
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    pub fn new(config: TrendConfig) -> Self {
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
        if fit.slope.abs() <= self.config.min_abs_slope {
            return Ok(None);
        }

        let direction = Direction::of(fit.slope);
        let confidence = (fit.r_squared * 100.0).min(self.config.confidence_cap).max(0.0);
        let description = format!(
            "{} shows a {} trend over {} periods, changing by {:.2} per period (R² = {:.2})",
            column,
            direction.to_string().to_lowercase(),
            fit.n,
            fit.slope,
            fit.r_squared,
        );

        Ok(Some(Insight::new(
            format!("{} trend in {}", direction, column),
            description,
            confidence,
            InsightData::Trend(TrendData {
                column: column.to_owned(),
                date_column: date_column.to_owned(),
                slope: fit.slope,
                intercept: fit.intercept,
                r_squared: fit.r_squared,
                direction,
                time_series_data: series,
            }),
        )))
    }
}

impl Analyzer for TrendAnalyzer {
    fn name(&self) -> &'static str {
        "trend"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::{dataset, dated};
    use crate::schema::classify;

    fn run(ds: &Dataset) -> Vec<Insight> {
        let schema = classify(ds);
        TrendAnalyzer::default().analyze(&AnalysisContext {
            dataset: ds,
            schema: &schema,
        })
    }

    #[test]
    fn steady_growth_is_upward_and_capped() {
        let revenue: Vec<f64> = (0..10).map(|i| 100.0 + 10.0 * i as f64).collect();
        let insights = run(&dated(&[("Revenue", revenue)]));

        assert_eq!(insights.len(), 1);
        let InsightData::Trend(data) = &insights[0].data else {
            panic!("expected trend payload");
        };
        assert!((data.slope - 10.0).abs() < 1e-9);
        assert!((data.r_squared - 1.0).abs() < 1e-9);
        assert_eq!(data.direction, Direction::Upward);
        assert_eq!(insights[0].confidence, 95.0);
        assert_eq!(insights[0].title, "Upward trend in Revenue");
        assert_eq!(data.time_series_data.len(), 10);
    }

    #[test]
    fn unvalidated_negative_cap_does_not_panic() {
        let ds = dated(&[("Revenue", vec![1.0, 2.0, 3.0, 4.0])]);
        let schema = classify(&ds);
        let config = TrendConfig {
            confidence_cap: -1.0,
            ..TrendConfig::default()
        };
        let insights = TrendAnalyzer::new(config).analyze(&AnalysisContext {
            dataset: &ds,
            schema: &schema,
        });
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].confidence, 0.0);
    }

    #[test]
    fn decline_is_downward() {
        let insights = run(&dated(&[("Stock", vec![50.0, 40.0, 35.0, 20.0])]));
        assert_eq!(insights.len(), 1);
        let InsightData::Trend(data) = &insights[0].data else {
            panic!("expected trend payload");
        };
        assert_eq!(data.direction, Direction::Downward);
        assert!(insights[0].confidence <= 95.0);
    }

    #[test]
    fn flat_slope_is_not_reported() {
        let values = vec![1.000, 1.005, 1.010, 1.015, 1.020, 1.025];
        assert!(run(&dated(&[("Flat", values)])).is_empty());
    }

    #[test]
    fn two_points_are_not_enough() {
        assert!(run(&dated(&[("Revenue", vec![1.0, 100.0])])).is_empty());
    }

    #[test]
    fn no_date_column_means_no_trend() {
        let ds = dataset(&["a"], &[vec!["1"], vec!["2"], vec!["3"], vec!["4"]]);
        assert!(run(&ds).is_empty());
    }

    #[test]
    fn orders_by_date_not_row() {
        let ds = dataset(
            &["Date", "Revenue"],
            &[
                vec!["2024-01-03", "30"],
                vec!["2024-01-01", "10"],
                vec!["2024-01-02", "20"],
            ],
        );
        let insights = run(&ds);
        let InsightData::Trend(data) = &insights[0].data else {
            panic!("expected trend payload");
        };
        assert!((data.slope - 10.0).abs() < 1e-9);
    }
}
