//! Pairwise Pearson correlation across numeric columns.

use tabula_core::config::CorrelationConfig;
use tabula_core::{CorrelationData, Dataset, Insight, InsightData, Sign, Strength};

use super::{log_skip, AnalysisContext, Analyzer};
use crate::algorithms::correlation::pearson;
use crate::error::{AnalysisError, AnalysisResult};

/// Reports column pairs whose |r| exceeds `min_abs_r`.
///
/// Each column is filtered independently before pairing. Pairs whose
/// filtered samples differ in length are skipped rather than realigned.
#[derive(Debug, Clone, Default)]
pub struct CorrelationAnalyzer {
    config: CorrelationConfig,
}

impl CorrelationAnalyzer {
    pub fn new(config: CorrelationConfig) -> Self {
        Self { config }
    }

    fn analyze_pair(
        &self,
        dataset: &Dataset,
        col1: &str,
        col2: &str,
    ) -> AnalysisResult<Option<Insight>> {
        let values1 = dataset.numbers(col1).plain();
        let values2 = dataset.numbers(col2).plain();
        if values1.len() != values2.len() {
            return Err(AnalysisError::LengthMismatch(values1.len(), values2.len()));
        }
        if values1.len() < self.config.min_points {
            return Err(AnalysisError::InsufficientData {
                required: self.config.min_points,
                actual: values1.len(),
            });
        }

        let r = pearson(&values1, &values2)?;
        let abs_r = r.abs();
        if abs_r <= self.config.min_abs_r {
            return Ok(None);
        }

        let strength = if abs_r > self.config.strong_abs_r {
            Strength::Strong
        } else {
            Strength::Moderate
        };
        let direction = Sign::of(r);

        Ok(Some(Insight::new(
            format!(
                "{} {} correlation between {} and {}",
                capitalize(&strength.to_string()),
                direction,
                col1,
                col2
            ),
            format!(
                "{} and {} move {} (r = {:.2}) across {} rows",
                col1,
                col2,
                if r > 0.0 { "together" } else { "in opposite directions" },
                r,
                values1.len(),
            ),
            abs_r * 100.0,
            InsightData::Correlation(CorrelationData {
                column1: col1.to_owned(),
                column2: col2.to_owned(),
                correlation: r,
                strength,
                direction,
                values1,
                values2,
            }),
        )))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Analyzer for CorrelationAnalyzer {
    fn name(&self) -> &'static str {
        "correlation"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Vec<Insight> {
        let columns = &ctx.schema.numeric;
        let mut insights = Vec::new();
        for (i, col1) in columns.iter().enumerate() {
            for col2 in &columns[i + 1..] {
                match self.analyze_pair(ctx.dataset, col1, col2) {
                    Ok(Some(insight)) => insights.push(insight),
                    Ok(None) => {}
                    Err(e) => log_skip(self.name(), &format!("{col1}/{col2}"), &e),
                }
            }
        }
        insights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::dataset;
    use crate::schema::classify;

    fn run(ds: &Dataset) -> Vec<Insight> {
        let schema = classify(ds);
        CorrelationAnalyzer::default().analyze(&AnalysisContext {
            dataset: ds,
            schema: &schema,
        })
    }

    #[test]
    fn identical_columns_are_strong() {
        let ds = dataset(
            &["a", "b"],
            &[vec!["1", "1"], vec!["4", "4"], vec!["2", "2"], vec!["9", "9"]],
        );
        let insights = run(&ds);
        assert_eq!(insights.len(), 1);
        let InsightData::Correlation(data) = &insights[0].data else {
            panic!("expected correlation payload");
        };
        assert!((data.correlation - 1.0).abs() < 1e-12);
        assert_eq!(data.strength, Strength::Strong);
        assert!((insights[0].confidence - 100.0).abs() < 1e-9);
        assert!(insights[0].confidence <= 100.0);
        assert_eq!(insights[0].title, "Strong positive correlation between a and b");
    }

    #[test]
    fn negative_moderate() {
        // r ≈ -0.73
        let ds = dataset(
            &["x", "y"],
            &[
                vec!["1", "5"],
                vec!["2", "4"],
                vec!["3", "4"],
                vec!["4", "1"],
                vec!["5", "3"],
            ],
        );
        let insights = run(&ds);
        assert_eq!(insights.len(), 1);
        let InsightData::Correlation(data) = &insights[0].data else {
            panic!("expected correlation payload");
        };
        assert!(data.correlation < -0.5 && data.correlation > -0.8);
        assert_eq!(data.strength, Strength::Moderate);
        assert_eq!(data.direction, Sign::Negative);
    }

    #[test]
    fn weak_correlation_is_dropped() {
        let ds = dataset(
            &["x", "y"],
            &[
                vec!["1", "2"],
                vec!["2", "1"],
                vec!["3", "3"],
                vec!["4", "1"],
                vec!["5", "2"],
            ],
        );
        assert!(run(&ds).is_empty());
    }

    #[test]
    fn mismatched_missing_values_skip_pair() {
        let ds = dataset(
            &["x", "y"],
            &[vec!["1", "1"], vec!["2", ""], vec!["3", "3"], vec!["4", "4"]],
        );
        assert!(run(&ds).is_empty());
    }

    #[test]
    fn two_rows_are_not_enough() {
        let ds = dataset(&["x", "y"], &[vec!["1", "1"], vec!["2", "2"]]);
        assert!(run(&ds).is_empty());
    }
}
