use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error, info};

use tabula_core::{AnalysisConfig, Dataset, Insight};

use crate::analyzers::{
    AnalysisContext, Analyzer, AnomalyAnalyzer, CorrelationAnalyzer, PredictionAnalyzer,
    SegmentAnalyzer, TrendAnalyzer,
};
use crate::schema::{classify, Schema};

/// Timing and output count of one analyzer within a run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzerRun {
    pub analyzer: &'static str,
    pub insights: usize,
    pub elapsed_ms: f64,
}

/// Everything one engine run produced.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub schema: Schema,
    /// Ranked insights, highest confidence first.
    pub insights: Vec<Insight>,
    /// One entry per analyzer, in merge order.
    pub runs: Vec<AnalyzerRun>,
}

/// Runs every analyzer over a dataset and ranks the combined output.
///
/// Stateless between calls; the same engine can analyze many datasets,
/// concurrently if desired.
pub struct InsightEngine {
    config: AnalysisConfig,
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl InsightEngine {
    /// Build the standard analyzer set in merge order:
    /// trend, correlation, anomaly, segment, prediction.
    pub fn new(config: AnalysisConfig) -> Self {
        let analyzers: Vec<Box<dyn Analyzer>> = vec![
            Box::new(TrendAnalyzer::new(config.trend.clone())),
            Box::new(CorrelationAnalyzer::new(config.correlation.clone())),
            Box::new(AnomalyAnalyzer::new(config.anomaly.clone())),
            Box::new(SegmentAnalyzer::new(config.segment.clone(), config.engine.seed)),
            Box::new(PredictionAnalyzer::new(config.prediction.clone())),
        ];
        Self { config, analyzers }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Classify, run all analyzers, and rank.
    pub fn run(&self, dataset: &Dataset) -> AnalysisReport {
        let start = Instant::now();
        let schema = classify(dataset);
        let ctx = AnalysisContext {
            dataset,
            schema: &schema,
        };

        let outputs: Vec<(Vec<Insight>, AnalyzerRun)> = if self.config.engine.parallel {
            self.analyzers
                .par_iter()
                .map(|a| run_isolated(a.as_ref(), &ctx))
                .collect()
        } else {
            self.analyzers
                .iter()
                .map(|a| run_isolated(a.as_ref(), &ctx))
                .collect()
        };

        let (groups, runs): (Vec<_>, Vec<_>) = outputs.into_iter().unzip();
        let insights = rank(groups);

        info!(
            rows = dataset.len(),
            numeric_columns = schema.numeric.len(),
            date_column = ?schema.date,
            insights = insights.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "analysis complete"
        );

        AnalysisReport {
            schema,
            insights,
            runs,
        }
    }
}

/// Run one analyzer, containing any panic so the others still report.
fn run_isolated(
    analyzer: &dyn Analyzer,
    ctx: &AnalysisContext<'_>,
) -> (Vec<Insight>, AnalyzerRun) {
    let start = Instant::now();
    let insights = match panic::catch_unwind(AssertUnwindSafe(|| analyzer.analyze(ctx))) {
        Ok(insights) => insights,
        Err(_) => {
            error!(analyzer = analyzer.name(), "analyzer panicked, discarding its output");
            Vec::new()
        }
    };
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    debug!(
        analyzer = analyzer.name(),
        insights = insights.len(),
        elapsed_ms,
        "analyzer finished"
    );
    let run = AnalyzerRun {
        analyzer: analyzer.name(),
        insights: insights.len(),
        elapsed_ms,
    };
    (insights, run)
}

/// Concatenate analyzer outputs in the given order, then stable-sort by
/// descending confidence. Equal confidences keep generation order.
pub fn rank(groups: Vec<Vec<Insight>>) -> Vec<Insight> {
    let mut all: Vec<Insight> = groups.into_iter().flatten().collect();
    all.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    all
}

/// Analyze a dataset with default thresholds.
pub fn analyze(dataset: &Dataset) -> Vec<Insight> {
    InsightEngine::default().run(dataset).insights
}
