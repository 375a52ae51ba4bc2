//! Statistical analysis engine: turns a row/column dataset into ranked insights.
//!
//! - [`schema`]: column classification shared by all analyzers
//! - [`analyzers`]: trend, correlation, anomaly, segment, prediction
//! - [`engine`]: runs the analyzers and ranks their output
//! - [`summary`]: per-column dataset overview

pub mod algorithms;
pub mod analyzers;
pub mod engine;
pub mod error;
pub mod schema;
pub mod summary;

pub use analyzers::{AnalysisContext, Analyzer};
pub use engine::{analyze, rank, AnalysisReport, AnalyzerRun, InsightEngine};
pub use error::{AnalysisError, AnalysisResult};
pub use schema::{classify, Schema};
pub use summary::{describe, DatasetSummary};
