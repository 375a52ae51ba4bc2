//! Threshold alert rules written in YAML.
//!
//! This crate provides:
//! - The `ThresholdAlert` document schema with serde deserialization
//! - A filesystem loader that scans a directory tree for rule files
//! - An evaluator that checks a rule against a loaded dataset

pub mod evaluator;
pub mod loader;
pub mod schema;

pub use evaluator::{evaluate, evaluate_all, Alert};
pub use loader::{LoadResult, LoadStatus, RuleError, RuleLoader};
pub use schema::{Aggregate, AlertRule, CommonMetadata, RuleKind, ThresholdOperator, ThresholdSpec};
