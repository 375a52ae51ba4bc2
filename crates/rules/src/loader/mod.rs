//! Filesystem rule loader.
//!
//! Scans a directory tree for YAML rule files and keeps the parsed rules in
//! memory keyed by `metadata.id`.

mod core;
mod error;


pub use self::core::RuleLoader;
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
