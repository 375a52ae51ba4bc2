pub mod config;
pub mod dataset;
pub mod error;
pub mod insight;

pub use config::AnalysisConfig;
pub use dataset::*;
pub use error::*;
pub use insight::*;
