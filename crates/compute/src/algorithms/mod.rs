pub mod correlation;
pub mod kmeans;
pub mod regression;
pub mod stats;
