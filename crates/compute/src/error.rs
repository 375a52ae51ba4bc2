use thiserror::Error;

/// Per-column faults inside an analyzer. Never escapes the engine: each one
/// is logged and turned into "no insight" for that column or pair.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("insufficient data: need {required}, have {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("degenerate variance in {0}")]
    DegenerateVariance(&'static str),

    #[error("non-finite result in {0}")]
    NonFinite(&'static str),

    #[error("samples differ in length: {0} vs {1}")]
    LengthMismatch(usize, usize),
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
