use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabulaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, TabulaError>;
