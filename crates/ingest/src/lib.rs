//! Loading local tabular files into a [`Dataset`].
//!
//! CSV cells arrive as text and are coerced lazily by the analyzers; JSON
//! keeps its scalar types.

mod csv_import;
mod json_import;

use std::path::Path;

use tabula_core::{Dataset, Result, TabulaError};

pub use csv_import::{load_csv, read_csv};
pub use json_import::{load_json, read_json};

/// Load a dataset, picking the reader from the file extension.
pub fn load_path(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => load_csv(path),
        Some("json") => load_json(path),
        _ => Err(TabulaError::UnsupportedFormat(path.display().to_string())),
    }
}
