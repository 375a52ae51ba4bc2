use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tabula_core::{Dataset, FieldValue, Record, Result, TabulaError};
use tracing::info;

pub fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).map_err(TabulaError::Io)?;
    let dataset = read_csv(file)?;
    info!(rows = dataset.len(), path = %path.display(), "loaded csv");
    Ok(dataset)
}

/// Read CSV with a header row. Every cell becomes text; blank cells become
/// null. Short rows simply lack the trailing columns.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| TabulaError::Csv(e.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| TabulaError::Csv(e.to_string()))?;
        let row: Record = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| {
                let value = if cell.trim().is_empty() {
                    FieldValue::Null
                } else {
                    FieldValue::Text(cell.to_string())
                };
                (name.to_string(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok(Dataset::new(rows))
}
