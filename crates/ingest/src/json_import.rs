use std::path::Path;

use serde_json::Value;
use tabula_core::{Dataset, FieldValue, Record, Result, TabulaError};
use tracing::info;

pub fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)?;
    let dataset = read_json(&text)?;
    info!(rows = dataset.len(), path = %path.display(), "loaded json");
    Ok(dataset)
}

/// Parse a top-level array of objects. Object key order is preserved.
pub fn read_json(text: &str) -> Result<Dataset> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(TabulaError::InvalidDataset(
            "expected a top-level array of records".into(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map
                .into_iter()
                .map(|(k, v)| (k, field_value(v)))
                .collect::<Record>()),
            other => Err(TabulaError::InvalidDataset(format!(
                "record {i} is not an object: {other}"
            ))),
        })
        .collect::<Result<Vec<_>>>()
        .map(Dataset::new)
}

fn field_value(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Boolean(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => n.as_f64().map_or(FieldValue::Null, FieldValue::Float),
        },
        Value::String(s) => FieldValue::Text(s),
        nested @ (Value::Array(_) | Value::Object(_)) => FieldValue::Text(nested.to_string()),
    }
}
