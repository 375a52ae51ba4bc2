use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A record is an ordered column -> value map. Key order is the schema order.
pub type Record = IndexMap<String, FieldValue>;

/// Typed field values. CSV sources arrive as text, JSON sources keep their native types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Why a value was excluded from an analyzer's sample.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    #[error("column missing from record")]
    Missing,
    #[error("value is null")]
    Null,
    #[error("value is empty")]
    Empty,
    #[error("value is not numeric")]
    NotNumeric,
    #[error("value is not finite")]
    NonFinite,
    #[error("value is not a date")]
    NotDate,
}

/// Naive formats accepted besides RFC 3339, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

impl FieldValue {
    /// Extract as string, returning None for non-text values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Strict numeric coercion: the whole trimmed text must parse and be finite.
    pub fn to_number(&self) -> Result<f64, SkipReason> {
        let n = match self {
            FieldValue::Null => return Err(SkipReason::Null),
            FieldValue::Boolean(_) => return Err(SkipReason::NotNumeric),
            FieldValue::Integer(i) => *i as f64,
            FieldValue::Float(f) => *f,
            FieldValue::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return Err(SkipReason::Empty);
                }
                s.parse::<f64>().map_err(|_| SkipReason::NotNumeric)?
            }
        };
        if n.is_finite() {
            Ok(n)
        } else {
            Err(SkipReason::NonFinite)
        }
    }

    /// Lenient coercion used by segmentation: anything non-numeric becomes 0.
    pub fn to_number_or_zero(&self) -> f64 {
        self.to_number().unwrap_or(0.0)
    }

    /// Parse a date-like text value. Numbers and booleans are never dates.
    pub fn to_date(&self) -> Result<DateTime<Utc>, SkipReason> {
        let s = match self {
            FieldValue::Null => return Err(SkipReason::Null),
            FieldValue::Text(s) => s.trim(),
            _ => return Err(SkipReason::NotDate),
        };
        if s.is_empty() {
            return Err(SkipReason::Empty);
        }
        parse_date(s).ok_or(SkipReason::NotDate)
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Utc.from_utc_datetime(&naive));
        }
    }
    None
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

/// Values pulled out of one column, with the rows that were dropped and why.
#[derive(Debug, Clone)]
pub struct Extracted<T> {
    /// `(row index, value)` for every row that coerced cleanly.
    pub values: Vec<(usize, T)>,
    /// `(row index, reason)` for every row that was excluded.
    pub skipped: Vec<(usize, SkipReason)>,
}

impl<T> Extracted<T> {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T: Copy> Extracted<T> {
    /// The coerced values without their row indices.
    pub fn plain(&self) -> Vec<T> {
        self.values.iter().map(|(_, v)| *v).collect()
    }
}

/// An ordered, read-only sequence of homogeneous records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Record>,
}

impl Dataset {
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in schema order, taken from the first record.
    pub fn columns(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|r| r.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Value of `column` in the first record, if any.
    pub fn sample(&self, column: &str) -> Option<&FieldValue> {
        self.rows.first().and_then(|r| r.get(column))
    }

    /// Coerce every row of `column` to a number, recording skips.
    pub fn numbers(&self, column: &str) -> Extracted<f64> {
        self.extract(column, FieldValue::to_number)
    }

    /// Coerce every row of `column` to a date, recording skips.
    pub fn dates(&self, column: &str) -> Extracted<DateTime<Utc>> {
        self.extract(column, FieldValue::to_date)
    }

    fn extract<T>(
        &self,
        column: &str,
        coerce: impl Fn(&FieldValue) -> Result<T, SkipReason>,
    ) -> Extracted<T> {
        let mut out = Extracted {
            values: Vec::with_capacity(self.rows.len()),
            skipped: Vec::new(),
        };
        for (i, row) in self.rows.iter().enumerate() {
            match row.get(column).ok_or(SkipReason::Missing).and_then(&coerce) {
                Ok(v) => out.values.push((i, v)),
                Err(reason) => out.skipped.push((i, reason)),
            }
        }
        out
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[(&str, FieldValue)]) -> Record {
        fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(FieldValue::from("42").to_number(), Ok(42.0));
        assert_eq!(FieldValue::from(" 1.5e2 ").to_number(), Ok(150.0));
        assert_eq!(FieldValue::Integer(7).to_number(), Ok(7.0));
        assert_eq!(FieldValue::from("").to_number(), Err(SkipReason::Empty));
        assert_eq!(FieldValue::from("12abc").to_number(), Err(SkipReason::NotNumeric));
        assert_eq!(FieldValue::from("inf").to_number(), Err(SkipReason::NonFinite));
        assert_eq!(FieldValue::Float(f64::NAN).to_number(), Err(SkipReason::NonFinite));
        assert_eq!(FieldValue::Boolean(true).to_number(), Err(SkipReason::NotNumeric));
        assert_eq!(FieldValue::Null.to_number(), Err(SkipReason::Null));
        // Dates are not numbers even though they start with digits.
        assert_eq!(FieldValue::from("2024-01-01").to_number(), Err(SkipReason::NotNumeric));
    }

    #[test]
    fn zero_fallback() {
        assert_eq!(FieldValue::from("n/a").to_number_or_zero(), 0.0);
        assert_eq!(FieldValue::from("3").to_number_or_zero(), 3.0);
    }

    #[test]
    fn date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(FieldValue::from("2024-03-05").to_date(), Ok(expected));
        assert_eq!(FieldValue::from("2024/03/05").to_date(), Ok(expected));
        assert_eq!(FieldValue::from("03/05/2024").to_date(), Ok(expected));
        assert_eq!(FieldValue::from("2024-03-05T00:00:00Z").to_date(), Ok(expected));
        assert_eq!(FieldValue::from("2024-03-05 00:00:00").to_date(), Ok(expected));
        assert_eq!(FieldValue::from("hello").to_date(), Err(SkipReason::NotDate));
        assert_eq!(FieldValue::Integer(2024).to_date(), Err(SkipReason::NotDate));
    }

    #[test]
    fn columns_follow_first_record() {
        let ds = Dataset::new(vec![
            row(&[("b", "1".into()), ("a", "2".into())]),
            row(&[("a", "3".into()), ("c", "4".into())]),
        ]);
        assert_eq!(ds.columns(), vec!["b", "a"]);
        assert!(Dataset::default().columns().is_empty());
    }

    #[test]
    fn extraction_records_skips() {
        let ds = Dataset::new(vec![
            row(&[("x", "1".into())]),
            row(&[("x", "oops".into())]),
            row(&[("y", "2".into())]),
            row(&[("x", FieldValue::Null)]),
        ]);
        let ex = ds.numbers("x");
        assert_eq!(ex.plain(), vec![1.0]);
        assert_eq!(
            ex.skipped,
            vec![
                (1, SkipReason::NotNumeric),
                (2, SkipReason::Missing),
                (3, SkipReason::Null)
            ]
        );
    }

    #[test]
    fn untagged_json_shape() {
        let ds: Dataset = serde_json::from_str(r#"[{"a": 1, "b": "x", "c": null}]"#).unwrap();
        assert_eq!(ds.rows()[0]["a"], FieldValue::Integer(1));
        assert_eq!(ds.rows()[0]["b"], FieldValue::Text("x".into()));
        assert!(ds.rows()[0]["c"].is_null());
    }
}
