use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of an insight. Also the generation order used when merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Trend,
    Correlation,
    Anomaly,
    Segment,
    Prediction,
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightType::Trend => write!(f, "trend"),
            InsightType::Correlation => write!(f, "correlation"),
            InsightType::Anomaly => write!(f, "anomaly"),
            InsightType::Segment => write!(f, "segment"),
            InsightType::Prediction => write!(f, "prediction"),
        }
    }
}

/// Direction of a fitted slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Upward,
    Downward,
}

impl Direction {
    /// `Upward` for strictly positive values, `Downward` otherwise.
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Direction::Upward
        } else {
            Direction::Downward
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Upward => write!(f, "Upward"),
            Direction::Downward => write!(f, "Downward"),
        }
    }
}

/// Sign of a correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// `Positive` for strictly positive values, `Negative` otherwise.
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Sign::Positive
        } else {
            Sign::Negative
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Positive => write!(f, "positive"),
            Sign::Negative => write!(f, "negative"),
        }
    }
}

/// Correlation strength bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Moderate,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strength::Strong => write!(f, "strong"),
            Strength::Moderate => write!(f, "moderate"),
        }
    }
}

/// One observation of a numeric column paired with the dataset's date column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendData {
    pub column: String,
    pub date_column: String,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub direction: Direction,
    pub time_series_data: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationData {
    pub column1: String,
    pub column2: String,
    pub correlation: f64,
    pub strength: Strength,
    pub direction: Sign,
    pub values1: Vec<f64>,
    pub values2: Vec<f64>,
}

/// A single flagged row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPoint {
    /// Index of the row in the dataset.
    pub row: usize,
    pub value: f64,
    /// Absolute distance from the column mean.
    pub deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyData {
    pub column: String,
    pub mean: f64,
    pub std_dev: f64,
    pub threshold: f64,
    pub total_values: usize,
    pub anomalies: Vec<AnomalyPoint>,
}

/// One k-means cluster over the two segmentation features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: usize,
    pub size: usize,
    pub centroid: [f64; 2],
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentData {
    pub columns: [String; 2],
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionData {
    pub column: String,
    pub date_column: String,
    pub predicted_value: f64,
    /// Sequence index the prediction applies to (one past the last observation).
    pub predicted_index: usize,
    /// Last date plus the mean spacing of the observed dates.
    pub predicted_date: Option<DateTime<Utc>>,
    pub r_squared: f64,
    pub slope: f64,
    pub historical: Vec<TimeSeriesPoint>,
}

/// Type-specific payload carried for downstream visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InsightData {
    Trend(TrendData),
    Correlation(CorrelationData),
    Anomaly(AnomalyData),
    Segment(SegmentData),
    Prediction(PredictionData),
}

impl InsightData {
    pub fn insight_type(&self) -> InsightType {
        match self {
            InsightData::Trend(_) => InsightType::Trend,
            InsightData::Correlation(_) => InsightType::Correlation,
            InsightData::Anomaly(_) => InsightType::Anomaly,
            InsightData::Segment(_) => InsightType::Segment,
            InsightData::Prediction(_) => InsightType::Prediction,
        }
    }
}

/// A ranked finding produced by one analyzer.
///
/// `confidence` lies in `[0, 100]` and is only meaningful for ranking; the
/// scale differs per analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub confidence: f64,
    pub data: InsightData,
}

impl Insight {
    /// Build an insight whose `insight_type` is derived from its payload.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        confidence: f64,
        data: InsightData,
    ) -> Self {
        Self {
            insight_type: data.insight_type(),
            title: title.into(),
            description: description.into(),
            confidence,
            data,
        }
    }
}
