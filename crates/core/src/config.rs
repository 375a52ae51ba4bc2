use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabulaError};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str) -> Option<T> {
    profiled_env_opt(profile, key).and_then(|v| v.parse().ok())
}

// ── Top-level config ──────────────────────────────────────────

/// Thresholds and engine settings for one analysis run.
///
/// Every field has a default, so a TOML file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Active profile name (empty = default).
    pub profile: String,
    pub engine: EngineConfig,
    pub trend: TrendConfig,
    pub correlation: CorrelationConfig,
    pub anomaly: AnomalyConfig,
    pub segment: SegmentConfig,
    pub prediction: PredictionConfig,
}

impl AnalysisConfig {
    /// Defaults overlaid with environment variables (call `load_dotenv()` first).
    /// Profile is read from `TABULA_PROFILE`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| TabulaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Confidences must be percentages and thresholds finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let percentages = [
            ("trend.confidence_cap", self.trend.confidence_cap),
            ("anomaly.confidence_cap", self.anomaly.confidence_cap),
            ("segment.confidence", self.segment.confidence),
            ("prediction.confidence_cap", self.prediction.confidence_cap),
        ];
        for (key, value) in percentages {
            if !(0.0..=100.0).contains(&value) {
                return Err(TabulaError::Config(format!(
                    "{key} must be between 0 and 100, got {value}"
                )));
            }
        }

        let thresholds = [
            ("trend.min_abs_slope", self.trend.min_abs_slope),
            ("correlation.min_abs_r", self.correlation.min_abs_r),
            ("correlation.strong_abs_r", self.correlation.strong_abs_r),
            ("anomaly.std_multiplier", self.anomaly.std_multiplier),
            ("anomaly.confidence_scale", self.anomaly.confidence_scale),
            ("prediction.min_r_squared", self.prediction.min_r_squared),
        ];
        for (key, value) in thresholds {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TabulaError::Config(format!(
                    "{key} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Load a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Overlay `TABULA_SEED` / `TABULA_PARALLEL`, honouring `TABULA_PROFILE`.
    pub fn apply_env(&mut self) {
        let profile = env_or("TABULA_PROFILE", "").to_uppercase();
        if let Some(seed) = profiled_env_parse::<u64>(&profile, "TABULA_SEED") {
            self.engine.seed = Some(seed);
        }
        if let Some(parallel) = profiled_env_parse::<bool>(&profile, "TABULA_PARALLEL") {
            self.engine.parallel = parallel;
        }
        self.profile = profile;
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  engine:      parallel={}, seed={}",
            self.engine.parallel,
            self.engine.seed.map(|s| s.to_string()).as_deref().unwrap_or("(random)")
        );
        tracing::info!(
            "  trend:       min_points={}, min_abs_slope={}",
            self.trend.min_points,
            self.trend.min_abs_slope
        );
        tracing::info!(
            "  anomaly:     min_values={}, std_multiplier={}",
            self.anomaly.min_values,
            self.anomaly.std_multiplier
        );
        tracing::info!(
            "  segment:     max_k={}, max_iterations={}",
            self.segment.max_k,
            self.segment.max_iterations
        );
    }
}

// ── Engine ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Run analyzers on the rayon pool. Output order is unaffected.
    pub parallel: bool,
    /// Seed for k-means initialization; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

// ── Trend ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub min_points: usize,
    /// Slopes with magnitude at or below this are not reported.
    pub min_abs_slope: f64,
    pub confidence_cap: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            min_points: 3,
            min_abs_slope: 0.01,
            confidence_cap: 95.0,
        }
    }
}

// ── Correlation ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    pub min_points: usize,
    /// |r| must exceed this to be reported.
    pub min_abs_r: f64,
    /// |r| above this is labelled strong.
    pub strong_abs_r: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            min_points: 3,
            min_abs_r: 0.5,
            strong_abs_r: 0.8,
        }
    }
}

// ── Anomaly ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    pub min_values: usize,
    /// Deviation threshold as a multiple of the standard deviation.
    pub std_multiplier: f64,
    /// confidence = min(anomaly_ratio * scale, cap)
    pub confidence_scale: f64,
    pub confidence_cap: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            min_values: 10,
            std_multiplier: 2.0,
            confidence_scale: 500.0,
            confidence_cap: 90.0,
        }
    }
}

// ── Segmentation ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    pub min_records: usize,
    pub min_points: usize,
    pub max_k: usize,
    pub max_iterations: usize,
    /// Fixed confidence attached to every segmentation insight.
    pub confidence: f64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            min_records: 10,
            min_points: 6,
            max_k: 3,
            max_iterations: 100,
            confidence: 75.0,
        }
    }
}

// ── Prediction ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub min_points: usize,
    /// R² must exceed this for a prediction to be reported.
    pub min_r_squared: f64,
    pub confidence_cap: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            min_points: 5,
            min_r_squared: 0.3,
            confidence_cap: 85.0,
        }
    }
}
