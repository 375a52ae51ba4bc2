//! Closed-form simple linear regression over sequence indices.

use super::stats::negligible_spread;
use crate::error::{AnalysisError, AnalysisResult};

/// Least-squares fit `y = slope * x + intercept` with its coefficient of determination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Number of observations the fit was computed from.
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit `values[i]` against `i = 0, 1, 2, ...`.
///
/// Requires at least two points and a non-constant series (otherwise R² is undefined).
pub fn fit_indexed(values: &[f64]) -> AnalysisResult<LinearFit> {
    let n = values.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData { required: 2, actual: n });
    }

    let nf = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denom = nf * sum_xx - sum_x * sum_x;
    if denom <= 0.0 {
        return Err(AnalysisError::DegenerateVariance("regression x"));
    }
    let slope = (nf * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / nf;

    let mean_y = sum_y / nf;
    let mut ss_tot = 0.0;
    let mut ss_res = 0.0;
    let mut ss_raw = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let predicted = slope * i as f64 + intercept;
        ss_tot += (y - mean_y).powi(2);
        ss_res += (y - predicted).powi(2);
        ss_raw += y * y;
    }
    if negligible_spread(ss_tot, ss_raw) {
        return Err(AnalysisError::DegenerateVariance("regression y"));
    }
    let r_squared = 1.0 - ss_res / ss_tot;

    if !(slope.is_finite() && intercept.is_finite() && r_squared.is_finite()) {
        return Err(AnalysisError::NonFinite("regression"));
    }

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
        n,
    })
}
