//! Pearson product-moment correlation.

use super::stats::negligible_spread;
use crate::error::{AnalysisError, AnalysisResult};

/// Pearson's r for two equal-length samples, clamped to `[-1, 1]`.
pub fn pearson(xs: &[f64], ys: &[f64]) -> AnalysisResult<f64> {
    if xs.len() != ys.len() {
        return Err(AnalysisError::LengthMismatch(xs.len(), ys.len()));
    }
    let n = xs.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData { required: 2, actual: n });
    }

    let nf = n as f64;
    let mx = xs.iter().sum::<f64>() / nf;
    let my = ys.iter().sum::<f64>() / nf;
    let (mut sxy, mut sxx, mut syy, mut raw_x, mut raw_y) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mx, y - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
        raw_x += x * x;
        raw_y += y * y;
    }

    if negligible_spread(sxx, raw_x) || negligible_spread(syy, raw_y) {
        return Err(AnalysisError::DegenerateVariance("pearson"));
    }

    let r = sxy / (sxx.sqrt() * syy.sqrt());
    if !r.is_finite() {
        return Err(AnalysisError::NonFinite("pearson"));
    }
    Ok(r.clamp(-1.0, 1.0))
}
