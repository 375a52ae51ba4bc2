//! Population-level statistics over a single numeric sample.

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n). Returns 0.0 for fewer than 2 values.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// (min, max) of a non-empty slice.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Whether a centered sum of squares is rounding noise relative to the raw
/// sum of squares `Σv²` of the same values. Scale-free, so tiny but genuinely
/// varying data is not mistaken for a constant.
pub fn negligible_spread(centered_ss: f64, raw_ss: f64) -> bool {
    !(centered_ss > f64::EPSILON * raw_ss)
}
