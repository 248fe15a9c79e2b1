//! Input scaling and standardization helpers.
//!
//! These are the numeric halves of the data scaler: logarithmic and min-max
//! scaling (with their inverses) used by the forward pass's `scale_inputs`
//! option, and the mean/standard-deviation/z-score statistics used by the
//! dataset service. None of them are invoked by the core on its own.

/// Logarithmic scaling: `x' = 1 / ln(x)`.
pub fn scale_log(x: f64) -> f64 {
    1.0 / x.ln()
}

/// Inverse of [`scale_log`]: `x = e^(1/x')`.
pub fn descale_log(x: f64) -> f64 {
    (1.0 / x).exp()
}

/// Min-max normalization: `x' = (x - min) / (max - min)`.
///
/// Returns 0 when `min == max` (a constant column carries no information).
pub fn scale_min_max(x: f64, min: f64, max: f64) -> f64 {
    if min == max {
        return 0.0;
    }
    (x - min) / (max - min)
}

/// Inverse of [`scale_min_max`]: `x = x' * (max - min) + min`.
pub fn descale_min_max(x: f64, min: f64, max: f64) -> f64 {
    if min == max {
        return 0.0;
    }
    x * (max - min) + min
}

/// Arithmetic mean of a slice; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation: `√(Σ (x - µ)² / n)`.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let sum: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum / values.len() as f64).sqrt()
}

/// Z-score standardization: `x' = (x - µ) / σ` per element.
///
/// A constant vector (σ = 0) standardizes to all zeros.
pub fn zscore(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let sd = std_dev(values);
    values
        .iter()
        .map(|&v| if sd == 0.0 { 0.0 } else { (v - m) / sd })
        .collect()
}
