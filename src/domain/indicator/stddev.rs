//! Sample standard deviation helpers.
//!
//! STDDEV(window) = sqrt(sum((x - mean)^2) / (n - 1))
//!
//! The sample convention (n - 1) is used throughout, for Bollinger Bands and
//! for historical volatility alike.

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// `None` when fewer than two values are supplied.
pub fn sample_stddev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let variance = values
        .iter()
        .map(|v| {
            let diff = v - m;
            diff * diff
        })
        .sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}
