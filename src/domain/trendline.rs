//! Ordinary least squares trendline of close against bar index.
//!
//! x = 0..n-1, y = close
//! slope = sum((x - x̄)(y - ȳ)) / sum((x - x̄)^2), intercept = ȳ - slope * x̄

use crate::domain::error::PutscoutError;
use crate::domain::price_series::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct Trendline {
    pub fitted_values: Vec<f64>,
    pub slope: f64,
    pub intercept: f64,
}

pub fn fit_trendline(series: &PriceSeries) -> Result<Trendline, PutscoutError> {
    fit_closes(&series.closes())
}

pub fn fit_closes(closes: &[f64]) -> Result<Trendline, PutscoutError> {
    let n = closes.len();
    if n < 2 {
        return Err(PutscoutError::InsufficientData {
            what: "trendline".into(),
            have: n,
            need: 2,
        });
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = closes.iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, &y) in closes.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    let fitted_values = (0..n).map(|i| intercept + slope * i as f64).collect();

    Ok(Trendline {
        fitted_values,
        slope,
        intercept,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line_is_recovered() {
        let closes: Vec<f64> = (0..10).map(|i| 3.0 + 2.0 * i as f64).collect();
        let line = fit_closes(&closes).unwrap();
        assert!((line.slope - 2.0).abs() < 1e-10);
        assert!((line.intercept - 3.0).abs() < 1e-10);
        for (fitted, actual) in line.fitted_values.iter().zip(&closes) {
            assert!((fitted - actual).abs() < 1e-10);
        }
    }

    #[test]
    fn constant_series_has_zero_slope() {
        let line = fit_closes(&[7.5; 20]).unwrap();
        assert_eq!(line.slope, 0.0);
        assert!(line.fitted_values.iter().all(|v| (v - 7.5).abs() < 1e-12));
    }

    #[test]
    fn noisy_fit() {
        // y = 1, 3, 2, 4 -> slope 0.8, intercept 1.3
        let line = fit_closes(&[1.0, 3.0, 2.0, 4.0]).unwrap();
        assert!((line.slope - 0.8).abs() < 1e-10);
        assert!((line.intercept - 1.3).abs() < 1e-10);
        assert_eq!(line.fitted_values.len(), 4);
    }

    #[test]
    fn fewer_than_two_points_is_insufficient() {
        let err = fit_closes(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            PutscoutError::InsufficientData { have: 1, need: 2, .. }
        ));
        assert!(fit_closes(&[]).is_err());
    }
}
