//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the sample standard deviation (divides by N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars. A period below 2 has no sample deviation.

use crate::domain::indicator::stddev::{mean, sample_stddev};
use crate::domain::indicator::{Band, IndicatorPoint, IndicatorSeries, IndicatorType, Reading};
use crate::domain::price_series::PriceSeries;

pub fn calculate_bollinger(
    series: &PriceSeries,
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries<Band> {
    let closes = series.closes();
    let mult = stddev_mult_x100 as f64 / 100.0;

    let values = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let reading = if period < 2 {
                Reading::NotApplicable
            } else if i + 1 < period {
                Reading::Warmup
            } else {
                let window = &closes[i + 1 - period..=i];
                let middle = mean(window);
                match sample_stddev(window) {
                    Some(stddev) => Reading::Value(Band {
                        upper: middle + mult * stddev,
                        middle,
                        lower: middle - mult * stddev,
                    }),
                    None => Reading::NotApplicable,
                }
            };
            IndicatorPoint {
                date: point.date,
                reading,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_series(prices: &[f64]) -> PriceSeries {
        PriceSeries::from_closes("TEST", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), prices)
            .unwrap()
    }

    fn band(series: &IndicatorSeries<Band>, i: usize) -> Band {
        series.values[i].reading.value().expect("Expected Bollinger value")
    }

    #[test]
    fn bollinger_warmup() {
        let series = calculate_bollinger(&make_series(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3, 200);

        assert_eq!(series.values[0].reading, Reading::Warmup);
        assert_eq!(series.values[1].reading, Reading::Warmup);
        assert!(series.values[2].reading.is_value());
        assert!(series.values[3].reading.is_value());
        assert!(series.values[4].reading.is_value());
    }

    #[test]
    fn bollinger_constant_values() {
        let series = calculate_bollinger(&make_series(&[100.0; 5]), 3, 200);
        let b = band(&series, 2);
        assert!((b.middle - 100.0).abs() < f64::EPSILON);
        assert!((b.upper - 100.0).abs() < f64::EPSILON);
        assert!((b.lower - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bollinger_basic_calculation() {
        let series = calculate_bollinger(&make_series(&[10.0, 20.0, 30.0]), 3, 200);
        let b = band(&series, 2);

        // sample variance of 10,20,30 is 100
        assert!((b.middle - 20.0).abs() < 1e-10);
        assert!((b.upper - 40.0).abs() < 1e-10);
        assert!((b.lower - 0.0).abs() < 1e-10);
    }

    #[test]
    fn bollinger_multiplier_variations() {
        let series = calculate_bollinger(&make_series(&[10.0, 20.0, 30.0]), 3, 150);
        let b = band(&series, 2);
        assert!((b.upper - 35.0).abs() < 1e-10);
        assert!((b.lower - 5.0).abs() < 1e-10);
    }

    #[test]
    fn bollinger_symmetry_and_ordering() {
        let series = calculate_bollinger(&make_series(&[12.0, 9.5, 14.0, 11.0, 10.5]), 3, 200);
        for point in &series.values {
            if let Some(b) = point.reading.value() {
                assert!(b.lower <= b.middle && b.middle <= b.upper);
                assert!(((b.upper - b.middle) - (b.middle - b.lower)).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn bollinger_period_one_not_applicable() {
        let series = calculate_bollinger(&make_series(&[10.0, 20.0]), 1, 200);
        assert!(series.values.iter().all(|p| p.reading == Reading::NotApplicable));
    }

    #[test]
    fn bollinger_indicator_type() {
        let series = calculate_bollinger(&make_series(&[10.0, 20.0, 30.0]), 20, 200);
        assert_eq!(
            series.indicator_type,
            IndicatorType::Bollinger {
                period: 20,
                stddev_mult_x100: 200
            }
        );
        assert!(series.values.iter().all(|p| p.reading == Reading::Warmup));
    }
}
