//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses a trailing simple mean for average gain/loss:
//! - change[i] = C[i] - C[i-1]
//! - avg_gain/avg_loss = mean of gains/losses over the last n changes
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100
//! If both are zero (flat window): not applicable
//!
//! Warmup: first n bars (need n price changes).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, Reading};
use crate::domain::price_series::PriceSeries;

pub fn calculate_rsi(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let points = series.points();

    let mut gains: Vec<f64> = Vec::with_capacity(points.len());
    let mut losses: Vec<f64> = Vec::with_capacity(points.len());
    for pair in points.windows(2) {
        let change = pair[1].close - pair[0].close;
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let values = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let reading = if period == 0 {
                Reading::NotApplicable
            } else if i < period {
                Reading::Warmup
            } else {
                // changes ending at bar i are gains[i - period..i]
                let avg_gain = gains[i - period..i].iter().sum::<f64>() / period as f64;
                let avg_loss = losses[i - period..i].iter().sum::<f64>() / period as f64;
                rsi_from_averages(avg_gain, avg_loss)
            };
            IndicatorPoint {
                date: point.date,
                reading,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Reading {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 {
            Reading::Value(100.0)
        } else {
            Reading::NotApplicable
        }
    } else {
        Reading::Value(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
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

    fn value(series: &IndicatorSeries, i: usize) -> f64 {
        series.values[i].reading.value().expect("expected a value")
    }

    #[test]
    fn rsi_single_bar() {
        let series = calculate_rsi(&make_series(&[100.0]), 14);
        assert_eq!(series.values.len(), 1);
        assert_eq!(series.values[0].reading, Reading::Warmup);
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let series = calculate_rsi(&make_series(&prices), 14);

        assert_eq!(series.values.len(), 15);
        for i in 0..14 {
            assert_eq!(series.values[i].reading, Reading::Warmup, "Bar {} should warm up", i);
        }
        assert!(series.values[14].reading.is_value(), "Bar 14 should be valid");
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_series(&prices), 14);

        for i in 14..30 {
            assert!((value(&series, i) - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_series(&prices), 14);
        assert!((value(&series, 14) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_flat_window_not_applicable() {
        let series = calculate_rsi(&make_series(&[50.0; 20]), 14);
        assert_eq!(series.values[14].reading, Reading::NotApplicable);
        assert_eq!(series.values[19].reading, Reading::NotApplicable);
    }

    #[test]
    fn rsi_known_calculation() {
        // changes: +2, -1, +3, -2 ; period 4
        let series = calculate_rsi(&make_series(&[10.0, 12.0, 11.0, 14.0, 12.0]), 4);
        // avg_gain = 5/4, avg_loss = 3/4, RS = 5/3, RSI = 100 - 100/(8/3) = 62.5
        assert!((value(&series, 4) - 62.5).abs() < 1e-10);
    }

    #[test]
    fn rsi_uses_trailing_window_only() {
        // After the window rolls past the early loss, RSI returns to 100.
        let series = calculate_rsi(&make_series(&[10.0, 9.0, 10.0, 11.0, 12.0]), 3);
        assert!(value(&series, 3) < 100.0);
        assert!((value(&series, 4) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let series = calculate_rsi(&make_series(&prices), 14);

        for point in &series.values {
            if let Some(rsi) = point.reading.value() {
                assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
            }
        }
    }

    #[test]
    fn rsi_zero_period() {
        let series = calculate_rsi(&make_series(&[100.0, 101.0]), 0);
        assert!(series.values.iter().all(|p| p.reading == Reading::NotApplicable));
        assert_eq!(series.indicator_type, IndicatorType::Rsi(0));
    }
}
