//! Simple moving average.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i])
//! Warmup: first (n-1) bars have no value.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, Reading};
use crate::domain::indicator::stddev::mean;
use crate::domain::price_series::PriceSeries;

pub fn calculate_sma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let closes = series.closes();
    let values = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let reading = if period == 0 {
                Reading::NotApplicable
            } else if i + 1 < period {
                Reading::Warmup
            } else {
                Reading::Value(mean(&closes[i + 1 - period..=i]))
            };
            IndicatorPoint {
                date: point.date,
                reading,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
