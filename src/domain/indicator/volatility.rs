//! Log returns and annualized historical volatility.
//!
//! r[i]  = ln(C[i] / C[i-1])                      (undefined at i = 0)
//! HV[i] = STDDEV(r[i-w+1..=i]) * sqrt(annualization)
//!
//! HV needs w returns, so the first w bars warm up.

use crate::domain::indicator::stddev::sample_stddev;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, Reading};
use crate::domain::price_series::PriceSeries;

pub fn calculate_log_returns(series: &PriceSeries) -> IndicatorSeries {
    let points = series.points();
    let values = points
        .iter()
        .enumerate()
        .map(|(i, point)| IndicatorPoint {
            date: point.date,
            reading: if i == 0 {
                Reading::Warmup
            } else {
                Reading::Value((point.close / points[i - 1].close).ln())
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::LogReturn,
        values,
    }
}

pub fn calculate_hist_volatility(
    series: &PriceSeries,
    window: usize,
    annualization: u32,
) -> IndicatorSeries {
    let returns: Vec<f64> = series
        .points()
        .windows(2)
        .map(|pair| (pair[1].close / pair[0].close).ln())
        .collect();
    let scale = (annualization as f64).sqrt();

    let values = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let reading = if window < 2 {
                Reading::NotApplicable
            } else if i < window {
                Reading::Warmup
            } else {
                // returns[k] is the return into bar k + 1
                match sample_stddev(&returns[i - window..i]) {
                    Some(sd) => Reading::Value(sd * scale),
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
        indicator_type: IndicatorType::HistVolatility {
            window,
            annualization,
        },
        values,
    }
}
