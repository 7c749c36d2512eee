//! Date-aligned table of every indicator the analysis uses.

use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::volatility::{calculate_hist_volatility, calculate_log_returns};
use crate::domain::indicator::{Band, IndicatorType, Reading};
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub ma_short_window: usize,
    pub ma_long_window: usize,
    pub rsi_window: usize,
    pub bollinger_window: usize,
    pub bollinger_multiplier: f64,
    pub volatility_window: usize,
    pub annualization: u32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ma_short_window: 20,
            ma_long_window: 200,
            rsi_window: 14,
            bollinger_window: 20,
            bollinger_multiplier: 2.0,
            volatility_window: 21,
            annualization: 252,
        }
    }
}

impl IndicatorConfig {
    pub fn bollinger_mult_x100(&self) -> u32 {
        (self.bollinger_multiplier * 100.0).round() as u32
    }

    /// Indicators a frame built from this config carries, in column order.
    pub fn indicator_types(&self) -> Vec<IndicatorType> {
        vec![
            IndicatorType::Sma(self.ma_short_window),
            IndicatorType::Sma(self.ma_long_window),
            IndicatorType::Rsi(self.rsi_window),
            IndicatorType::Bollinger {
                period: self.bollinger_window,
                stddev_mult_x100: self.bollinger_mult_x100(),
            },
            IndicatorType::LogReturn,
            IndicatorType::HistVolatility {
                window: self.volatility_window,
                annualization: self.annualization,
            },
        ]
    }

    pub fn largest_window(&self) -> usize {
        [
            self.ma_short_window,
            self.ma_long_window,
            self.rsi_window + 1,
            self.bollinger_window,
            self.volatility_window + 1,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub ma_short: Reading,
    pub ma_long: Reading,
    pub rsi: Reading,
    pub bollinger: Reading<Band>,
    pub log_return: Reading,
    pub hist_volatility: Reading,
}

impl IndicatorRow {
    pub fn bollinger_mean(&self) -> Reading {
        self.bollinger.map(|b| b.middle)
    }

    pub fn bollinger_upper(&self) -> Reading {
        self.bollinger.map(|b| b.upper)
    }

    pub fn bollinger_lower(&self) -> Reading {
        self.bollinger.map(|b| b.lower)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    config: IndicatorConfig,
    rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&IndicatorRow> {
        self.rows
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.rows[i])
    }

    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// Rows dated within `[start, end]`. Readings keep the history they were
    /// computed with, so warm-up before `start` is not lost.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> IndicatorFrame {
        IndicatorFrame {
            config: self.config.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| r.date >= start && r.date <= end)
                .cloned()
                .collect(),
        }
    }
}

pub fn compute_frame(series: &PriceSeries, config: &IndicatorConfig) -> IndicatorFrame {
    let mult_x100 = config.bollinger_mult_x100();

    let ma_short = calculate_sma(series, config.ma_short_window);
    let ma_long = calculate_sma(series, config.ma_long_window);
    let rsi = calculate_rsi(series, config.rsi_window);
    let bollinger = calculate_bollinger(series, config.bollinger_window, mult_x100);
    let log_returns = calculate_log_returns(series);
    let hist_vol = calculate_hist_volatility(series, config.volatility_window, config.annualization);

    let rows = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| IndicatorRow {
            date: point.date,
            close: point.close,
            ma_short: ma_short.reading_at(i),
            ma_long: ma_long.reading_at(i),
            rsi: rsi.reading_at(i),
            bollinger: bollinger.reading_at(i),
            log_return: log_returns.reading_at(i),
            hist_volatility: hist_vol.reading_at(i),
        })
        .collect();

    IndicatorFrame {
        config: config.clone(),
        rows,
    }
}
