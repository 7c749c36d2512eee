//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `Reading`: tri-state value (value / warming up / not applicable)
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorType`: Enum for indicator identity + parameters
//! - `IndicatorSeries`: A time series of indicator readings
//!
//! Every calculator is causal: the reading at index `i` only looks at
//! closes `0..=i`.

pub mod bollinger;
pub mod frame;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod volatility;

use chrono::NaiveDate;
use std::fmt;

/// An indicator value that may not exist.
///
/// `Warmup` means more history is needed; `NotApplicable` means the value is
/// mathematically undefined at this point no matter how much history exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading<T = f64> {
    Value(T),
    Warmup,
    NotApplicable,
}

impl<T: Copy> Reading<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Reading::Value(v) => Some(*v),
            Reading::Warmup | Reading::NotApplicable => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Reading::Value(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reading<U> {
        match self {
            Reading::Value(v) => Reading::Value(f(v)),
            Reading::Warmup => Reading::Warmup,
            Reading::NotApplicable => Reading::NotApplicable,
        }
    }
}

/// Upper/middle/lower band triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint<T = f64> {
    pub date: NaiveDate,
    pub reading: Reading<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    LogReturn,
    HistVolatility {
        window: usize,
        annualization: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries<T = f64> {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint<T>>,
}

impl<T: Copy> IndicatorSeries<T> {
    pub fn reading_at(&self, index: usize) -> Reading<T> {
        self.values
            .get(index)
            .map(|p| p.reading)
            .unwrap_or(Reading::NotApplicable)
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::LogReturn => write!(f, "LOGRET"),
            IndicatorType::HistVolatility {
                window,
                annualization,
            } => write!(f, "HV({},{})", window, annualization),
        }
    }
}
