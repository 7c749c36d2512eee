//! Core domain types and logic.

pub mod price_series;
pub mod indicator;
pub mod extrema;
pub mod trendline;
pub mod recommendation;
pub mod backtest;
pub mod analysis;
pub mod snapshot;
pub mod trade_log;
pub mod config_validation;
pub mod error;
