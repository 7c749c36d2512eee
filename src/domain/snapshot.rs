//! Per-symbol market snapshots for the observer table.
//!
//! [`MarketCache`] is owned by the caller. Refreshing never mutates an
//! existing cache; it loads everything again and hands back a new one.

use crate::domain::error::PutscoutError;
use crate::domain::indicator::Reading;
use crate::domain::indicator::frame::{IndicatorConfig, compute_frame};
use crate::domain::price_series::PriceSeries;
use crate::domain::recommendation::ImpliedVolatility;
use crate::ports::data_port::DataPort;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

pub const OVERSOLD_BELOW: f64 = 30.0;
pub const OVERBOUGHT_ABOVE: f64 = 70.0;
pub const SNAPSHOT_LOOKBACK_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiSignal {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiSignal {
    pub fn from_reading(rsi: Reading) -> Self {
        match rsi.value() {
            Some(v) if v < OVERSOLD_BELOW => RsiSignal::Oversold,
            Some(v) if v > OVERBOUGHT_ABOVE => RsiSignal::Overbought,
            _ => RsiSignal::Neutral,
        }
    }
}

impl fmt::Display for RsiSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RsiSignal::Oversold => "Oversold",
            RsiSignal::Neutral => "Neutral",
            RsiSignal::Overbought => "Overbought",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSnapshot {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: f64,
    /// Close minus previous close; absent with a single bar.
    pub change: Option<f64>,
    pub ma_long: Reading,
    pub rsi: Reading,
    pub signal: RsiSignal,
    pub implied_volatility: ImpliedVolatility,
    pub hist_volatility: Reading,
}

pub fn snapshot_from_series(
    series: &PriceSeries,
    implied_volatility: ImpliedVolatility,
    config: &IndicatorConfig,
) -> SymbolSnapshot {
    let frame = compute_frame(series, config);
    let rows = frame.rows();
    let today = &rows[rows.len() - 1];
    let change = rows
        .len()
        .checked_sub(2)
        .map(|i| today.close - rows[i].close);

    SymbolSnapshot {
        symbol: series.symbol().to_string(),
        date: today.date,
        close: today.close,
        change,
        ma_long: today.ma_long,
        rsi: today.rsi,
        signal: RsiSignal::from_reading(today.rsi),
        implied_volatility,
        hist_volatility: today.hist_volatility,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarketCache {
    symbols: Vec<String>,
    snapshots: BTreeMap<String, SymbolSnapshot>,
}

impl MarketCache {
    /// Load snapshots for `symbols`. Symbols whose data cannot be loaded
    /// are logged and left out.
    pub fn load(data_port: &dyn DataPort, symbols: &[String], config: &IndicatorConfig) -> Self {
        let mut snapshots = BTreeMap::new();
        for symbol in symbols {
            match load_snapshot(data_port, symbol, config) {
                Ok(snapshot) => {
                    snapshots.insert(symbol.clone(), snapshot);
                }
                Err(e) => warn!(symbol = %symbol, "skipping snapshot: {e}"),
            }
        }
        debug!(loaded = snapshots.len(), requested = symbols.len(), "market cache loaded");
        Self {
            symbols: symbols.to_vec(),
            snapshots,
        }
    }

    /// A fresh cache for the same symbols; `self` is left untouched.
    pub fn refresh(&self, data_port: &dyn DataPort, config: &IndicatorConfig) -> Self {
        Self::load(data_port, &self.symbols, config)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolSnapshot> {
        self.snapshots.get(symbol)
    }

    /// Snapshots in the order the symbols were requested.
    pub fn iter(&self) -> impl Iterator<Item = &SymbolSnapshot> {
        self.symbols.iter().filter_map(|s| self.snapshots.get(s))
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// The last year of history available for `symbol`.
pub fn load_recent_series(
    data_port: &dyn DataPort,
    symbol: &str,
) -> Result<PriceSeries, PutscoutError> {
    let (_, last, _) = data_port
        .get_data_range(symbol)?
        .ok_or_else(|| PutscoutError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: "no price history".into(),
        })?;
    let start = last - Duration::days(SNAPSHOT_LOOKBACK_DAYS);
    let points = data_port.fetch_closes(symbol, start, last)?;
    PriceSeries::new(symbol, points)
}

fn load_snapshot(
    data_port: &dyn DataPort,
    symbol: &str,
    config: &IndicatorConfig,
) -> Result<SymbolSnapshot, PutscoutError> {
    let series = load_recent_series(data_port, symbol)?;
    let iv = match data_port.fetch_implied_volatility(symbol) {
        Ok(v) => ImpliedVolatility::from_option(v),
        Err(e) => {
            warn!(symbol = %symbol, "implied volatility unavailable: {e}");
            ImpliedVolatility::Unavailable
        }
    };
    Ok(snapshot_from_series(&series, iv, config))
}
