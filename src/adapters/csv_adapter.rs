//! CSV file data adapter.
//!
//! Price history lives in `<dir>/<SYMBOL>.csv` with at least a `Date` and a
//! `Close` column. Implied volatility estimates live in
//! `<dir>/implied_volatility.csv` as `symbol,iv` rows.

use crate::domain::error::PutscoutError;
use crate::domain::price_series::PricePoint;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const IMPLIED_VOLATILITY_FILE: &str = "implied_volatility.csv";

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct IvRecord {
    symbol: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    iv: Option<f64>,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<PricePoint>, PutscoutError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(PutscoutError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("{} not found", path.display()),
            });
        }
        read_price_file(&path, symbol)
    }
}

fn unavailable(symbol: &str, reason: String) -> PutscoutError {
    PutscoutError::DataUnavailable {
        symbol: symbol.to_string(),
        reason,
    }
}

fn read_price_file(path: &Path, symbol: &str) -> Result<Vec<PricePoint>, PutscoutError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| unavailable(symbol, format!("failed to read {}: {}", path.display(), e)))?;

    let headers = rdr
        .headers()
        .map_err(|e| unavailable(symbol, format!("CSV header error: {}", e)))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| unavailable(symbol, format!("missing {} column", name)))
    };
    let date_col = column("date")?;
    let close_col = column("close")?;

    let mut points = Vec::new();
    let mut skipped = 0usize;
    for result in rdr.records() {
        let record =
            result.map_err(|e| unavailable(symbol, format!("CSV parse error: {}", e)))?;

        let date_str = record.get(date_col).unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            unavailable(symbol, format!("invalid date '{}': {}", date_str, e))
        })?;

        match record.get(close_col).and_then(|s| s.parse::<f64>().ok()) {
            Some(close) if close.is_finite() => points.push(PricePoint::new(date, close)),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(symbol, skipped, "skipped rows without a numeric close");
    }

    Ok(points)
}

impl DataPort for CsvAdapter {
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, PutscoutError> {
        let mut points = self.read_all(symbol)?;
        points.retain(|p| p.date >= start_date && p.date <= end_date);
        Ok(points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, PutscoutError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name_str = name.to_string_lossy();
            if name_str == IMPLIED_VOLATILITY_FILE {
                continue;
            }
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PutscoutError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Ok(None);
        }
        let points = read_price_file(&path, symbol)?;
        let first = points.iter().map(|p| p.date).min();
        let last = points.iter().map(|p| p.date).max();
        Ok(match (first, last) {
            (Some(first), Some(last)) => Some((first, last, points.len())),
            _ => None,
        })
    }

    fn fetch_implied_volatility(&self, symbol: &str) -> Result<Option<f64>, PutscoutError> {
        let path = self.base_path.join(IMPLIED_VOLATILITY_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| unavailable(symbol, format!("failed to read {}: {}", path.display(), e)))?;

        for result in rdr.deserialize::<IvRecord>() {
            match result {
                Ok(rec) if rec.symbol.eq_ignore_ascii_case(symbol) => return Ok(rec.iv),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), "bad implied volatility row: {e}"),
            }
        }
        Ok(None)
    }
}
