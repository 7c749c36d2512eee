#![allow(dead_code)]

use chrono::NaiveDate;
use putscout::domain::error::PutscoutError;
use putscout::domain::price_series::{PricePoint, PriceSeries};
use putscout::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub iv: HashMap<String, f64>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            iv: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_points(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_closes(self, symbol: &str, start: NaiveDate, closes: &[f64]) -> Self {
        let points = closes
            .iter()
            .zip(start.iter_days())
            .map(|(&c, d)| PricePoint::new(d, c))
            .collect();
        self.with_points(symbol, points)
    }

    pub fn with_iv(mut self, symbol: &str, iv: f64) -> Self {
        self.iv.insert(symbol.to_string(), iv);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    fn check(&self, symbol: &str) -> Result<(), PutscoutError> {
        match self.errors.get(symbol) {
            Some(reason) => Err(PutscoutError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, PutscoutError> {
        self.check(symbol)?;
        Ok(self
            .data
            .get(symbol)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, PutscoutError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PutscoutError> {
        self.check(symbol)?;
        match self.data.get(symbol) {
            Some(points) if !points.is_empty() => {
                let min = points.iter().map(|p| p.date).min().unwrap();
                let max = points.iter().map(|p| p.date).max().unwrap();
                Ok(Some((min, max, points.len())))
            }
            _ => Ok(None),
        }
    }

    fn fetch_implied_volatility(&self, symbol: &str) -> Result<Option<f64>, PutscoutError> {
        Ok(self.iv.get(symbol).copied())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::from_closes(symbol, date(2023, 1, 1), closes).unwrap()
}

pub fn constant_closes(n: usize, value: f64) -> Vec<f64> {
    vec![value; n]
}

pub fn rising_closes(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Oscillating closes with a mild upward drift.
pub fn wave_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 10.0 * (i as f64 / 8.0).sin() + i as f64 * 0.05)
        .collect()
}

/// Flat series at `base` with a single strict dip at index `k`.
pub fn dip_closes(n: usize, k: usize, base: f64) -> Vec<f64> {
    (0..n)
        .map(|i| if i == k { base - 5.0 } else { base })
        .collect()
}
