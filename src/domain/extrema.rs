//! Local extrema detection for support and resistance levels.
//!
//! A bar is a maximum (minimum) when its close is strictly greater (less)
//! than every close within `order` bars on either side. Ties disqualify, and
//! bars closer than `order` to either end of the series are never classified.

use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub const DEFAULT_ORDER: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtremaKind {
    Maximum,
    Minimum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtremaPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub kind: ExtremaKind,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtremaSet {
    pub points: Vec<ExtremaPoint>,
}

impl ExtremaSet {
    pub fn maxima(&self) -> impl Iterator<Item = &ExtremaPoint> {
        self.points.iter().filter(|p| p.kind == ExtremaKind::Maximum)
    }

    pub fn minima(&self) -> impl Iterator<Item = &ExtremaPoint> {
        self.points.iter().filter(|p| p.kind == ExtremaKind::Minimum)
    }

    pub fn support_levels(&self) -> Vec<f64> {
        self.minima().map(|p| p.price).collect()
    }

    pub fn resistance_levels(&self) -> Vec<f64> {
        self.maxima().map(|p| p.price).collect()
    }
}

pub fn detect_extrema(series: &PriceSeries, order: usize) -> ExtremaSet {
    let points = series.points();
    let n = points.len();
    let mut found = Vec::new();

    if order == 0 || n <= 2 * order {
        return ExtremaSet { points: found };
    }

    for i in order..n - order {
        let close = points[i].close;
        let neighbours = points[i - order..=i + order]
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != order)
            .map(|(_, p)| p.close);

        let mut is_max = true;
        let mut is_min = true;
        for other in neighbours {
            is_max &= close > other;
            is_min &= close < other;
        }

        let kind = if is_max {
            ExtremaKind::Maximum
        } else if is_min {
            ExtremaKind::Minimum
        } else {
            continue;
        };

        found.push(ExtremaPoint {
            date: points[i].date,
            price: close,
            kind,
        });
    }

    ExtremaSet { points: found }
}
