//! Daily close price series.
//!
//! A [`PriceSeries`] is validated once at construction and never mutated
//! afterwards: dates strictly increase, the series is non-empty and every
//! close is finite and positive.

use crate::domain::error::PutscoutError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, PutscoutError> {
        let symbol = symbol.into();
        if points.is_empty() {
            return Err(PutscoutError::DataUnavailable {
                symbol,
                reason: "price series is empty".into(),
            });
        }

        for (i, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(PutscoutError::InvalidSeries {
                    reason: format!(
                        "close on {} must be a positive number, got {}",
                        point.date, point.close
                    ),
                });
            }
            if i > 0 && points[i - 1].date >= point.date {
                return Err(PutscoutError::InvalidSeries {
                    reason: format!(
                        "dates must strictly increase ({} followed by {})",
                        points[i - 1].date, point.date
                    ),
                });
            }
        }

        Ok(Self { symbol, points })
    }

    /// Build a series of consecutive calendar days starting at `start`.
    pub fn from_closes(
        symbol: impl Into<String>,
        start: NaiveDate,
        closes: &[f64],
    ) -> Result<Self, PutscoutError> {
        let points = closes
            .iter()
            .zip(start.iter_days())
            .map(|(&close, date)| PricePoint { date, close })
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first(&self) -> &PricePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.points.binary_search_by_key(&date, |p| p.date).ok()
    }

    /// Points whose dates fall in `[start, end]`, as a new series.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Result<Self, PutscoutError> {
        let points: Vec<PricePoint> = self
            .points
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .copied()
            .collect();

        if points.is_empty() {
            return Err(PutscoutError::DataUnavailable {
                symbol: self.symbol.clone(),
                reason: format!("no prices between {} and {}", start, end),
            });
        }

        Ok(Self {
            symbol: self.symbol.clone(),
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_closes_assigns_consecutive_days() {
        let series = PriceSeries::from_closes("IWM", date(2024, 1, 30), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.symbol(), "IWM");
        assert_eq!(series.points()[2].date, date(2024, 2, 1));
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn rejects_empty_series() {
        let err = PriceSeries::new("SPY", vec![]).unwrap_err();
        assert!(matches!(err, PutscoutError::DataUnavailable { ref symbol, .. } if symbol == "SPY"));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let points = vec![
            PricePoint::new(date(2024, 1, 2), 10.0),
            PricePoint::new(date(2024, 1, 2), 11.0),
        ];
        assert!(matches!(
            PriceSeries::new("SPY", points),
            Err(PutscoutError::InvalidSeries { .. })
        ));
    }

    #[test]
    fn rejects_unordered_dates() {
        let points = vec![
            PricePoint::new(date(2024, 1, 3), 10.0),
            PricePoint::new(date(2024, 1, 2), 11.0),
        ];
        assert!(PriceSeries::new("SPY", points).is_err());
    }

    #[test]
    fn rejects_non_positive_close() {
        let points = vec![
            PricePoint::new(date(2024, 1, 2), 10.0),
            PricePoint::new(date(2024, 1, 3), 0.0),
        ];
        assert!(PriceSeries::new("SPY", points).is_err());

        let points = vec![PricePoint::new(date(2024, 1, 2), f64::NAN)];
        assert!(PriceSeries::new("SPY", points).is_err());
    }

    #[test]
    fn between_narrows_to_inclusive_range() {
        let series =
            PriceSeries::from_closes("QQQ", date(2024, 1, 1), &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let window = series.between(date(2024, 1, 2), date(2024, 1, 4)).unwrap();
        assert_eq!(window.closes(), vec![2.0, 3.0, 4.0]);
        assert_eq!(window.first().date, date(2024, 1, 2));
        assert_eq!(window.last().date, date(2024, 1, 4));
    }

    #[test]
    fn between_empty_range_is_data_unavailable() {
        let series = PriceSeries::from_closes("QQQ", date(2024, 1, 1), &[1.0, 2.0]).unwrap();
        let err = series.between(date(2025, 1, 1), date(2025, 12, 31)).unwrap_err();
        assert!(matches!(err, PutscoutError::DataUnavailable { .. }));
    }

    #[test]
    fn index_of_finds_dates() {
        let series = PriceSeries::from_closes("QQQ", date(2024, 1, 1), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.index_of(date(2024, 1, 3)), Some(2));
        assert_eq!(series.index_of(date(2024, 2, 1)), None);
    }
}
