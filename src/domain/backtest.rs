//! Rolling cash-secured put backtest.
//!
//! One trial opens on every bar `i` with at least `days_to_expiry` bars
//! after it and settles on bar `i + days_to_expiry`:
//! - exit >= strike: expires worthless, profit = premium_rate * entry
//! - exit <  strike: assigned, profit = strike - exit
//!
//! Trials overlap on purpose; each one answers "what if the put had been
//! sold on this day".

use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub const DEFAULT_PREMIUM_RATE: f64 = 0.02;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestParams {
    pub strike_price: f64,
    pub days_to_expiry: usize,
    pub premium_rate: f64,
}

impl BacktestParams {
    pub fn new(strike_price: f64, days_to_expiry: usize) -> Self {
        Self {
            strike_price,
            days_to_expiry,
            premium_rate: DEFAULT_PREMIUM_RATE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialOutcome {
    Expired,
    Assigned,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub outcome: TrialOutcome,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub total_profit: f64,
    pub average_profit: f64,
    pub sample_count: usize,
    pub expired_count: usize,
    pub assigned_count: usize,
    pub trials: Vec<Trial>,
}

impl BacktestResult {
    /// Share of trials that ended in assignment, 0 with no trials.
    pub fn assignment_rate(&self) -> f64 {
        if self.sample_count == 0 {
            0.0
        } else {
            self.assigned_count as f64 / self.sample_count as f64
        }
    }
}

pub fn settle_trial(entry_price: f64, exit_price: f64, params: &BacktestParams) -> (TrialOutcome, f64) {
    if exit_price >= params.strike_price {
        (TrialOutcome::Expired, params.premium_rate * entry_price)
    } else {
        (TrialOutcome::Assigned, params.strike_price - exit_price)
    }
}

pub fn run_backtest(series: &PriceSeries, params: &BacktestParams) -> BacktestResult {
    let points = series.points();
    let sample_count = points.len().saturating_sub(params.days_to_expiry);

    let trials: Vec<Trial> = (0..sample_count)
        .map(|i| {
            let entry = points[i];
            let exit = points[i + params.days_to_expiry];
            let (outcome, profit) = settle_trial(entry.close, exit.close, params);
            Trial {
                entry_date: entry.date,
                exit_date: exit.date,
                entry_price: entry.close,
                exit_price: exit.close,
                outcome,
                profit,
            }
        })
        .collect();

    let total_profit: f64 = trials.iter().map(|t| t.profit).sum();
    let average_profit = if sample_count == 0 {
        0.0
    } else {
        total_profit / sample_count as f64
    };
    let assigned_count = trials
        .iter()
        .filter(|t| t.outcome == TrialOutcome::Assigned)
        .count();

    BacktestResult {
        total_profit,
        average_profit,
        sample_count,
        expired_count: sample_count - assigned_count,
        assigned_count,
        trials,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_series(prices: &[f64]) -> PriceSeries {
        PriceSeries::from_closes("TEST", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), prices)
            .unwrap()
    }

    #[test]
    fn regression_six_points() {
        let series = make_series(&[100.0, 102.0, 98.0, 101.0, 97.0, 103.0]);
        let result = run_backtest(&series, &BacktestParams::new(99.0, 2));

        assert_eq!(result.sample_count, 4);
        let exits: Vec<f64> = result.trials.iter().map(|t| t.exit_price).collect();
        assert_eq!(exits, vec![98.0, 101.0, 97.0, 103.0]);

        let profits: Vec<f64> = result.trials.iter().map(|t| t.profit).collect();
        let expected = [1.0, 2.04, 2.0, 2.02];
        for (p, e) in profits.iter().zip(expected) {
            assert!((p - e).abs() < 1e-9, "{} != {}", p, e);
        }
        assert!((result.total_profit - 7.06).abs() < 1e-9);
        assert!((result.average_profit - 1.765).abs() < 1e-9);
        assert_eq!(result.assigned_count, 2);
        assert_eq!(result.expired_count, 2);
        assert!((result.assignment_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn exit_equal_to_strike_expires() {
        let params = BacktestParams::new(99.0, 1);
        let (outcome, profit) = settle_trial(100.0, 99.0, &params);
        assert_eq!(outcome, TrialOutcome::Expired);
        assert!((profit - 2.0).abs() < 1e-12);
    }

    #[test]
    fn days_to_expiry_beyond_series_skips() {
        let series = make_series(&[100.0, 101.0, 102.0]);
        for dte in [3, 4, 100] {
            let result = run_backtest(&series, &BacktestParams::new(95.0, dte));
            assert_eq!(result.sample_count, 0);
            assert_eq!(result.total_profit, 0.0);
            assert_eq!(result.average_profit, 0.0);
            assert!(result.trials.is_empty());
            assert_eq!(result.assignment_rate(), 0.0);
        }
    }

    #[test]
    fn trial_dates_span_days_to_expiry() {
        let series = make_series(&[10.0, 11.0, 12.0, 13.0]);
        let result = run_backtest(&series, &BacktestParams::new(5.0, 3));
        assert_eq!(result.sample_count, 1);
        let trial = &result.trials[0];
        assert_eq!(trial.entry_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(trial.exit_date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(trial.outcome, TrialOutcome::Expired);
    }

    #[test]
    fn custom_premium_rate() {
        let series = make_series(&[100.0, 100.0]);
        let params = BacktestParams {
            premium_rate: 0.05,
            ..BacktestParams::new(90.0, 1)
        };
        let result = run_backtest(&series, &params);
        assert!((result.total_profit - 5.0).abs() < 1e-12);
    }
}
