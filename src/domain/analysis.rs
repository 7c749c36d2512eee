//! Analysis pipeline: indicators, extrema and trendline feed the
//! recommendation, which in turn drives the backtest.
//!
//! The pipeline is a pure function of its inputs. The three independent
//! stages are joined with rayon; running them one after the other gives the
//! same result.

use crate::domain::backtest::{BacktestParams, BacktestResult, DEFAULT_PREMIUM_RATE, run_backtest};
use crate::domain::error::PutscoutError;
use crate::domain::extrema::{DEFAULT_ORDER, ExtremaSet, detect_extrema};
use crate::domain::indicator::frame::{IndicatorConfig, IndicatorFrame, compute_frame};
use crate::domain::price_series::PriceSeries;
use crate::domain::recommendation::{
    ImpliedVolatility, RecommendationInput, RecommendationOutcome, RecommendationPolicy, recommend,
};
use crate::domain::trendline::{Trendline, fit_trendline};
use chrono::{Datelike, NaiveDate};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub indicators: IndicatorConfig,
    pub extrema_order: usize,
    pub policy: RecommendationPolicy,
    pub premium_rate: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorConfig::default(),
            extrema_order: DEFAULT_ORDER,
            policy: RecommendationPolicy::default(),
            premium_rate: DEFAULT_PREMIUM_RATE,
        }
    }
}

/// Inclusive date range the recommendation and backtest look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnalysisWindow {
    /// `Jan 1 of (year - lookback_years)` through `Dec 31 of year`.
    pub fn for_year(year: i32, lookback_years: u32) -> Option<Self> {
        let start_year = year.checked_sub(i32::try_from(lookback_years).ok()?)?;
        let start = NaiveDate::from_ymd_opt(start_year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
        Some(Self { start, end })
    }

    /// First date of history worth loading: one extra year so long
    /// averages are warmed up when the window opens.
    pub fn history_start(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.start.year() - 1, self.start.month(), self.start.day())
            .unwrap_or(self.start)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub symbol: String,
    pub window: AnalysisWindow,
    pub frame: IndicatorFrame,
    pub extrema: ExtremaSet,
    pub trendline: Option<Trendline>,
    pub outcome: RecommendationOutcome,
    pub backtest_params: Option<BacktestParams>,
    pub backtest: Option<BacktestResult>,
    pub implied_volatility: ImpliedVolatility,
}

pub fn run_analysis(
    history: &PriceSeries,
    window: Option<AnalysisWindow>,
    implied_volatility: ImpliedVolatility,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, PutscoutError> {
    let window = window.unwrap_or(AnalysisWindow {
        start: history.first().date,
        end: history.last().date,
    });
    let windowed = history.between(window.start, window.end)?;
    debug!(
        symbol = history.symbol(),
        history = history.len(),
        window = windowed.len(),
        "running analysis"
    );

    let ((frame, extrema), trendline) = rayon::join(
        || {
            rayon::join(
                || compute_frame(history, &config.indicators),
                || detect_extrema(&windowed, config.extrema_order),
            )
        },
        || fit_trendline(&windowed),
    );

    let frame = frame.between(window.start, window.end);
    let trendline = match trendline {
        Ok(t) => Some(t),
        Err(e) => {
            debug!(symbol = history.symbol(), "trendline skipped: {e}");
            None
        }
    };

    let last_row = frame.last().ok_or_else(|| PutscoutError::DataUnavailable {
        symbol: history.symbol().to_string(),
        reason: "analysis window has no indicator rows".into(),
    })?;

    let support_levels = extrema.support_levels();
    let input = RecommendationInput {
        current_price: last_row.close,
        support_levels: &support_levels,
        moving_average_long: last_row.ma_long.value(),
        long_window: config.indicators.ma_long_window,
        implied_volatility,
    };
    let outcome = recommend(&input, &config.policy);

    let backtest_params = outcome.recommendation().map(|rec| BacktestParams {
        strike_price: rec.strike_price,
        days_to_expiry: rec.days_to_expiry,
        premium_rate: config.premium_rate,
    });
    let backtest = backtest_params
        .as_ref()
        .map(|params| run_backtest(&windowed, params));
    debug!(
        symbol = history.symbol(),
        supports = support_levels.len(),
        recommended = backtest.is_some(),
        "analysis complete"
    );

    Ok(AnalysisReport {
        symbol: history.symbol().to_string(),
        window,
        frame,
        extrema,
        trendline,
        outcome,
        backtest_params,
        backtest,
        implied_volatility,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recommendation::NoRecommendationReason;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + 10.0 * (i as f64 / 8.0).sin() + i as f64 * 0.05)
            .collect()
    }

    #[test]
    fn window_for_year() {
        let w = AnalysisWindow::for_year(2024, 1).unwrap();
        assert_eq!(w.start, date(2023, 1, 1));
        assert_eq!(w.end, date(2024, 12, 31));
        assert_eq!(w.history_start(), date(2022, 1, 1));

        let w = AnalysisWindow::for_year(2024, 0).unwrap();
        assert_eq!(w.start, date(2024, 1, 1));
    }

    #[test]
    fn window_for_year_rejects_out_of_range_input() {
        assert_eq!(AnalysisWindow::for_year(i32::MIN, 1), None);
        assert_eq!(AnalysisWindow::for_year(2024, u32::MAX), None);
        assert_eq!(AnalysisWindow::for_year(2024, i32::MAX as u32), None);
    }

    #[test]
    fn default_config_constants() {
        let c = AnalysisConfig::default();
        assert_eq!(c.extrema_order, 5);
        assert!((c.policy.safety_margin - 0.95).abs() < f64::EPSILON);
        assert_eq!(c.policy.days_to_expiry, 45);
        assert!((c.premium_rate - 0.02).abs() < f64::EPSILON);
    }

    #[test]
    fn oscillating_series_produces_recommendation_and_backtest() {
        let series = PriceSeries::from_closes("IWM", date(2023, 1, 1), &wave(300)).unwrap();
        let report = run_analysis(
            &series,
            None,
            ImpliedVolatility::Observed(0.22),
            &AnalysisConfig::default(),
        )
        .unwrap();

        let rec = report.outcome.recommendation().expect("recommendation");
        assert!(rec.strike_price > 0.0);
        assert!(rec.moving_average_long.is_some());
        let bt = report.backtest.as_ref().unwrap();
        assert_eq!(bt.sample_count, 300 - 45);
        assert_eq!(report.frame.len(), 300);
        assert!(report.trendline.is_some());
        assert_eq!(report.backtest_params.as_ref().unwrap().days_to_expiry, 45);
    }

    #[test]
    fn window_narrows_analysis_but_keeps_warmup() {
        let series = PriceSeries::from_closes("IWM", date(2023, 1, 1), &wave(500)).unwrap();
        let window = AnalysisWindow {
            start: date(2024, 1, 1),
            end: date(2024, 6, 30),
        };
        let report = run_analysis(
            &series,
            Some(window),
            ImpliedVolatility::Unavailable,
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(report.frame.rows()[0].date, date(2024, 1, 1));
        assert!(report.frame.rows()[0].ma_long.is_value());
        assert!(report.extrema.points.iter().all(|p| p.date >= window.start));
        if let Some(bt) = &report.backtest {
            assert_eq!(bt.sample_count, report.frame.len() - 45);
        }
    }

    #[test]
    fn monotonic_series_has_no_recommendation() {
        let closes: Vec<f64> = (0..250).map(|i| 50.0 + i as f64).collect();
        let series = PriceSeries::from_closes("QQQ", date(2023, 1, 1), &closes).unwrap();
        let report = run_analysis(
            &series,
            None,
            ImpliedVolatility::Unavailable,
            &AnalysisConfig::default(),
        )
        .unwrap();

        assert_eq!(
            report.outcome,
            RecommendationOutcome::NoRecommendationPossible(NoRecommendationReason::NoSupportLevels)
        );
        assert!(report.backtest.is_none());
        assert!(report.backtest_params.is_none());
    }

    #[test]
    fn single_point_series_skips_trendline() {
        let series = PriceSeries::from_closes("QQQ", date(2023, 1, 1), &[10.0]).unwrap();
        let report = run_analysis(
            &series,
            None,
            ImpliedVolatility::Unavailable,
            &AnalysisConfig::default(),
        )
        .unwrap();
        assert!(report.trendline.is_none());
        assert!(report.backtest.is_none());
    }

    #[test]
    fn empty_window_is_data_unavailable() {
        let series = PriceSeries::from_closes("QQQ", date(2023, 1, 1), &wave(20)).unwrap();
        let window = AnalysisWindow::for_year(2030, 0).unwrap();
        let err = run_analysis(
            &series,
            Some(window),
            ImpliedVolatility::Unavailable,
            &AnalysisConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PutscoutError::DataUnavailable { .. }));
    }
}
