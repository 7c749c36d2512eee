//! HTML report adapter implementing ReportPort.
//!
//! Renders the `report.html` Askama template with the recommendation,
//! backtest totals, the parameters used and inline SVG charts.

use std::fs;
use std::path::PathBuf;

use askama::Template;
use chrono::NaiveDate;
use tracing::info;

use crate::adapters::chart_svg::{generate_price_svg, generate_rsi_svg};
use crate::adapters::text_report_adapter::results_file_stem;
use crate::domain::backtest::{BacktestParams, BacktestResult, TrialOutcome};
use crate::domain::error::PutscoutError;
use crate::ports::report_port::{ReportContext, ReportPort};

/// Most recent trials listed in the report.
const TRIAL_ROWS: usize = 20;

struct TableRow {
    label: &'static str,
    value: String,
    highlight: bool,
}

impl TableRow {
    fn new(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            highlight: false,
        }
    }

    fn highlighted(label: &'static str, value: String) -> Self {
        Self {
            label,
            value,
            highlight: true,
        }
    }
}

struct TrialRow {
    entry_date: NaiveDate,
    exit_date: NaiveDate,
    entry_price: String,
    exit_price: String,
    outcome: &'static str,
    assigned: bool,
    profit: String,
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    symbol: &'a str,
    generated_at: String,
    window_start: NaiveDate,
    window_end: NaiveDate,
    narrative: String,
    backtest: Vec<TableRow>,
    trials: Vec<TrialRow>,
    parameters: Vec<TableRow>,
    price_svg: String,
    rsi_svg: String,
}

fn backtest_rows(bt: &BacktestResult) -> Vec<TableRow> {
    vec![
        TableRow::highlighted("Total Profit", format!("${:.2}", bt.total_profit)),
        TableRow::highlighted("Average Profit", format!("${:.2}", bt.average_profit)),
        TableRow::new(
            "Trials",
            format!(
                "{} ({} expired, {} assigned)",
                bt.sample_count, bt.expired_count, bt.assigned_count
            ),
        ),
        TableRow::new(
            "Assignment Rate",
            format!("{:.1}%", bt.assignment_rate() * 100.0),
        ),
    ]
}

fn trial_rows(bt: &BacktestResult) -> Vec<TrialRow> {
    bt.trials[bt.trials.len().saturating_sub(TRIAL_ROWS)..]
        .iter()
        .map(|t| {
            let (outcome, assigned) = match t.outcome {
                TrialOutcome::Expired => ("Expired", false),
                TrialOutcome::Assigned => ("Assigned", true),
            };
            TrialRow {
                entry_date: t.entry_date,
                exit_date: t.exit_date,
                entry_price: format!("${:.2}", t.entry_price),
                exit_price: format!("${:.2}", t.exit_price),
                outcome,
                assigned,
                profit: format!("${:.2}", t.profit),
            }
        })
        .collect()
}

fn parameter_rows(params: &BacktestParams) -> Vec<TableRow> {
    vec![
        TableRow::new("Strike Price", format!("${:.2}", params.strike_price)),
        TableRow::new("Duration (DTE)", format!("{} days", params.days_to_expiry)),
        TableRow::new(
            "Premium Rate",
            format!("{:.2}%", params.premium_rate * 100.0),
        ),
    ]
}

pub fn render_html(ctx: &ReportContext) -> Result<String, PutscoutError> {
    let report = ctx.report;
    let template = ReportTemplate {
        symbol: &report.symbol,
        generated_at: ctx.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        window_start: report.window.start,
        window_end: report.window.end,
        narrative: report.outcome.narrative(),
        backtest: report.backtest.as_ref().map(backtest_rows).unwrap_or_default(),
        trials: report.backtest.as_ref().map(trial_rows).unwrap_or_default(),
        parameters: report
            .backtest_params
            .as_ref()
            .map(parameter_rows)
            .unwrap_or_default(),
        price_svg: generate_price_svg(report),
        rsi_svg: generate_rsi_svg(report),
    };
    template
        .render()
        .map_err(|e| PutscoutError::Io(std::io::Error::other(e.to_string())))
}

pub struct HtmlReportAdapter {
    output_dir: PathBuf,
}

impl HtmlReportAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, ctx: &ReportContext) -> Result<Vec<PathBuf>, PutscoutError> {
        let html = render_html(ctx)?;
        fs::create_dir_all(&self.output_dir)?;
        let path = self
            .output_dir
            .join(format!("{}.html", results_file_stem(ctx)));
        fs::write(&path, html)?;
        info!(path = %path.display(), "HTML report exported");
        Ok(vec![path])
    }
}
