//! Plain-text report adapter.
//!
//! Writes `results_<SYMBOL>_<YYYYmmdd_HHMMSS>.txt` and appends the
//! recommendation to the monthly `recommendation_<YYYYMM>.txt` journal.

use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::PathBuf;

use tracing::info;

use crate::domain::error::PutscoutError;
use crate::ports::report_port::{ReportContext, ReportPort};

const JOURNAL_OPEN: &str = "#########################################################################################################";
const JOURNAL_CLOSE: &str = "*********************************************************************************************************";

/// Symbol with characters that are unsafe in file names replaced by `_`.
pub fn safe_symbol(symbol: &str) -> String {
    symbol.replace([' ', '/'], "_")
}

pub(crate) fn results_file_stem(ctx: &ReportContext) -> String {
    format!(
        "results_{}_{}",
        safe_symbol(&ctx.report.symbol),
        ctx.generated_at.format("%Y%m%d_%H%M%S")
    )
}

fn render_parameters(out: &mut String, ctx: &ReportContext, symbol: &str) {
    if let Some(params) = &ctx.report.backtest_params {
        out.push_str(&format!("Parameters Used for selling puts on {}:\n", symbol));
        out.push_str(&format!("  - Strike Price: {:.2} USD\n", params.strike_price));
        out.push_str(&format!("  - Duration (DTE): {} days\n", params.days_to_expiry));
    }
}

pub fn render_results(ctx: &ReportContext) -> String {
    let symbol = safe_symbol(&ctx.report.symbol);
    let mut out = String::new();
    out.push_str(&format!(
        "Results exported on: {} {}\n\n",
        symbol,
        ctx.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!(
        "Analysis window: {} to {}\n\n",
        ctx.report.window.start, ctx.report.window.end
    ));
    out.push_str(&format!(
        "Recommendation {} :\n{}\n\n",
        symbol,
        ctx.report.outcome.narrative()
    ));

    if let Some(bt) = &ctx.report.backtest {
        out.push_str("Backtest Results:\n");
        out.push_str(&format!("  - Total Profit: {:.2} USD\n", bt.total_profit));
        out.push_str(&format!("  - Average Profit: {:.2} USD\n", bt.average_profit));
        out.push_str(&format!(
            "  - Trials: {} ({} expired, {} assigned)\n\n",
            bt.sample_count, bt.expired_count, bt.assigned_count
        ));
    }
    render_parameters(&mut out, ctx, &symbol);
    out
}

pub fn render_journal_entry(ctx: &ReportContext) -> String {
    let symbol = safe_symbol(&ctx.report.symbol);
    let mut out = String::new();
    out.push_str(&format!("{}\n", JOURNAL_OPEN));
    out.push_str(&format!(
        "Results exported on: {} {}\n\n",
        symbol,
        ctx.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&format!(
        "Recommendation {} :\n{}\n\n",
        symbol,
        ctx.report.outcome.narrative()
    ));
    render_parameters(&mut out, ctx, &symbol);
    out.push('\n');
    out.push_str(&format!("{}\n", JOURNAL_CLOSE));
    out
}

pub struct TextReportAdapter {
    output_dir: PathBuf,
}

impl TextReportAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

impl ReportPort for TextReportAdapter {
    fn write(&self, ctx: &ReportContext) -> Result<Vec<PathBuf>, PutscoutError> {
        fs::create_dir_all(&self.output_dir)?;

        let results_path = self
            .output_dir
            .join(format!("{}.txt", results_file_stem(ctx)));
        fs::write(&results_path, render_results(ctx))?;
        info!(path = %results_path.display(), "results exported");

        let journal_path = self.output_dir.join(format!(
            "recommendation_{}.txt",
            ctx.generated_at.format("%Y%m")
        ));
        let mut journal = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&journal_path)?;
        journal.write_all(render_journal_entry(ctx).as_bytes())?;
        info!(path = %journal_path.display(), "recommendation appended");

        Ok(vec![results_path, journal_path])
    }
}
