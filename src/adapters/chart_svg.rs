//! Inline SVG charts for HTML reports.
//!
//! Two panels: price with overlays (short MA, Bollinger bands, long MA,
//! trendline, support and resistance levels) and RSI with 30/70 guides.
//! Gaps in an indicator (warm-up) break its line instead of drawing zero.

use crate::domain::analysis::AnalysisReport;
use crate::domain::indicator::frame::IndicatorRow;
use crate::domain::snapshot::{OVERBOUGHT_ABOVE, OVERSOLD_BELOW};

const CHART_WIDTH: f64 = 900.0;
const PRICE_HEIGHT: f64 = 360.0;
const RSI_HEIGHT: f64 = 150.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 30.0;

const CLOSE_COLOR: &str = "#2563eb";
const MA_SHORT_COLOR: &str = "#f59e0b";
const MA_LONG_COLOR: &str = "#7c3aed";
const BAND_COLOR: &str = "#9ca3af";
const TREND_COLOR: &str = "#111827";
const SUPPORT_COLOR: &str = "#16a34a";
const RESISTANCE_COLOR: &str = "#dc2626";

struct Axis {
    count: usize,
    min: f64,
    max: f64,
    height: f64,
}

impl Axis {
    fn x(&self, i: usize) -> f64 {
        let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + (i as f64 / (self.count.saturating_sub(1)).max(1) as f64) * plot_width
    }

    fn y(&self, v: f64) -> f64 {
        let plot_height = self.height - MARGIN_TOP - MARGIN_BOTTOM;
        let range = (self.max - self.min).max(f64::EPSILON);
        MARGIN_TOP + plot_height - ((v - self.min) / range) * plot_height
    }
}

/// SVG path data for a series with gaps. Each run of present values starts
/// a new subpath.
fn series_path(values: &[Option<f64>], axis: &Axis) -> String {
    let mut path = String::new();
    let mut pen_down = false;
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) => {
                let cmd = if pen_down { " L" } else { " M" };
                path.push_str(&format!("{} {:.1} {:.1}", cmd, axis.x(i), axis.y(*v)));
                pen_down = true;
            }
            None => pen_down = false,
        }
    }
    path.trim_start().to_string()
}

fn push_path(svg: &mut String, values: &[Option<f64>], axis: &Axis, color: &str, dashed: bool) {
    let d = series_path(values, axis);
    if d.is_empty() {
        return;
    }
    let dash = if dashed { " stroke-dasharray=\"4 3\"" } else { "" };
    svg.push_str(&format!(
        "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"{}/>\n",
        d, color, dash
    ));
}

fn push_level(svg: &mut String, level: f64, axis: &Axis, color: &str) {
    let y = axis.y(level);
    svg.push_str(&format!(
        "  <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"0.8\" stroke-dasharray=\"2 3\"/>\n",
        MARGIN_LEFT,
        y,
        CHART_WIDTH - MARGIN_RIGHT,
        y,
        color
    ));
}

fn push_frame(svg: &mut String, height: f64, title: &str) {
    svg.push_str(&format!(
        "<svg width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        w = CHART_WIDTH,
        h = height
    ));
    svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"14\" text-anchor=\"end\" font-size=\"12\" fill=\"#666\">{}</text>\n",
        CHART_WIDTH - MARGIN_RIGHT,
        title
    ));
    svg.push_str(&format!(
        "  <line x1=\"{l}\" y1=\"{t}\" x2=\"{l}\" y2=\"{b}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = height - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{l}\" y1=\"{b}\" x2=\"{r}\" y2=\"{b}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        l = MARGIN_LEFT,
        r = CHART_WIDTH - MARGIN_RIGHT,
        b = height - MARGIN_BOTTOM
    ));
}

fn push_y_label(svg: &mut String, axis: &Axis, value: f64, text: &str) {
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
        MARGIN_LEFT - 5.0,
        axis.y(value) + 3.0,
        text
    ));
}

fn push_date_labels(svg: &mut String, rows: &[IndicatorRow], axis: &Axis) {
    let y = axis.height - MARGIN_BOTTOM + 15.0;
    let first = 0;
    let last = rows.len() - 1;
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" fill=\"#666\">{}</text>\n",
        axis.x(first),
        y,
        rows[first].date
    ));
    if last > first {
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            axis.x(last),
            y,
            rows[last].date
        ));
    }
}

/// Price panel for the report window. Empty string when there are no rows.
pub fn generate_price_svg(report: &AnalysisReport) -> String {
    let rows = report.frame.rows();
    if rows.is_empty() {
        return String::new();
    }

    let close: Vec<Option<f64>> = rows.iter().map(|r| Some(r.close)).collect();
    let ma_short: Vec<Option<f64>> = rows.iter().map(|r| r.ma_short.value()).collect();
    let ma_long: Vec<Option<f64>> = rows.iter().map(|r| r.ma_long.value()).collect();
    let upper: Vec<Option<f64>> = rows.iter().map(|r| r.bollinger_upper().value()).collect();
    let lower: Vec<Option<f64>> = rows.iter().map(|r| r.bollinger_lower().value()).collect();
    let trend: Vec<Option<f64>> = report
        .trendline
        .as_ref()
        .filter(|t| t.fitted_values.len() == rows.len())
        .map(|t| t.fitted_values.iter().copied().map(Some).collect())
        .unwrap_or_default();
    let supports = report.extrema.support_levels();
    let resistances = report.extrema.resistance_levels();

    let (min, max) = [&close, &ma_short, &ma_long, &upper, &lower, &trend]
        .iter()
        .flat_map(|s| s.iter().flatten())
        .chain(supports.iter())
        .chain(resistances.iter())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let axis = Axis {
        count: rows.len(),
        min,
        max,
        height: PRICE_HEIGHT,
    };

    let mut svg = String::new();
    push_frame(&mut svg, PRICE_HEIGHT, "Close (USD)");
    push_y_label(&mut svg, &axis, max, &format!("{:.2}", max));
    push_y_label(&mut svg, &axis, (min + max) / 2.0, &format!("{:.2}", (min + max) / 2.0));
    push_y_label(&mut svg, &axis, min, &format!("{:.2}", min));

    for level in &supports {
        push_level(&mut svg, *level, &axis, SUPPORT_COLOR);
    }
    for level in &resistances {
        push_level(&mut svg, *level, &axis, RESISTANCE_COLOR);
    }
    push_path(&mut svg, &upper, &axis, BAND_COLOR, true);
    push_path(&mut svg, &lower, &axis, BAND_COLOR, true);
    push_path(&mut svg, &ma_long, &axis, MA_LONG_COLOR, false);
    push_path(&mut svg, &ma_short, &axis, MA_SHORT_COLOR, false);
    push_path(&mut svg, &trend, &axis, TREND_COLOR, true);
    push_path(&mut svg, &close, &axis, CLOSE_COLOR, false);
    push_date_labels(&mut svg, rows, &axis);

    svg.push_str("</svg>\n");
    svg
}

/// RSI panel with oversold and overbought guides.
pub fn generate_rsi_svg(report: &AnalysisReport) -> String {
    let rows = report.frame.rows();
    if rows.is_empty() {
        return String::new();
    }
    let axis = Axis {
        count: rows.len(),
        min: 0.0,
        max: 100.0,
        height: RSI_HEIGHT,
    };
    let rsi: Vec<Option<f64>> = rows.iter().map(|r| r.rsi.value()).collect();

    let mut svg = String::new();
    push_frame(
        &mut svg,
        RSI_HEIGHT,
        &format!("RSI({})", report.frame.config().rsi_window),
    );
    push_level(&mut svg, OVERBOUGHT_ABOVE, &axis, RESISTANCE_COLOR);
    push_level(&mut svg, OVERSOLD_BELOW, &axis, SUPPORT_COLOR);
    push_y_label(&mut svg, &axis, OVERBOUGHT_ABOVE, "70");
    push_y_label(&mut svg, &axis, OVERSOLD_BELOW, "30");
    push_path(&mut svg, &rsi, &axis, MA_LONG_COLOR, false);
    push_date_labels(&mut svg, rows, &axis);

    svg.push_str("</svg>\n");
    svg
}
