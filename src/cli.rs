//! CLI definition and dispatch.

use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_trade_log_adapter::CsvTradeLogAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::analysis::{AnalysisConfig, AnalysisReport, AnalysisWindow, run_analysis};
use crate::domain::config_validation::{
    bounded_int, validate_indicator_config, validate_strategy_config,
};
use crate::domain::error::PutscoutError;
use crate::domain::indicator::Reading;
use crate::domain::indicator::frame::IndicatorConfig;
use crate::domain::price_series::PriceSeries;
use crate::domain::recommendation::{ImpliedVolatility, RecommendationPolicy};
use crate::domain::snapshot::MarketCache;
use crate::domain::trade_log::{OptionTrade, OptionType, TradeAction, TradeMonth, TradeStatus};
use crate::ports::config_port::{ConfigPort, parse_symbol_list};
use crate::ports::data_port::DataPort;
use crate::ports::report_port::{ReportContext, ReportPort};
use crate::ports::trade_log_port::TradeLogPort;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_REPORT_DIR: &str = "results";
pub const DEFAULT_TRADES_DIR: &str = "trades";
pub const DEFAULT_LOOKBACK_YEARS: u32 = 1;

#[derive(Parser, Debug)]
#[command(name = "putscout", about = "Cash-secured put analysis and backtesting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyse a symbol and recommend a put strike
    Analyze {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        symbol: Option<String>,
        /// Last calendar year of the analysis window
        #[arg(short, long)]
        year: Option<i32>,
        /// Extra years before `year` included in the window
        #[arg(long)]
        lookback: Option<u32>,
        /// Implied volatility override, e.g. 0.22
        #[arg(long)]
        iv: Option<f64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        no_report: bool,
    },
    /// Show indicator snapshots for a list of symbols
    Observe {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Comma-separated symbols; defaults to [observer] symbols
        #[arg(short, long)]
        symbols: Option<String>,
    },
    /// List symbols with price data
    ListSymbols {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(short, long)]
        symbol: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Record an option trade in the monthly journal
    LogTrade {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// SOLD, BOUGHT or "REC SOLD"
        #[arg(long)]
        action: TradeAction,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        expiry: NaiveDate,
        #[arg(long)]
        strike: f64,
        #[arg(long, default_value = "PUT")]
        option_type: OptionType,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value = "")]
        comment: String,
        /// Trade date, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Trade time as HH:MM, defaults to now
        #[arg(long)]
        time: Option<String>,
    },
    /// Show logged trades for a month with their status against the strike
    Trades {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// YYYYMM, defaults to the current month
        #[arg(short, long)]
        month: Option<TradeMonth>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            config,
            symbol,
            year,
            lookback,
            iv,
            output,
            no_report,
        } => run_analyze(
            config.as_deref(),
            symbol.as_deref(),
            year,
            lookback,
            iv,
            output.as_deref(),
            no_report,
        ),
        Command::Observe { config, symbols } => run_observe(config.as_deref(), symbols.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(config.as_deref()),
        Command::Info { symbol, config } => run_info(symbol.as_deref(), config.as_deref()),
        Command::LogTrade {
            config,
            action,
            symbol,
            quantity,
            expiry,
            strike,
            option_type,
            price,
            comment,
            date,
            time,
        } => {
            let now = Local::now().naive_local();
            let trade = OptionTrade {
                date: date.unwrap_or(now.date()),
                time: time.unwrap_or_else(|| now.format("%H:%M").to_string()),
                action,
                quantity,
                symbol: symbol.trim().to_uppercase(),
                expiry,
                strike_price: strike,
                option_type,
                price,
                comment,
            };
            run_log_trade(config.as_deref(), &trade)
        }
        Command::Trades { config, month } => run_trades(
            config.as_deref(),
            month.unwrap_or_else(|| TradeMonth::of(Local::now().date_naive())),
        ),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

/// The config file at `path`, or an empty config when none was given.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, PutscoutError> {
    match path {
        Some(p) => {
            info!(path = %p.display(), "loading config");
            FileConfigAdapter::from_file(p)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn build_analysis_config(adapter: &dyn ConfigPort) -> Result<AnalysisConfig, PutscoutError> {
    validate_indicator_config(adapter)?;
    validate_strategy_config(adapter)?;

    let defaults = AnalysisConfig::default();
    let ind = &defaults.indicators;
    let window = |key: &str, default: usize, min: i64| {
        bounded_int::<usize>(adapter, "indicators", key, default as i64, min)
    };

    let indicators = IndicatorConfig {
        ma_short_window: window("ma_short_window", ind.ma_short_window, 1)?,
        ma_long_window: window("ma_long_window", ind.ma_long_window, 1)?,
        rsi_window: window("rsi_window", ind.rsi_window, 1)?,
        bollinger_window: window("bollinger_window", ind.bollinger_window, 2)?,
        bollinger_multiplier: adapter.get_double(
            "indicators",
            "bollinger_multiplier",
            ind.bollinger_multiplier,
        ),
        volatility_window: window("volatility_window", ind.volatility_window, 2)?,
        annualization: bounded_int(
            adapter,
            "indicators",
            "annualization",
            ind.annualization.into(),
            1,
        )?,
    };

    Ok(AnalysisConfig {
        indicators,
        extrema_order: bounded_int(adapter, "extrema", "order", defaults.extrema_order as i64, 1)?,
        policy: RecommendationPolicy {
            safety_margin: adapter.get_double(
                "strategy",
                "safety_margin",
                defaults.policy.safety_margin,
            ),
            days_to_expiry: bounded_int(
                adapter,
                "strategy",
                "days_to_expiry",
                defaults.policy.days_to_expiry as i64,
                1,
            )?,
        },
        premium_rate: adapter.get_double("strategy", "premium_rate", defaults.premium_rate),
    })
}

/// Window from the CLI year, falling back to `[analysis] year`. `None` means
/// the whole data range.
pub fn resolve_window(
    adapter: &dyn ConfigPort,
    year: Option<i32>,
    lookback: Option<u32>,
) -> Result<Option<AnalysisWindow>, PutscoutError> {
    let year = match year {
        Some(y) => Some(y),
        None => match adapter.get_string("analysis", "year") {
            Some(raw) => Some(raw.trim().parse::<i32>().map_err(|_| {
                PutscoutError::config_invalid("analysis", "year", format!("not a year: {raw}"))
            })?),
            None => None,
        },
    };
    let Some(year) = year else {
        return Ok(None);
    };

    let lookback = match lookback {
        Some(l) => l,
        None => {
            let raw = adapter.get_int("analysis", "lookback_years", DEFAULT_LOOKBACK_YEARS as i64);
            u32::try_from(raw).map_err(|_| {
                PutscoutError::config_invalid(
                    "analysis",
                    "lookback_years",
                    "lookback_years must be non-negative",
                )
            })?
        }
    };

    AnalysisWindow::for_year(year, lookback)
        .map(Some)
        .ok_or_else(|| PutscoutError::config_invalid("analysis", "year", "year out of range"))
}

fn data_port(adapter: &dyn ConfigPort) -> CsvAdapter {
    let dir = adapter
        .get_string("data", "directory")
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
    CsvAdapter::new(PathBuf::from(dir))
}

/// Price history for `symbol`, including the warm-up year before `window`.
pub fn load_history(
    data_port: &dyn DataPort,
    symbol: &str,
    window: Option<&AnalysisWindow>,
) -> Result<PriceSeries, PutscoutError> {
    let (start, end) = match window {
        Some(w) => (w.history_start(), w.end),
        None => {
            let (first, last, _) =
                data_port
                    .get_data_range(symbol)?
                    .ok_or_else(|| PutscoutError::DataUnavailable {
                        symbol: symbol.to_string(),
                        reason: "no price history".into(),
                    })?;
            (first, last)
        }
    };
    let points = data_port.fetch_closes(symbol, start, end)?;
    PriceSeries::new(symbol, points)
}

fn resolve_implied_volatility(
    data_port: &dyn DataPort,
    symbol: &str,
    iv_override: Option<f64>,
) -> ImpliedVolatility {
    if iv_override.is_some() {
        return ImpliedVolatility::from_option(iv_override);
    }
    match data_port.fetch_implied_volatility(symbol) {
        Ok(v) => {
            let iv = ImpliedVolatility::from_option(v);
            if iv.is_fallback() {
                warn!(symbol, "no implied volatility estimate, using 0.0");
            }
            iv
        }
        Err(e) => {
            warn!(symbol, "implied volatility unavailable: {e}");
            ImpliedVolatility::Unavailable
        }
    }
}

pub fn print_report(report: &AnalysisReport) {
    println!("=== {} ({} to {}) ===", report.symbol, report.window.start, report.window.end);
    println!("{}", report.outcome.narrative());

    if let Some(bt) = &report.backtest {
        println!("\nBacktest Results:");
        println!("  - Total Profit:   {:.2} USD", bt.total_profit);
        println!("  - Average Profit: {:.2} USD", bt.average_profit);
        println!(
            "  - Trials:         {} ({} expired, {} assigned, {:.1}% assignment rate)",
            bt.sample_count,
            bt.expired_count,
            bt.assigned_count,
            bt.assignment_rate() * 100.0
        );
    }
    if let Some(t) = &report.trendline {
        println!("\nTrendline slope: {:.4} USD/day", t.slope);
    }
}

#[allow(clippy::too_many_arguments)]
fn run_analyze(
    config_path: Option<&Path>,
    symbol_override: Option<&str>,
    year: Option<i32>,
    lookback: Option<u32>,
    iv_override: Option<f64>,
    output: Option<&Path>,
    no_report: bool,
) -> Result<(), PutscoutError> {
    let adapter = load_config(config_path)?;
    let config = build_analysis_config(&adapter)?;

    let symbol = match symbol_override {
        Some(s) => s.trim().to_uppercase(),
        None => adapter
            .get_string("analysis", "symbol")
            .map(|s| s.trim().to_uppercase())
            .ok_or_else(|| PutscoutError::ConfigMissing {
                section: "analysis".into(),
                key: "symbol".into(),
            })?,
    };
    let window = resolve_window(&adapter, year, lookback)?;
    let data_port = data_port(&adapter);

    let history = load_history(&data_port, &symbol, window.as_ref())?;
    info!(symbol = %symbol, bars = history.len(), "price history loaded");
    let iv = resolve_implied_volatility(&data_port, &symbol, iv_override);

    let report = run_analysis(&history, window, iv, &config)?;
    print_report(&report);

    if no_report {
        return Ok(());
    }
    let output_dir = match output {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(
            adapter
                .get_string("report", "output_dir")
                .unwrap_or_else(|| DEFAULT_REPORT_DIR.to_string()),
        ),
    };
    let ctx = ReportContext {
        report: &report,
        generated_at: Local::now().naive_local(),
    };
    let writers: [&dyn ReportPort; 2] = [
        &TextReportAdapter::new(output_dir.clone()),
        &HtmlReportAdapter::new(output_dir),
    ];
    for writer in writers {
        for path in writer.write(&ctx)? {
            println!("Report written to: {}", path.display());
        }
    }
    Ok(())
}

fn fmt_reading(r: Reading, decimals: usize) -> String {
    match r.value() {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

fn run_observe(config_path: Option<&Path>, symbols: Option<&str>) -> Result<(), PutscoutError> {
    let adapter = load_config(config_path)?;
    let config = build_analysis_config(&adapter)?;
    let symbols = match symbols {
        Some(raw) => parse_symbol_list(raw),
        None => adapter.get_list("observer", "symbols"),
    };
    if symbols.is_empty() {
        return Err(PutscoutError::ConfigMissing {
            section: "observer".into(),
            key: "symbols".into(),
        });
    }

    let data_port = data_port(&adapter);
    let cache = MarketCache::load(&data_port, &symbols, &config.indicators);
    if cache.is_empty() {
        return Err(PutscoutError::DataUnavailable {
            symbol: symbols.join(","),
            reason: "no snapshots could be loaded".into(),
        });
    }

    let ma_label = format!("MA{}", config.indicators.ma_long_window);
    println!(
        "{:<8} {:<10} {:>10} {:>8} {:>10} {:>6} {:<10} {:>7} {:>7}",
        "Symbol", "Date", "Close", "Change", ma_label, "RSI", "Signal", "IV", "HV"
    );
    for snap in cache.iter() {
        let change = snap
            .change
            .map(|c| format!("{:+.2}", c))
            .unwrap_or_else(|| "-".to_string());
        let iv = match snap.implied_volatility {
            ImpliedVolatility::Observed(v) => format!("{:.1}%", v * 100.0),
            ImpliedVolatility::Unavailable => "-".to_string(),
        };
        let hv = snap
            .hist_volatility
            .value()
            .map(|v| format!("{:.1}%", v * 100.0))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:<10} {:>10.2} {:>8} {:>10} {:>6} {:<10} {:>7} {:>7}",
            snap.symbol,
            snap.date,
            snap.close,
            change,
            fmt_reading(snap.ma_long, 2),
            fmt_reading(snap.rsi, 1),
            snap.signal,
            iv,
            hv
        );
    }
    info!(shown = cache.len(), requested = symbols.len(), "observer table printed");
    Ok(())
}

fn run_list_symbols(config_path: Option<&Path>) -> Result<(), PutscoutError> {
    let adapter = load_config(config_path)?;
    let symbols = data_port(&adapter).list_symbols()?;
    if symbols.is_empty() {
        warn!("no symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        info!("{} symbols found", symbols.len());
    }
    Ok(())
}

fn run_info(symbol: Option<&str>, config_path: Option<&Path>) -> Result<(), PutscoutError> {
    let adapter = load_config(config_path)?;
    let port = data_port(&adapter);
    let symbols = match symbol {
        Some(s) => vec![s.trim().to_uppercase()],
        None => port.list_symbols()?,
    };

    for symbol in &symbols {
        match port.get_data_range(symbol)? {
            Some((first, last, count)) => {
                println!("{:<8} {} to {} ({} bars)", symbol, first, last, count)
            }
            None => println!("{:<8} no data", symbol),
        }
    }
    Ok(())
}

fn trade_log(adapter: &dyn ConfigPort) -> CsvTradeLogAdapter {
    let dir = adapter
        .get_string("trades", "directory")
        .unwrap_or_else(|| DEFAULT_TRADES_DIR.to_string());
    CsvTradeLogAdapter::new(PathBuf::from(dir))
}

fn run_log_trade(config_path: Option<&Path>, trade: &OptionTrade) -> Result<(), PutscoutError> {
    if NaiveTime::parse_from_str(&trade.time, "%H:%M").is_err() {
        return Err(PutscoutError::TradeLog {
            reason: format!("invalid time '{}', expected HH:MM", trade.time),
        });
    }
    if trade.quantity == 0 || trade.strike_price <= 0.0 || trade.price < 0.0 {
        return Err(PutscoutError::TradeLog {
            reason: "quantity and strike must be positive and price non-negative".into(),
        });
    }
    let adapter = load_config(config_path)?;
    trade_log(&adapter).append(trade)?;
    println!(
        "Logged: {} {} {} {} {:.2} {} @ {:.2}",
        trade.action, trade.quantity, trade.symbol, trade.expiry, trade.strike_price, trade.option_type, trade.price
    );
    Ok(())
}

/// Most recent close for `symbol`, `None` when no data is available.
fn latest_close(port: &dyn DataPort, symbol: &str) -> Option<f64> {
    let (_, last, _) = port.get_data_range(symbol).ok().flatten()?;
    port.fetch_closes(symbol, last, last)
        .ok()?
        .last()
        .map(|p| p.close)
}

fn run_trades(config_path: Option<&Path>, month: TradeMonth) -> Result<(), PutscoutError> {
    let adapter = load_config(config_path)?;
    let trades = trade_log(&adapter).load(month)?;
    if trades.is_empty() {
        println!("No trades logged for {}", month);
        return Ok(());
    }

    let port = data_port(&adapter);
    println!(
        "{:<10} {:<5} {:<8} {:>4} {:<6} {:<10} {:>8} {:<4} {:>7} {:>9} {:<12} Comment",
        "Date", "Time", "Action", "Qty", "Symbol", "Expiry", "Strike", "Type", "Price", "Current", "Status"
    );
    for t in &trades {
        let current = latest_close(&port, &t.symbol);
        let status = TradeStatus::for_price(current, t.strike_price);
        let current_str = current
            .map(|c| format!("{:.2}", c))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10} {:<5} {:<8} {:>4} {:<6} {:<10} {:>8.2} {:<4} {:>7.2} {:>9} {:<12} {}",
            t.date,
            t.time,
            t.action,
            t.quantity,
            t.symbol,
            t.expiry,
            t.strike_price,
            t.option_type,
            t.price,
            current_str,
            status,
            t.comment
        );
    }
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), PutscoutError> {
    let adapter = load_config(Some(config_path))?;
    let config = build_analysis_config(&adapter)?;
    let window = resolve_window(&adapter, None, None)?;

    println!("Config validated successfully");
    let indicators: Vec<String> = config
        .indicators
        .indicator_types()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("  indicators: {}", indicators.join(" "));
    println!("  extrema order: {}", config.extrema_order);
    println!(
        "  strategy: safety margin {}, {} DTE, premium rate {}",
        config.policy.safety_margin, config.policy.days_to_expiry, config.premium_rate
    );
    match window {
        Some(w) => println!("  analysis window: {} to {}", w.start, w.end),
        None => println!("  analysis window: full data range"),
    }
    Ok(())
}
