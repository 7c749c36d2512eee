//! Concrete adapter implementations for ports.

pub mod chart_svg;
pub mod csv_adapter;
pub mod csv_trade_log_adapter;
pub mod file_config_adapter;
pub mod html_report_adapter;
pub mod text_report_adapter;
