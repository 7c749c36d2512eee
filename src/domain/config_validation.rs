//! Configuration validation.
//!
//! Validates the tunable sections before any analysis runs. Absent keys fall
//! back to their defaults and are therefore always valid.

use crate::domain::backtest::DEFAULT_PREMIUM_RATE;
use crate::domain::error::PutscoutError;
use crate::domain::extrema::DEFAULT_ORDER;
use crate::domain::indicator::frame::IndicatorConfig;
use crate::domain::recommendation::{DEFAULT_DAYS_TO_EXPIRY, DEFAULT_SAFETY_MARGIN};
use crate::ports::config_port::ConfigPort;

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), PutscoutError> {
    let defaults = IndicatorConfig::default();
    validate_window(config, "ma_short_window", defaults.ma_short_window, 1)?;
    validate_window(config, "ma_long_window", defaults.ma_long_window, 1)?;
    validate_window(config, "rsi_window", defaults.rsi_window, 1)?;
    validate_window(config, "bollinger_window", defaults.bollinger_window, 2)?;
    validate_window(config, "volatility_window", defaults.volatility_window, 2)?;

    let multiplier = config.get_double(
        "indicators",
        "bollinger_multiplier",
        defaults.bollinger_multiplier,
    );
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(PutscoutError::config_invalid(
            "indicators",
            "bollinger_multiplier",
            "bollinger_multiplier must be non-negative",
        ));
    }

    bounded_int::<u32>(
        config,
        "indicators",
        "annualization",
        defaults.annualization.into(),
        1,
    )?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), PutscoutError> {
    validate_extrema_order(config)?;
    validate_safety_margin(config)?;
    validate_days_to_expiry(config)?;
    validate_premium_rate(config)?;
    Ok(())
}

/// Integer setting that is at least `min` and fits in `T`. Absent or
/// non-numeric values fall back to `default`.
pub fn bounded_int<T: TryFrom<i64>>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
    min: i64,
) -> Result<T, PutscoutError> {
    let value = config.get_int(section, key, default);
    if value < min {
        return Err(PutscoutError::config_invalid(
            section,
            key,
            format!("{key} must be at least {min}"),
        ));
    }
    T::try_from(value).map_err(|_| {
        PutscoutError::config_invalid(section, key, format!("{key} is out of range: {value}"))
    })
}

fn validate_window(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
    min: i64,
) -> Result<(), PutscoutError> {
    bounded_int::<usize>(config, "indicators", key, default as i64, min)?;
    Ok(())
}

fn validate_extrema_order(config: &dyn ConfigPort) -> Result<(), PutscoutError> {
    bounded_int::<usize>(config, "extrema", "order", DEFAULT_ORDER as i64, 1)?;
    Ok(())
}

fn validate_safety_margin(config: &dyn ConfigPort) -> Result<(), PutscoutError> {
    let value = config.get_double("strategy", "safety_margin", DEFAULT_SAFETY_MARGIN);
    if !(value > 0.0 && value <= 1.0) {
        return Err(PutscoutError::config_invalid(
            "strategy",
            "safety_margin",
            "safety_margin must be in (0, 1]",
        ));
    }
    Ok(())
}

fn validate_days_to_expiry(config: &dyn ConfigPort) -> Result<(), PutscoutError> {
    bounded_int::<usize>(
        config,
        "strategy",
        "days_to_expiry",
        DEFAULT_DAYS_TO_EXPIRY as i64,
        1,
    )?;
    Ok(())
}

fn validate_premium_rate(config: &dyn ConfigPort) -> Result<(), PutscoutError> {
    let value = config.get_double("strategy", "premium_rate", DEFAULT_PREMIUM_RATE);
    if !value.is_finite() || value < 0.0 {
        return Err(PutscoutError::config_invalid(
            "strategy",
            "premium_rate",
            "premium_rate must be non-negative",
        ));
    }
    Ok(())
}
