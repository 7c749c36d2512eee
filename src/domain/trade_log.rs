//! Option trade journal records.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    #[serde(rename = "SOLD")]
    Sold,
    #[serde(rename = "BOUGHT")]
    Bought,
    #[serde(rename = "REC SOLD")]
    RecSold,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TradeAction::Sold => "SOLD",
            TradeAction::Bought => "BOUGHT",
            TradeAction::RecSold => "REC SOLD",
        })
    }
}

impl FromStr for TradeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('_', " ").as_str() {
            "SOLD" => Ok(TradeAction::Sold),
            "BOUGHT" => Ok(TradeAction::Bought),
            "REC SOLD" => Ok(TradeAction::RecSold),
            other => Err(format!("unknown trade action '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionType {
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "CALL")]
    Call,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OptionType::Put => "PUT",
            OptionType::Call => "CALL",
        })
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PUT" => Ok(OptionType::Put),
            "CALL" => Ok(OptionType::Call),
            other => Err(format!("unknown option type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionTrade {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Action")]
    pub action: TradeAction,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Expiry")]
    pub expiry: NaiveDate,
    #[serde(rename = "Strike Price")]
    pub strike_price: f64,
    #[serde(rename = "Option Type")]
    pub option_type: OptionType,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Comment")]
    pub comment: String,
}

/// Calendar month a trade journal file covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TradeMonth {
    pub year: i32,
    pub month: u32,
}

impl TradeMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for TradeMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl FromStr for TradeMonth {
    type Err = String;

    /// Accepts `YYYYMM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 6 || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("expected YYYYMM, got '{s}'"));
        }
        let year: i32 = s[..4].parse().map_err(|_| format!("invalid year in '{s}'"))?;
        let month: u32 = s[4..].parse().map_err(|_| format!("invalid month in '{s}'"))?;
        if !(1..=12).contains(&month) {
            return Err(format!("month out of range in '{s}'"));
        }
        Ok(Self { year, month })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeStatus {
    AboveStrike,
    BelowStrike,
}

impl TradeStatus {
    /// Without a current price the position is treated as below strike.
    pub fn for_price(current_price: Option<f64>, strike_price: f64) -> Self {
        match current_price {
            Some(p) if p > strike_price => TradeStatus::AboveStrike,
            _ => TradeStatus::BelowStrike,
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TradeStatus::AboveStrike => "above strike",
            TradeStatus::BelowStrike => "below strike",
        })
    }
}
