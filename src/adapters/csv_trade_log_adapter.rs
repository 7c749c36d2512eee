//! Monthly CSV option trade journal.
//!
//! One file per month, `option_log_YYYYMM.csv`. The header row is written
//! when a file is created and never again.

use crate::domain::error::PutscoutError;
use crate::domain::trade_log::{OptionTrade, TradeMonth};
use crate::ports::trade_log_port::TradeLogPort;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use tracing::info;

pub struct CsvTradeLogAdapter {
    directory: PathBuf,
}

impl CsvTradeLogAdapter {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    pub fn file_path(&self, month: TradeMonth) -> PathBuf {
        self.directory.join(format!("option_log_{}.csv", month))
    }
}

fn trade_log_error(reason: impl std::fmt::Display) -> PutscoutError {
    PutscoutError::TradeLog {
        reason: reason.to_string(),
    }
}

impl TradeLogPort for CsvTradeLogAdapter {
    fn append(&self, trade: &OptionTrade) -> Result<(), PutscoutError> {
        fs::create_dir_all(&self.directory)?;
        let path = self.file_path(TradeMonth::of(trade.date));
        let is_new = !path.exists();

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer.serialize(trade).map_err(trade_log_error)?;
        writer.flush()?;

        info!(path = %path.display(), symbol = %trade.symbol, action = %trade.action, "trade logged");
        Ok(())
    }

    fn load(&self, month: TradeMonth) -> Result<Vec<OptionTrade>, PutscoutError> {
        let path = self.file_path(month);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(trade_log_error)?;

        rdr.deserialize()
            .map(|row| {
                row.map_err(|e| trade_log_error(format!("{}: {}", path.display(), e)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade_log::{OptionType, TradeAction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn trade(day: u32, action: TradeAction, strike: f64) -> OptionTrade {
        OptionTrade {
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            time: "10:30".to_string(),
            action,
            quantity: 2,
            symbol: "IWM".to_string(),
            expiry: NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
            strike_price: strike,
            option_type: OptionType::Put,
            price: 1.85,
            comment: "support at 190, rolled".to_string(),
        }
    }

    #[test]
    fn header_written_once_and_trades_reload() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvTradeLogAdapter::new(dir.path().join("trades"));

        let first = trade(2, TradeAction::Sold, 185.0);
        let second = trade(9, TradeAction::RecSold, 180.5);
        adapter.append(&first).unwrap();
        adapter.append(&second).unwrap();

        let path = adapter.file_path(TradeMonth { year: 2024, month: 5 });
        assert!(path.ends_with("option_log_202405.csv"));
        let content = fs::read_to_string(&path).unwrap();
        let header =
            "Date,Time,Action,Quantity,Symbol,Expiry,Strike Price,Option Type,Price,Comment";
        assert_eq!(content.matches(header).count(), 1);
        assert!(content.starts_with(header));
        assert!(content.contains("REC SOLD"));

        let loaded = adapter.load(TradeMonth { year: 2024, month: 5 }).unwrap();
        assert_eq!(loaded, vec![first, second]);
    }

    #[test]
    fn trades_split_by_month() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvTradeLogAdapter::new(dir.path().to_path_buf());
        let mut june = trade(3, TradeAction::Bought, 170.0);
        june.date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        adapter.append(&trade(3, TradeAction::Sold, 175.0)).unwrap();
        adapter.append(&june).unwrap();

        assert_eq!(adapter.load(TradeMonth { year: 2024, month: 5 }).unwrap().len(), 1);
        assert_eq!(adapter.load(TradeMonth { year: 2024, month: 6 }).unwrap(), vec![june]);
    }

    #[test]
    fn missing_month_is_empty() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvTradeLogAdapter::new(dir.path().to_path_buf());
        assert!(adapter.load(TradeMonth { year: 1999, month: 1 }).unwrap().is_empty());
    }

    #[test]
    fn malformed_row_is_trade_log_error() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvTradeLogAdapter::new(dir.path().to_path_buf());
        fs::write(
            adapter.file_path(TradeMonth { year: 2024, month: 1 }),
            "Date,Time,Action,Quantity,Symbol,Expiry,Strike Price,Option Type,Price,Comment\n\
             2024-01-05,09:45,HOLD,1,IWM,2024-02-16,180,PUT,1.2,\n",
        )
        .unwrap();
        let err = adapter.load(TradeMonth { year: 2024, month: 1 }).unwrap_err();
        assert!(matches!(err, PutscoutError::TradeLog { .. }));
    }
}
