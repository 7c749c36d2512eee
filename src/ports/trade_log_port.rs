//! Option trade journal port trait.

use crate::domain::error::PutscoutError;
use crate::domain::trade_log::{OptionTrade, TradeMonth};

pub trait TradeLogPort {
    fn append(&self, trade: &OptionTrade) -> Result<(), PutscoutError>;

    /// Trades recorded for `month`; empty when nothing was logged.
    fn load(&self, month: TradeMonth) -> Result<Vec<OptionTrade>, PutscoutError>;
}
