//! Market data access port trait.

use crate::domain::error::PutscoutError;
use crate::domain::price_series::PricePoint;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily closes for `symbol` dated within `[start_date, end_date]`,
    /// sorted by date.
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PricePoint>, PutscoutError>;

    fn list_symbols(&self) -> Result<Vec<String>, PutscoutError>;

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PutscoutError>;

    /// `Ok(None)` when the provider has no estimate for `symbol`.
    fn fetch_implied_volatility(&self, symbol: &str) -> Result<Option<f64>, PutscoutError>;
}
