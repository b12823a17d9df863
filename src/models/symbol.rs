//! Symbol metadata served on the `symbols`, `search` and `symbol_info`
//! endpoints.

use serde::{Deserialize, Serialize};

use super::pair::PairRecord;
use crate::resolution::Resolution;

/// Full symbol description as consumed by the charting library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolRecord {
    pub symbol: String,
    pub ticker: String,
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub exchange: String,
    pub listed_exchange: String,
    #[serde(rename = "type")]
    pub tpe: String,
    pub currency_code: String,
    pub session: String,
    pub timezone: String,
    pub minmovement: u32,
    /// Legacy spelling of `minmovement`.
    pub minmov: u32,
    pub minmovement2: u32,
    /// Legacy spelling of `minmovement2`.
    pub minmov2: u32,
    pub pricescale: u64,
    pub supported_resolutions: Vec<String>,
    pub has_intraday: bool,
    pub has_daily: bool,
    pub has_weekly_and_monthly: bool,
    /// Upstream id of the base token.
    pub token0: String,
    /// Upstream id of the quote token.
    pub token1: String,
}

impl SymbolRecord {
    /// Builds the record for one upstream pair listed on `exchange`.
    ///
    /// Every display name is the concatenated token symbols; the quote
    /// token's symbol is the currency.
    pub fn from_pair(pair: &PairRecord, exchange: &str) -> Self {
        let symbol = pair.symbol();
        Self {
            ticker: symbol.clone(),
            name: symbol.clone(),
            full_name: symbol.clone(),
            description: symbol.clone(),
            symbol,
            exchange: exchange.to_string(),
            listed_exchange: exchange.to_string(),
            tpe: "crypto".to_string(),
            currency_code: pair.token1.symbol.clone(),
            session: "24x7".to_string(),
            timezone: "UTC".to_string(),
            minmovement: 1,
            minmov: 1,
            minmovement2: 0,
            minmov2: 0,
            pricescale: 1,
            supported_resolutions: Resolution::supported_codes(),
            has_intraday: true,
            has_daily: true,
            has_weekly_and_monthly: true,
            token0: pair.token0.id.clone(),
            token1: pair.token1.id.clone(),
        }
    }

    /// The subset of fields returned by symbol search.
    pub fn summary(&self) -> SymbolSummary {
        SymbolSummary {
            symbol: self.symbol.clone(),
            full_name: self.full_name.clone(),
            description: self.description.clone(),
            exchange: self.exchange.clone(),
            ticker: self.ticker.clone(),
            tpe: self.tpe.clone(),
        }
    }
}

/// One symbol search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSummary {
    pub symbol: String,
    pub full_name: String,
    pub description: String,
    pub exchange: String,
    pub ticker: String,
    #[serde(rename = "type")]
    pub tpe: String,
}

/// Normalizes user input to a catalog key.
///
/// Drops any `EXCHANGE:` qualifier (everything up to the last `:`) and
/// upper-cases the remainder.
pub fn normalize_symbol(input: &str) -> String {
    input
        .rsplit(':')
        .next()
        .unwrap_or(input)
        .to_uppercase()
}
