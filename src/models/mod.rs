//! Shared models for the feed.
//!
//! Contains the subgraph wire types (pairs, candles) and the response
//! shapes handed to the charting library (symbols, bar series, config).

pub mod candle;
pub mod feed;
pub mod pair;
mod serde_util;
pub mod symbol;

pub use candle::{Bar, BarSeries, CandleRecord, HistoryResponse};
pub use feed::FeedConfig;
pub use pair::{PairRecord, TokenRef};
pub use symbol::{SymbolRecord, SymbolSummary, normalize_symbol};
