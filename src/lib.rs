//! Universal Data Feed adapter over a subgraph candle index.
//!
//! Serves the charting library's data feed queries (config, symbol info,
//! symbol resolve, search and history) from two upstream GraphQL indexes:
//! a pair index that feeds a periodically refreshed symbol catalog, and a
//! candle index that supplies OHLC buckets per token pair.

pub mod catalog;
pub mod config;
pub mod error;
pub mod feed;
pub mod graph;
pub mod history;
pub mod models;
pub mod resolution;

pub use error::{Result, UdfError};
pub use feed::Feed;
