//! Upstream subgraph access.
//!
//! The feed reads from two GraphQL indexes: a pair index listing every
//! tradable token pair and a candle index holding time-bucketed OHLC data.
//! Both are reached through the [`PairSource`] and [`CandleSource`] traits
//! so the catalog and bar fetcher can be driven by in-memory sources.
//!
//! - [`client`] - reqwest-backed GraphQL client implementing both traits
//! - [`query`] - query documents sent to the indexes

pub mod client;
pub mod query;

use async_trait::async_trait;

use crate::Result;
use crate::models::{CandleRecord, PairRecord};

pub use client::GraphClient;

/// Maximum number of candles returned by one upstream call.
pub const CANDLE_PAGE_SIZE: usize = 1000;

/// Source of the pair listing the symbol catalog is built from.
#[async_trait]
pub trait PairSource: Send + Sync {
    /// Fetches every pair currently listed.
    async fn fetch_pairs(&self) -> Result<Vec<PairRecord>>;
}

/// Source of aggregated candles for one token pair.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Fetches candles matching `query`, ascending by time, at most
    /// `query.first` of them.
    async fn fetch_candles(&self, query: &CandleQuery) -> Result<Vec<CandleRecord>>;
}

/// Filter for one page of candles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandleQuery {
    /// Inclusive lower bound on bucket start, unix seconds.
    pub from: i64,
    /// Inclusive upper bound on bucket start, unix seconds.
    pub to: i64,
    /// Exact bucket length in seconds.
    pub period: u64,
    /// Upstream id of the base token.
    pub token0: String,
    /// Upstream id of the quote token.
    pub token1: String,
    /// Page size.
    pub first: usize,
}
