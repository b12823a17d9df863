//! Historical bar retrieval.
//!
//! [`BarFetcher`] validates a history request against the symbol catalog
//! and the resolution table, then reads one page of candles from the
//! candle index and reshapes it into a [`HistoryResponse`].

use std::sync::Arc;

use tracing::info;

use crate::catalog::SymbolCatalog;
use crate::config::VolumePolicy;
use crate::graph::{CANDLE_PAGE_SIZE, CandleQuery, CandleSource};
use crate::models::{BarSeries, HistoryResponse, normalize_symbol};
use crate::resolution::period_seconds;
use crate::{Result, UdfError};

/// Produces OHLCV series for catalog symbols.
#[derive(Clone)]
pub struct BarFetcher {
    catalog: SymbolCatalog,
    candles: Arc<dyn CandleSource>,
    volume_policy: VolumePolicy,
}

impl BarFetcher {
    pub fn new(
        catalog: SymbolCatalog,
        candles: Arc<dyn CandleSource>,
        volume_policy: VolumePolicy,
    ) -> Self {
        Self {
            catalog,
            candles,
            volume_policy,
        }
    }

    /// Returns the bars of `symbol` whose start lies in `[from, to]`.
    ///
    /// At most [`CANDLE_PAGE_SIZE`] bars are returned; clients page by
    /// narrowing the range. A range without candles yields
    /// [`HistoryResponse::NoData`].
    ///
    /// # Errors
    ///
    /// - [`UdfError::SymbolNotFound`] if the symbol is not in the catalog
    /// - [`UdfError::InvalidResolution`] if `resolution` is unknown
    ///
    /// Both are raised before any candle request. Upstream failures of the
    /// candle request are returned as-is.
    pub async fn history(
        &self,
        symbol: &str,
        from: i64,
        to: i64,
        resolution: &str,
    ) -> Result<HistoryResponse> {
        let normalized = normalize_symbol(symbol);
        if !self.catalog.is_known_symbol(&normalized).await {
            return Err(UdfError::SymbolNotFound(normalized));
        }
        let period = period_seconds(resolution)?;
        let record = self.catalog.resolve_symbol(&normalized).await?;

        let query = CandleQuery {
            from,
            to,
            period,
            token0: record.token0,
            token1: record.token1,
            first: CANDLE_PAGE_SIZE,
        };
        info!(symbol = %normalized, period, from, to, "Candle request sent");
        let candles = self.candles.fetch_candles(&query).await?;
        info!(symbol = %normalized, candles = candles.len(), "Candle response received");

        let series: BarSeries = candles
            .iter()
            .map(|candle| candle.to_bar(self.volume_policy))
            .collect();
        Ok(HistoryResponse::from_series(series))
    }
}
