//! Universal Data Feed facade.
//!
//! [`Feed`] answers the four query kinds of the charting library's data
//! feed protocol (config, symbols, search, history) on top of the symbol
//! catalog and the bar fetcher. Translating results and errors into HTTP
//! responses is left to the caller.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::Result;
use crate::catalog::{CatalogStatus, SymbolCatalog, SymbolTable};
use crate::config::{AppConfig, CatalogConfig, FeedSettings};
use crate::graph::{CandleSource, GraphClient, PairSource};
use crate::history::BarFetcher;
use crate::models::{FeedConfig, HistoryResponse, SymbolRecord, SymbolSummary};

/// Data feed over a pair index and a candle index.
#[derive(Clone)]
pub struct Feed {
    settings: FeedSettings,
    catalog: SymbolCatalog,
    bars: BarFetcher,
}

impl Feed {
    /// Builds a feed reading from the GraphQL endpoints in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`UdfError::Http`](crate::UdfError::Http) if an HTTP client
    /// cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let timeout = config.upstream.request_timeout;
        let pairs = GraphClient::new(&config.upstream.pair_graph_url, timeout)?;
        let candles = GraphClient::new(&config.upstream.candle_graph_url, timeout)?;
        Ok(Self::new(
            config.feed.clone(),
            config.catalog.clone(),
            Arc::new(pairs),
            Arc::new(candles),
        ))
    }

    /// Builds a feed over arbitrary pair and candle sources.
    pub fn new(
        settings: FeedSettings,
        catalog_config: CatalogConfig,
        pairs: Arc<dyn PairSource>,
        candles: Arc<dyn CandleSource>,
    ) -> Self {
        let catalog = SymbolCatalog::new(pairs, settings.exchange.clone(), catalog_config);
        let bars = BarFetcher::new(catalog.clone(), candles, settings.volume_policy);
        Self {
            settings,
            catalog,
            bars,
        }
    }

    /// Starts the periodic catalog refresh.
    pub fn start(&self) {
        self.catalog.start();
    }

    /// Stops the periodic catalog refresh.
    pub fn stop(&self) {
        self.catalog.stop();
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn catalog_status(&self) -> CatalogStatus {
        self.catalog.status()
    }

    /// Feed capabilities.
    pub fn config(&self) -> FeedConfig {
        FeedConfig::new(&self.settings)
    }

    /// Server time in unix seconds.
    pub fn time(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs())
    }

    /// Every symbol in response-as-a-table form.
    pub async fn symbol_info(&self) -> Result<SymbolTable> {
        self.catalog.symbol_table().await
    }

    /// Resolves one symbol.
    pub async fn symbol(&self, input: &str) -> Result<SymbolRecord> {
        self.catalog.resolve_symbol(input).await
    }

    /// Symbol search.
    pub async fn search(
        &self,
        query: &str,
        tpe: Option<&str>,
        exchange: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<SymbolSummary> {
        self.catalog
            .search_symbols(query, tpe, exchange, limit)
            .await
    }

    /// Bars for `symbol` in `[from, to]` at `resolution`.
    pub async fn history(
        &self,
        symbol: &str,
        from: i64,
        to: i64,
        resolution: &str,
    ) -> Result<HistoryResponse> {
        self.bars.history(symbol, from, to, resolution).await
    }

    /// Returns `true` if `symbol` is listed in the catalog.
    pub async fn is_known_symbol(&self, symbol: &str) -> bool {
        self.catalog.is_known_symbol(symbol).await
    }
}
