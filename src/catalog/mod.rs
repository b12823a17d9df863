//! Periodically refreshed symbol catalog.
//!
//! [`SymbolCatalog`] mirrors the upstream pair index. Each refresh builds a
//! complete [`Snapshot`] off to the side and publishes it by swapping an
//! `Arc`, so readers only ever see whole snapshots. While a refresh is in
//! flight every caller (reader or writer) awaits the same shared handle
//! instead of issuing another upstream fetch.
//!
//! Failed refreshes keep the previous snapshot visible and schedule a
//! single retry after [`CatalogConfig::retry_delay`]. A fetch that panics
//! or outlives [`CatalogConfig::fetch_timeout`] counts as a failed refresh.

mod snapshot;
mod table;

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::CatalogConfig;
use crate::graph::PairSource;
use crate::models::{PairRecord, SymbolRecord, SymbolSummary, normalize_symbol};
use crate::{Result, UdfError};

pub use snapshot::Snapshot;
pub use table::{SymbolTable, to_table};

/// Handle to an in-flight refresh, shared by everyone waiting on it.
type PendingRefresh = Shared<BoxFuture<'static, ()>>;

/// Lifecycle state of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    /// No snapshot has been published and nothing is loading.
    Empty,
    /// A refresh is in flight; the previous snapshot, if any, stays visible.
    Loading,
    /// A snapshot is published and no refresh is in flight.
    Ready,
}

/// Point-in-time health report for the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStatus {
    pub state: CatalogState,
    /// Number of symbols in the current snapshot.
    pub symbols: usize,
    /// Time since the current snapshot was published.
    pub age: Option<Duration>,
    /// Failed refreshes since the last successful one.
    pub consecutive_failures: u32,
}

/// Shared handle to the symbol catalog. Clones refer to the same catalog.
#[derive(Clone)]
pub struct SymbolCatalog {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn PairSource>,
    exchange: String,
    config: CatalogConfig,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    current: Option<Arc<Snapshot>>,
    pending: Option<PendingRefresh>,
    fetch: Option<AbortHandle>,
    /// Bumped by every refresh and by `stop`; results from an older
    /// generation are discarded.
    generation: u64,
    timer: Option<JoinHandle<()>>,
    retry: Option<JoinHandle<()>>,
    retry_pending: bool,
    stopped: bool,
    published_at: Option<Instant>,
    consecutive_failures: u32,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SymbolCatalog {
    /// Creates an empty catalog. Nothing is fetched until [`start`] is
    /// called or a reader needs a snapshot.
    ///
    /// [`start`]: SymbolCatalog::start
    pub fn new(
        source: Arc<dyn PairSource>,
        exchange: impl Into<String>,
        config: CatalogConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                exchange: exchange.into(),
                config,
                state: Mutex::new(State::default()),
            }),
        }
    }

    fn from_weak(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Starts the periodic refresh task. The first refresh fires
    /// immediately. Calling `start` on a running catalog does nothing.
    pub fn start(&self) {
        let mut state = self.inner.lock();
        if state.timer.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }
        state.stopped = false;

        let period = self.inner.config.refresh_interval;
        let weak = Arc::downgrade(&self.inner);
        state.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(catalog) = Self::from_weak(&weak) else {
                    break;
                };
                drop(catalog.trigger_refresh());
            }
        }));
        info!(
            interval_secs = period.as_secs_f64(),
            "Symbol catalog refresh loop started"
        );
    }

    /// Stops the refresh loop, cancels any pending retry and in-flight
    /// fetch. The current snapshot stays readable.
    pub fn stop(&self) {
        let mut state = self.inner.lock();
        state.stopped = true;
        state.generation += 1;
        for handle in [state.timer.take(), state.retry.take()].into_iter().flatten() {
            handle.abort();
        }
        if let Some(fetch) = state.fetch.take() {
            fetch.abort();
        }
        state.pending = None;
        state.retry_pending = false;
        info!("Symbol catalog stopped");
    }

    /// Refreshes the catalog from upstream and waits for the outcome.
    ///
    /// Joins the in-flight refresh if there is one. Never fails: errors are
    /// logged and turned into a scheduled retry.
    pub async fn refresh(&self) {
        self.trigger_refresh().await;
    }

    /// Starts a refresh unless one is already in flight and returns the
    /// shared handle to it. The fetch runs on its own task and settles
    /// there, so dropping the handle neither cancels nor stalls it.
    fn trigger_refresh(&self) -> PendingRefresh {
        let mut state = self.inner.lock();
        if let Some(pending) = &state.pending {
            return pending.clone();
        }

        state.generation += 1;
        let generation = state.generation;
        debug!(generation, "Refreshing symbol catalog");

        let catalog = self.clone();
        let limit = self.inner.config.fetch_timeout;
        let handle = tokio::spawn(async move {
            let fetch = AssertUnwindSafe(catalog.inner.source.fetch_pairs()).catch_unwind();
            let outcome = match tokio::time::timeout(limit, fetch).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(_)) => Err(UdfError::Upstream("pair fetch panicked".to_string())),
                Err(_) => Err(UdfError::Upstream(format!(
                    "pair fetch timed out after {}s",
                    limit.as_secs_f64()
                ))),
            };
            catalog.settle(generation, outcome);
        });
        state.fetch = Some(handle.abort_handle());

        // The task settles on its own; waiters only need its completion.
        let pending = async move {
            let _ = handle.await;
        }
        .boxed()
        .shared();
        state.pending = Some(pending.clone());
        pending
    }

    /// Publishes the outcome of the refresh started as `generation`.
    fn settle(&self, generation: u64, outcome: Result<Vec<PairRecord>>) {
        let outcome = outcome.map(|pairs| Snapshot::from_pairs(&pairs, &self.inner.exchange));

        let mut state = self.inner.lock();
        if state.generation != generation {
            debug!(generation, "Discarding outcome of superseded refresh");
            return;
        }
        state.pending = None;
        state.fetch = None;

        match outcome {
            Ok(snapshot) => {
                info!(symbols = snapshot.len(), "Symbol catalog refreshed");
                state.current = Some(Arc::new(snapshot));
                state.published_at = Some(Instant::now());
                state.consecutive_failures = 0;
            }
            Err(e) => {
                state.consecutive_failures += 1;
                error!(
                    failures = state.consecutive_failures,
                    "Symbol catalog refresh failed: {e}"
                );
                self.schedule_retry(&mut state);
            }
        }
    }

    /// Arms the retry slot unless the catalog is stopped or a retry is
    /// already waiting.
    fn schedule_retry(&self, state: &mut State) {
        if state.stopped || state.retry_pending {
            return;
        }
        state.retry_pending = true;

        let delay = self.inner.config.retry_delay;
        let weak = Arc::downgrade(&self.inner);
        warn!(
            retry_secs = delay.as_secs_f64(),
            "Scheduling symbol catalog retry"
        );
        state.retry = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(catalog) = Self::from_weak(&weak) else {
                return;
            };
            catalog.inner.lock().retry_pending = false;
            drop(catalog.trigger_refresh());
        }));
    }

    /// Returns the latest complete snapshot.
    ///
    /// Waits for an in-flight refresh to settle first. If nothing has been
    /// loaded yet, triggers a refresh and waits for it. When no fetch has
    /// ever succeeded the snapshot is empty.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        let pending = {
            let state = self.inner.lock();
            match (&state.pending, &state.current) {
                (Some(pending), _) => Some(pending.clone()),
                (None, Some(current)) => return Arc::clone(current),
                (None, None) => None,
            }
        };
        pending.unwrap_or_else(|| self.trigger_refresh()).await;
        self.current()
    }

    /// The published snapshot without waiting for any refresh.
    pub fn current(&self) -> Arc<Snapshot> {
        self.inner.lock().current.clone().unwrap_or_default()
    }

    /// Current lifecycle state, size and staleness.
    pub fn status(&self) -> CatalogStatus {
        let state = self.inner.lock();
        let lifecycle = match (&state.pending, &state.current) {
            (Some(_), _) => CatalogState::Loading,
            (None, Some(_)) => CatalogState::Ready,
            (None, None) => CatalogState::Empty,
        };
        CatalogStatus {
            state: lifecycle,
            symbols: state.current.as_ref().map_or(0, |s| s.len()),
            age: state.published_at.map(|at| at.elapsed()),
            consecutive_failures: state.consecutive_failures,
        }
    }

    /// Returns `true` if the normalized `symbol` is listed.
    pub async fn is_known_symbol(&self, symbol: &str) -> bool {
        self.snapshot().await.contains(&normalize_symbol(symbol))
    }

    /// Resolves a bare (`"FOOBAR"`) or exchange-qualified
    /// (`"EXCHANGE:foobar"`) symbol to its record.
    ///
    /// # Errors
    ///
    /// Returns [`UdfError::SymbolNotFound`] if there is no exact match.
    pub async fn resolve_symbol(&self, input: &str) -> Result<SymbolRecord> {
        let symbol = normalize_symbol(input);
        self.snapshot()
            .await
            .get(&symbol)
            .cloned()
            .ok_or(UdfError::SymbolNotFound(symbol))
    }

    /// Searches the catalog; see [`Snapshot::search`].
    pub async fn search_symbols(
        &self,
        query: &str,
        tpe: Option<&str>,
        exchange: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<SymbolSummary> {
        self.snapshot().await.search(query, tpe, exchange, limit)
    }

    /// Every symbol record in catalog order.
    pub async fn all_symbols(&self) -> Vec<SymbolRecord> {
        self.snapshot().await.symbols().to_vec()
    }

    /// The whole catalog in response-as-a-table form.
    ///
    /// # Errors
    ///
    /// Returns [`UdfError::Json`] if a record cannot be serialized.
    pub async fn symbol_table(&self) -> Result<SymbolTable> {
        Ok(to_table(self.snapshot().await.symbols())?)
    }
}
