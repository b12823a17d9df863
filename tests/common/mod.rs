//! Shared test utilities: scripted upstream sources and polling helpers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use udf_feed::config::CatalogConfig;
use udf_feed::graph::{CandleQuery, CandleSource, PairSource};
use udf_feed::models::{CandleRecord, PairRecord, TokenRef};
use udf_feed::{Result, UdfError};

/// Builds a pair whose token ids are derived from the token symbols.
pub fn pair(base: &str, quote: &str) -> PairRecord {
    PairRecord::new(
        TokenRef::new(format!("0x{}", base.to_lowercase()), base),
        TokenRef::new(format!("0x{}", quote.to_lowercase()), quote),
    )
}

/// Fast catalog timings for tests.
pub fn fast_catalog_config() -> CatalogConfig {
    CatalogConfig {
        refresh_interval: Duration::from_millis(40),
        retry_delay: Duration::from_millis(20),
        fetch_timeout: Duration::from_secs(1),
    }
}

/// Polls `cond` every few milliseconds until it holds or a second passes.
pub async fn wait_until<F: Fn() -> bool>(cond: F) -> bool {
    tokio::time::timeout(Duration::from_secs(1), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .is_ok()
}

/// Pair source replaying a script of responses.
///
/// Each fetch consumes the next step; the last step repeats forever. When
/// gated, every fetch waits for a permit released with [`release`].
///
/// [`release`]: ScriptedPairs::release
pub struct ScriptedPairs {
    script: Mutex<VecDeque<std::result::Result<Vec<PairRecord>, String>>>,
    calls: AtomicUsize,
    gate: Option<Semaphore>,
}

impl ScriptedPairs {
    pub fn new(script: Vec<std::result::Result<Vec<PairRecord>, String>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            gate: None,
        })
    }

    pub fn gated(script: Vec<std::result::Result<Vec<PairRecord>, String>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            gate: Some(Semaphore::new(0)),
        })
    }

    /// Always returns the same pairs.
    pub fn fixed(pairs: Vec<PairRecord>) -> Arc<Self> {
        Self::new(vec![Ok(pairs)])
    }

    /// Lets `n` gated fetches proceed.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    /// Number of fetches started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_step(&self) -> std::result::Result<Vec<PairRecord>, String> {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}

#[async_trait]
impl PairSource for ScriptedPairs {
    async fn fetch_pairs(&self) -> Result<Vec<PairRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.next_step().map_err(UdfError::Upstream)
    }
}

/// How the first fetch of a [`FaultyPairs`] misbehaves.
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    /// Never completes.
    Hang,
    /// Panics inside the fetch.
    Panic,
}

/// Pair source whose first fetch hangs or panics; later fetches return
/// `pairs`.
pub struct FaultyPairs {
    fault: Fault,
    pairs: Vec<PairRecord>,
    calls: AtomicUsize,
}

impl FaultyPairs {
    pub fn new(fault: Fault, pairs: Vec<PairRecord>) -> Arc<Self> {
        Arc::new(Self {
            fault,
            pairs,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PairSource for FaultyPairs {
    async fn fetch_pairs(&self) -> Result<Vec<PairRecord>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            match self.fault {
                Fault::Hang => std::future::pending::<()>().await,
                Fault::Panic => panic!("pair index returned garbage"),
            }
        }
        Ok(self.pairs.clone())
    }
}

/// Candle source returning a fixed response and recording every query.
pub struct RecordingCandles {
    response: std::result::Result<Vec<CandleRecord>, String>,
    queries: Mutex<Vec<CandleQuery>>,
}

impl RecordingCandles {
    pub fn returning(candles: Vec<CandleRecord>) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(candles),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(message.to_string()),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn queries(&self) -> Vec<CandleQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl CandleSource for RecordingCandles {
    async fn fetch_candles(&self, query: &CandleQuery) -> Result<Vec<CandleRecord>> {
        self.queries.lock().unwrap().push(query.clone());
        self.response.clone().map_err(UdfError::Upstream)
    }
}

/// Decodes candles from their subgraph JSON form.
pub fn candles_from_json(json: serde_json::Value) -> Vec<CandleRecord> {
    serde_json::from_value(json).expect("valid candle fixture")
}
