//! Symbol catalog lifecycle tests: lazy load, single-flight sharing,
//! snapshot atomicity, retry and timer behavior.

mod common;

use std::time::Duration;

use udf_feed::UdfError;
use udf_feed::catalog::{CatalogState, SymbolCatalog};
use udf_feed::config::CatalogConfig;

use common::{Fault, FaultyPairs, ScriptedPairs, fast_catalog_config, pair, wait_until};

const EXCHANGE: &str = "MOONBASEALPHA";

#[tokio::test]
async fn test_first_read_loads_catalog_lazily() {
    let pairs = ScriptedPairs::fixed(vec![pair("A", "B")]);
    let catalog = SymbolCatalog::new(pairs.clone(), EXCHANGE, fast_catalog_config());

    assert_eq!(catalog.status().state, CatalogState::Empty);
    assert!(catalog.is_known_symbol("ab").await);
    assert_eq!(pairs.calls(), 1);

    let status = catalog.status();
    assert_eq!(status.state, CatalogState::Ready);
    assert_eq!(status.symbols, 1);
    assert!(status.age.is_some());

    // A ready catalog answers without fetching again.
    assert!(!catalog.is_known_symbol("XY").await);
    assert_eq!(pairs.calls(), 1);
}

#[tokio::test]
async fn test_concurrent_readers_share_one_fetch() {
    let pairs = ScriptedPairs::gated(vec![Ok(vec![pair("A", "B"), pair("C", "D")])]);
    let catalog = SymbolCatalog::new(pairs.clone(), EXCHANGE, fast_catalog_config());

    let (ab, cd, missing, _) = tokio::join!(
        catalog.is_known_symbol("AB"),
        catalog.is_known_symbol("CD"),
        catalog.is_known_symbol("EF"),
        async {
            assert!(wait_until(|| pairs.calls() == 1).await);
            assert_eq!(catalog.status().state, CatalogState::Loading);
            pairs.release(1);
        }
    );

    assert!(ab);
    assert!(cd);
    assert!(!missing);
    assert_eq!(pairs.calls(), 1);
}

#[tokio::test]
async fn test_readers_never_observe_partial_snapshot() {
    let pairs = ScriptedPairs::gated(vec![
        Ok(vec![pair("A", "B")]),
        Ok(vec![pair("A", "B"), pair("C", "D")]),
    ]);
    let catalog = SymbolCatalog::new(pairs.clone(), EXCHANGE, fast_catalog_config());

    pairs.release(1);
    catalog.refresh().await;
    assert_eq!(catalog.current().len(), 1);

    let refresher = {
        let catalog = catalog.clone();
        tokio::spawn(async move { catalog.refresh().await })
    };
    assert!(wait_until(|| pairs.calls() == 2).await);

    // Mid-refresh the published snapshot is still the old, complete one.
    let during = catalog.current();
    assert_eq!(during.len(), 1);
    assert!(during.contains("AB"));
    assert_eq!(catalog.status().state, CatalogState::Loading);

    // A reader arriving mid-refresh waits and sees the new snapshot.
    let (knows_cd, _) = tokio::join!(catalog.is_known_symbol("CD"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        pairs.release(1);
    });
    assert!(knows_cd);
    refresher.await.unwrap();

    let after = catalog.current();
    assert_eq!(after.len(), 2);
    assert!(after.contains("AB") && after.contains("CD"));
    // The snapshot taken earlier is untouched by the swap.
    assert_eq!(during.len(), 1);
    assert_eq!(pairs.calls(), 2);
}

#[tokio::test]
async fn test_concurrent_refreshes_join_in_flight_fetch() {
    let pairs = ScriptedPairs::gated(vec![Ok(vec![pair("A", "B")])]);
    let catalog = SymbolCatalog::new(pairs.clone(), EXCHANGE, fast_catalog_config());

    tokio::join!(catalog.refresh(), catalog.refresh(), async {
        assert!(wait_until(|| pairs.calls() == 1).await);
        pairs.release(1);
    });

    assert_eq!(pairs.calls(), 1);
    assert_eq!(catalog.status().state, CatalogState::Ready);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_snapshot() {
    let pairs = ScriptedPairs::new(vec![
        Ok(vec![pair("A", "B")]),
        Err("indexer unavailable".into()),
    ]);
    let catalog = SymbolCatalog::new(pairs.clone(), EXCHANGE, fast_catalog_config());

    catalog.refresh().await;
    catalog.stop();
    catalog.refresh().await;

    let status = catalog.status();
    assert_eq!(status.state, CatalogState::Ready);
    assert_eq!(status.consecutive_failures, 1);
    assert!(catalog.is_known_symbol("AB").await);
    assert_eq!(pairs.calls(), 2);
}

#[tokio::test]
async fn test_failed_refresh_schedules_retry() {
    let pairs = ScriptedPairs::new(vec![
        Err("indexer unavailable".into()),
        Ok(vec![pair("A", "B")]),
    ]);
    let catalog = SymbolCatalog::new(pairs.clone(), EXCHANGE, fast_catalog_config());

    catalog.refresh().await;
    assert_eq!(catalog.status().state, CatalogState::Empty);
    assert_eq!(catalog.status().consecutive_failures, 1);

    assert!(wait_until(|| catalog.status().state == CatalogState::Ready).await);
    assert_eq!(pairs.calls(), 2);
    assert_eq!(catalog.status().consecutive_failures, 0);
    assert!(catalog.is_known_symbol("AB").await);
    catalog.stop();
}

#[tokio::test]
async fn test_never_loaded_catalog_reads_as_empty() {
    let pairs = ScriptedPairs::new(vec![Err("indexer unavailable".into())]);
    let catalog = SymbolCatalog::new(pairs.clone(), EXCHANGE, fast_catalog_config());

    assert!(!catalog.is_known_symbol("AB").await);
    assert!(catalog.all_symbols().await.is_empty());
    assert!(matches!(
        catalog.resolve_symbol("AB").await,
        Err(UdfError::SymbolNotFound(_))
    ));
    catalog.stop();
}

#[tokio::test]
async fn test_stop_cancels_pending_retry() {
    let pairs = ScriptedPairs::new(vec![Err("indexer unavailable".into())]);
    let catalog = SymbolCatalog::new(pairs.clone(), EXCHANGE, fast_catalog_config());

    catalog.refresh().await;
    catalog.stop();
    let calls = pairs.calls();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(pairs.calls(), calls);
}

#[tokio::test]
async fn test_start_refreshes_on_a_timer_until_stopped() {
    let pairs = ScriptedPairs::fixed(vec![pair("A", "B")]);
    let catalog = SymbolCatalog::new(pairs.clone(), EXCHANGE, fast_catalog_config());

    catalog.start();
    catalog.start();
    assert!(wait_until(|| pairs.calls() >= 3).await);

    catalog.stop();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let calls = pairs.calls();
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(pairs.calls(), calls);
    assert!(catalog.is_known_symbol("AB").await);
}

#[tokio::test]
async fn test_hung_fetch_times_out_and_timer_keeps_refreshing() {
    let pairs = FaultyPairs::new(Fault::Hang, vec![pair("A", "B")]);
    let config = CatalogConfig {
        fetch_timeout: Duration::from_millis(60),
        ..fast_catalog_config()
    };
    let catalog = SymbolCatalog::new(pairs.clone(), EXCHANGE, config);

    catalog.start();
    assert!(wait_until(|| catalog.status().state == CatalogState::Ready).await);
    assert!(pairs.calls() >= 2);
    assert_eq!(catalog.status().symbols, 1);
    assert_eq!(catalog.status().consecutive_failures, 0);
    catalog.stop();
}

#[tokio::test]
async fn test_panicking_fetch_counts_as_failure_and_retries() {
    let pairs = FaultyPairs::new(Fault::Panic, vec![pair("A", "B")]);
    let catalog = SymbolCatalog::new(pairs.clone(), EXCHANGE, fast_catalog_config());

    catalog.start();
    assert!(wait_until(|| catalog.status().state == CatalogState::Ready).await);
    assert!(pairs.calls() >= 2);
    assert!(catalog.is_known_symbol("AB").await);
    catalog.stop();
}

#[tokio::test]
async fn test_awaited_panicking_refresh_returns_and_schedules_retry() {
    let pairs = FaultyPairs::new(Fault::Panic, vec![pair("A", "B")]);
    let catalog = SymbolCatalog::new(pairs.clone(), EXCHANGE, fast_catalog_config());

    catalog.refresh().await;
    let status = catalog.status();
    assert_eq!(status.state, CatalogState::Empty);
    assert_eq!(status.consecutive_failures, 1);

    assert!(wait_until(|| catalog.status().state == CatalogState::Ready).await);
    assert_eq!(pairs.calls(), 2);
    catalog.stop();
}

#[tokio::test]
async fn test_resolve_accepts_bare_and_qualified_symbols() {
    let pairs = ScriptedPairs::fixed(vec![pair("AB", "C")]);
    let catalog = SymbolCatalog::new(pairs, EXCHANGE, fast_catalog_config());

    let bare = catalog.resolve_symbol("abc").await.unwrap();
    let qualified = catalog.resolve_symbol("EXCHANGE:abc").await.unwrap();
    assert_eq!(bare.symbol, "ABC");
    assert_eq!(bare, qualified);
    assert_eq!(bare.token0, "0xab");
    assert_eq!(bare.token1, "0xc");

    match catalog.resolve_symbol("AB").await {
        Err(UdfError::SymbolNotFound(s)) => assert_eq!(s, "AB"),
        other => panic!("expected SymbolNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_search_returns_first_match_in_catalog_order() {
    let pairs = ScriptedPairs::fixed(vec![pair("A", "BC"), pair("X", "AB"), pair("X", "YZ")]);
    let catalog = SymbolCatalog::new(pairs, EXCHANGE, fast_catalog_config());

    let hits = catalog.search_symbols("AB", None, None, Some(1)).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].symbol, "ABC");
    assert_eq!(hits[0].exchange, EXCHANGE);
    assert_eq!(hits[0].tpe, "crypto");

    let all = catalog.search_symbols("ab", None, None, None).await;
    let symbols: Vec<_> = all.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["ABC", "XAB"]);
}

#[tokio::test]
async fn test_all_symbols_preserve_upstream_order() {
    let pairs = ScriptedPairs::fixed(vec![pair("X", "YZ"), pair("A", "BC")]);
    let catalog = SymbolCatalog::new(pairs, EXCHANGE, fast_catalog_config());

    let symbols: Vec<_> = catalog
        .all_symbols()
        .await
        .into_iter()
        .map(|s| s.symbol)
        .collect();
    assert_eq!(symbols, vec!["XYZ", "ABC"]);
}
