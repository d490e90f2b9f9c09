//! Crisis cycle: feed gating, candidate selection, persistence.

use std::sync::Arc;

use alloy_primitives::{B256, U256};
use async_trait::async_trait;

use ghostline::adapter::outbound::agent::StaticStrategyEngine;
use ghostline::adapter::outbound::store::{JsonDispatchStore, MemoryDispatchStore};
use ghostline::application::{CrisisCycle, CycleOutcome};
use ghostline::domain::DispatchRecord;
use ghostline::error::{Error, Result, Stage, UpstreamError};
use ghostline::port::{DispatchStore, FeedSource, StrategyEngine};
use ghostline::testkit::domain::{bridge_params, context};
use ghostline::testkit::feed::{crisis_feed, idle_feed, ScriptedEngine, StaticFeed};
use ghostline::testkit::harness::{test_retry, DispatchHarness};

const AMOUNT: u64 = 10_000;

struct FailingStore;

#[async_trait]
impl DispatchStore for FailingStore {
    async fn save(&self, _record: &DispatchRecord) -> Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
    }

    async fn load(&self) -> Result<Option<DispatchRecord>> {
        Ok(None)
    }
}

fn cycle(
    harness: &DispatchHarness,
    feed: Arc<dyn FeedSource>,
    engine: Arc<dyn StrategyEngine>,
    store: Arc<dyn DispatchStore>,
) -> CrisisCycle {
    CrisisCycle::new(
        feed,
        engine,
        Arc::new(harness.dispatcher()),
        store,
        context(),
        test_retry(),
    )
}

fn armed_engine() -> Arc<StaticStrategyEngine> {
    Arc::new(StaticStrategyEngine::new(Some(bridge_params(AMOUNT))))
}

#[tokio::test]
async fn idle_feed_does_nothing() {
    let harness = DispatchHarness::new(U256::from(AMOUNT));
    let engine = Arc::new(ScriptedEngine::new(
        StaticStrategyEngine::new(Some(bridge_params(AMOUNT))).plan(&crisis_feed()),
    ));
    let store = Arc::new(MemoryDispatchStore::new());

    let outcome = cycle(
        &harness,
        Arc::new(StaticFeed::new(idle_feed())),
        engine.clone(),
        store.clone(),
    )
    .run_once()
    .await
    .unwrap();

    match outcome {
        CycleOutcome::Idle { timestamp } => assert_eq!(timestamp, "2025-01-01T00:00:00Z"),
        other => panic!("expected idle, got {other:?}"),
    }
    assert_eq!(engine.count(), 0);
    assert!(harness.log.calls().is_empty());
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn crisis_without_bridge_params_is_skipped() {
    let harness = DispatchHarness::new(U256::from(AMOUNT));

    let outcome = cycle(
        &harness,
        Arc::new(StaticFeed::new(crisis_feed())),
        Arc::new(StaticStrategyEngine::new(None)),
        Arc::new(MemoryDispatchStore::new()),
    )
    .run_once()
    .await
    .unwrap();

    match outcome {
        CycleOutcome::Skipped { incident, reason } => {
            assert_eq!(incident, "CURVE-EXPLOIT-001");
            assert!(reason.contains("CRV"), "reason: {reason}");
        }
        other => panic!("expected skipped, got {other:?}"),
    }
    assert!(harness.log.calls().is_empty());
}

#[tokio::test]
async fn crisis_dispatches_top_candidate_and_persists_record() {
    let harness = DispatchHarness::new(U256::from(AMOUNT));
    let store = Arc::new(MemoryDispatchStore::new());

    let outcome = cycle(
        &harness,
        Arc::new(StaticFeed::new(crisis_feed())),
        armed_engine(),
        store.clone(),
    )
    .run_once()
    .await
    .unwrap();

    let result = match outcome {
        CycleOutcome::Dispatched {
            incident,
            action,
            result,
        } => {
            assert_eq!(incident, "CURVE-EXPLOIT-001");
            assert_eq!(action, "BUY CRV");
            result
        }
        other => panic!("expected dispatch, got {other:?}"),
    };

    let record = store.load().await.unwrap().unwrap();
    assert_eq!(record.incident, "CURVE-EXPLOIT-001");
    assert_eq!(record.tx_hash, Some(B256::repeat_byte(0xee)));
    assert_eq!(record.strategy_hash, result.strategy_hash);
    assert_eq!(record.amount_ld, U256::from(9_994));
    assert_eq!(record.buffered_fee, U256::from(120));
    assert_eq!(harness.submitter.count(), 1);
}

#[tokio::test]
async fn transient_feed_failure_is_retried() {
    let harness = DispatchHarness::new(U256::from(AMOUNT));
    let feed = Arc::new(StaticFeed::new(idle_feed()).with_results(vec![Err(
        UpstreamError::FeedStatus { status: 503 }.into(),
    )]));

    let outcome = cycle(
        &harness,
        feed.clone(),
        armed_engine(),
        Arc::new(MemoryDispatchStore::new()),
    )
    .run_once()
    .await
    .unwrap();

    assert!(matches!(outcome, CycleOutcome::Idle { .. }));
    assert_eq!(feed.count(), 2);
}

#[tokio::test]
async fn persistent_feed_failure_fails_the_cycle() {
    let harness = DispatchHarness::new(U256::from(AMOUNT));
    let down = || -> Result<_> {
        Err(UpstreamError::Unavailable {
            stage: Stage::Feed,
            reason: "connection refused".into(),
        }
        .into())
    };
    let feed = Arc::new(StaticFeed::new(idle_feed()).with_results(vec![down(), down(), down()]));
    let engine = Arc::new(ScriptedEngine::new(
        StaticStrategyEngine::new(None).plan(&crisis_feed()),
    ));

    let err = cycle(
        &harness,
        feed.clone(),
        engine.clone(),
        Arc::new(MemoryDispatchStore::new()),
    )
    .run_once()
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Upstream(UpstreamError::Unavailable { .. })));
    assert_eq!(feed.count(), 3);
    assert_eq!(engine.count(), 0);
}

#[tokio::test]
async fn store_failure_does_not_fail_a_confirmed_dispatch() {
    let harness = DispatchHarness::new(U256::from(AMOUNT));

    let outcome = cycle(
        &harness,
        Arc::new(StaticFeed::new(crisis_feed())),
        armed_engine(),
        Arc::new(FailingStore),
    )
    .run_once()
    .await
    .unwrap();

    assert!(matches!(outcome, CycleOutcome::Dispatched { .. }));
    assert_eq!(harness.submitter.count(), 1);
}

#[tokio::test]
async fn dry_run_cycle_records_without_tx_hash() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("last_dispatch.json");
    let mut harness = DispatchHarness::new(U256::ZERO);
    harness.settings.dry_run = true;

    cycle(
        &harness,
        Arc::new(StaticFeed::new(crisis_feed())),
        armed_engine(),
        Arc::new(JsonDispatchStore::new(&path)),
    )
    .run_once()
    .await
    .unwrap();

    let record = JsonDispatchStore::new(&path).load().await.unwrap().unwrap();
    assert!(record.is_dry_run());
    assert_eq!(harness.submitter.count(), 0);
    assert_eq!(harness.log.count("approve"), 0);
}

#[tokio::test]
async fn scheduled_dispatches_never_share_a_salt() {
    let harness = DispatchHarness::new(U256::from(AMOUNT));
    let mut ctx = context();
    ctx.salt = Some(B256::repeat_byte(0x12));

    let cycle = CrisisCycle::new(
        Arc::new(StaticFeed::new(crisis_feed())),
        armed_engine(),
        Arc::new(harness.dispatcher()),
        Arc::new(MemoryDispatchStore::new()),
        ctx,
        test_retry(),
    );
    cycle.run_once().await.unwrap();
    cycle.run_once().await.unwrap();

    let salts: Vec<B256> = harness
        .submitter
        .submissions()
        .iter()
        .map(|s| s.body.payload.strategy_salt)
        .collect();
    assert_eq!(salts.len(), 2);
    assert_ne!(salts[0], salts[1]);
    assert!(salts.iter().all(|salt| *salt != B256::repeat_byte(0x12)));
}
