use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::mpsc;

use trigger_flow::engine::Engine;
use trigger_flow::engine::clock::SimClock;
use trigger_flow::engine::events::EngineEvent;
use trigger_flow::feed::{PriceFeed, RandomWalkFeed, ScriptedFeed, prices};
use trigger_flow::model::{
    ActionConfig, ActionKind, Condition, Edge, Exchange, Graph, Node, PositionSide, TriggerConfig,
    TriggerKind,
};
use trigger_flow::run::driver::{Driver, StopReason};

// ── Helpers ─────────────────────────────────────────────────────────

const INTERVAL: Duration = Duration::from_secs(3);

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
}

fn clock() -> SimClock {
    SimClock::new(t0(), chrono::Duration::seconds(3))
}

fn engine() -> Engine {
    Engine::new(Graph::new(
        vec![
            Node::trigger(
                "T1",
                TriggerKind::PriceThreshold,
                TriggerConfig::new("SOL", Condition::CrossesAbove, 100.0).unwrap(),
            ),
            Node::action(
                "A1",
                ActionKind::LongPosition,
                ActionConfig::new(Exchange::Binance, "SOLUSDT", PositionSide::Long, 100.0, 10)
                    .unwrap(),
            ),
        ],
        vec![Edge::new("T1", "A1")],
    ))
    .unwrap()
}

/// 95 -> 105 fires, 105 holds, 98 resets, 101 fires again.
fn script() -> ScriptedFeed {
    ScriptedFeed::new([95.0, 105.0, 105.0, 98.0, 101.0].map(|p| prices([("SOL", p)])))
}

// ── Driver ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn runs_until_feed_is_exhausted() {
    let mut events = Vec::new();
    let mut driver = Driver::new(engine(), script(), clock(), &mut events, INTERVAL);

    let summary = driver.run().await.unwrap();

    assert_eq!(summary.stop_reason, StopReason::FeedExhausted);
    assert_eq!(summary.ticks, 5);
    assert_eq!(summary.triggers_fired, 2);
    assert_eq!(summary.actions_executed, 2);

    let engine = driver.into_engine();
    match engine.store().get("A1").unwrap() {
        Node::Action { runtime_state, .. } => {
            assert_eq!(runtime_state.last_trigger_price, Some(101.0));
            assert_eq!(
                runtime_state.last_executed_at,
                Some(t0() + chrono::Duration::seconds(12))
            );
        }
        other => panic!("expected action, got {other:?}"),
    }

    let fired_at: Vec<DateTime<Utc>> = events
        .iter()
        .filter_map(|e| match e {
            EngineEvent::TriggerFired { timestamp, .. } => Some(*timestamp),
            _ => None,
        })
        .collect();
    assert_eq!(
        fired_at,
        vec![
            t0() + chrono::Duration::seconds(3),
            t0() + chrono::Duration::seconds(12)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn stops_at_the_tick_limit() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut driver =
        Driver::new(engine(), script(), clock(), tx, INTERVAL).with_max_ticks(Some(2));

    let summary = driver.run().await.unwrap();

    assert_eq!(summary.stop_reason, StopReason::TickLimit);
    assert_eq!(summary.ticks, 2);

    let mut kinds = Vec::new();
    while let Ok(event) = rx.try_recv() {
        kinds.push(match event {
            EngineEvent::TriggerFired { .. } => "fired",
            EngineEvent::ActionExecuted { .. } => "executed",
            EngineEvent::Error { .. } => "error",
        });
    }
    assert_eq!(kinds, vec!["fired", "executed"]);
}

#[tokio::test(start_paused = true)]
async fn stop_before_start_runs_no_ticks() {
    let mut events = Vec::new();
    let mut driver = Driver::new(engine(), script(), clock(), &mut events, INTERVAL);
    driver.stop_handle().stop();

    let summary = driver.run().await.unwrap();

    assert_eq!(summary.stop_reason, StopReason::Requested);
    assert_eq!(summary.ticks, 0);
    drop(driver);
    assert!(events.is_empty());
}

#[tokio::test(start_paused = true)]
async fn stop_is_honored_between_ticks() {
    let mut events = Vec::new();
    let mut driver = Driver::new(engine(), script(), clock(), &mut events, INTERVAL);
    let stop = driver.stop_handle();

    let (summary, ()) = tokio::join!(driver.run(), async move {
        // Ticks land at 0s and 3s; the next one would be at 6s.
        tokio::time::sleep(Duration::from_secs(4)).await;
        stop.stop();
    });

    let summary = summary.unwrap();
    assert_eq!(summary.stop_reason, StopReason::Requested);
    assert_eq!(summary.ticks, 2);
}

#[tokio::test(start_paused = true)]
async fn state_file_tracks_every_tick() {
    let path = std::env::temp_dir().join(format!(
        "trigger-flow-driver-{}.json",
        std::process::id()
    ));
    let mut events = Vec::new();
    let mut driver = Driver::new(engine(), script(), clock(), &mut events, INTERVAL)
        .with_max_ticks(Some(2))
        .with_state_file(Some(path.clone()));

    driver.run().await.unwrap();
    let saved = Graph::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(saved, driver.engine().snapshot());
    match saved.node("T1").unwrap() {
        Node::Trigger { runtime_state, .. } => {
            assert_eq!(runtime_state.last_observed_price, Some(105.0));
            assert!(runtime_state.fired);
        }
        other => panic!("expected trigger, got {other:?}"),
    }
}

#[test]
fn step_returns_none_when_feed_is_dry() {
    let mut events = Vec::new();
    let mut driver = Driver::new(
        engine(),
        ScriptedFeed::new([prices([("SOL", 120.0)])]),
        clock(),
        &mut events,
        INTERVAL,
    );

    let report = driver.step().unwrap().unwrap();
    assert_eq!(report.fired.len(), 1);
    assert!(driver.step().unwrap().is_none());
}

// ── Feeds ───────────────────────────────────────────────────────────

#[test]
fn random_walk_is_reproducible_from_its_seed() {
    let symbols = || ["SOL", "BTC"].map(String::from);
    let mut a = RandomWalkFeed::new(symbols(), 42);
    let mut b = RandomWalkFeed::new(symbols(), 42);

    for _ in 0..50 {
        assert_eq!(a.next_tick(), b.next_tick());
    }
}

#[test]
fn random_walk_stays_bounded() {
    let mut feed = RandomWalkFeed::new(["DOGE".to_string()], 7);
    let mut previous: Option<f64> = None;

    for _ in 0..500 {
        let tick = feed.next_tick().unwrap();
        let price = tick["DOGE"];
        assert!(price.is_finite() && price >= 0.0);
        match previous {
            Some(p) => assert!((price - p).abs() <= 5.0),
            None => assert!(price < 205.0),
        }
        previous = Some(price);
    }
}
