use chrono::{DateTime, Duration, TimeZone, Utc};

use trigger_flow::engine::Engine;
use trigger_flow::engine::events::EngineEvent;
use trigger_flow::feed::prices;
use trigger_flow::model::{
    ActionConfig, ActionKind, ActionState, Condition, Edge, Exchange, Graph, Node, PositionSide,
    TriggerConfig, TriggerKind, TriggerState,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn trigger(id: &str, asset: &str, condition: Condition, threshold: f64) -> Node {
    Node::trigger(
        id,
        TriggerKind::PriceThreshold,
        TriggerConfig::new(asset, condition, threshold).unwrap(),
    )
}

fn trigger_seen(id: &str, asset: &str, condition: Condition, threshold: f64, last: f64) -> Node {
    trigger(id, asset, condition, threshold).with_trigger_state(TriggerState {
        last_observed_price: Some(last),
        ..Default::default()
    })
}

fn action(id: &str) -> Node {
    Node::action(
        id,
        ActionKind::LongPosition,
        ActionConfig::new(Exchange::Binance, "SOLUSDT", PositionSide::Long, 100.0, 10).unwrap(),
    )
}

fn trigger_state<'a>(engine: &'a Engine, id: &str) -> &'a TriggerState {
    match engine.store().get(id) {
        Some(Node::Trigger { runtime_state, .. }) => runtime_state,
        other => panic!("expected trigger `{id}`, got {other:?}"),
    }
}

fn action_state<'a>(engine: &'a Engine, id: &str) -> &'a ActionState {
    match engine.store().get(id) {
        Some(Node::Action { runtime_state, .. }) => runtime_state,
        other => panic!("expected action `{id}`, got {other:?}"),
    }
}

fn engine(nodes: Vec<Node>, edges: Vec<Edge>) -> Engine {
    Engine::new(Graph::new(nodes, edges)).expect("valid graph")
}

// ── Trigger evaluation ──────────────────────────────────────────────

#[test]
fn crossing_trigger_fires_and_records_price() {
    let mut engine = engine(
        vec![trigger_seen("T1", "SOL", Condition::CrossesAbove, 100.0, 95.0)],
        vec![],
    );
    let mut events = Vec::new();

    let fired = engine.evaluate_tick(&prices([("SOL", 105.0)]), t0(), &mut events);

    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].node_id, "T1");
    assert_eq!(fired[0].price, 105.0);

    let state = trigger_state(&engine, "T1");
    assert_eq!(state.last_observed_price, Some(105.0));
    assert!(state.fired);
    assert_eq!(state.fired_at, Some(t0()));

    assert_eq!(
        events,
        vec![EngineEvent::TriggerFired {
            node_id: "T1".into(),
            asset: "SOL".into(),
            condition: Condition::CrossesAbove,
            threshold: 100.0,
            price_at_fire: 105.0,
            timestamp: t0(),
        }]
    );
}

#[test]
fn crossing_trigger_goes_idle_on_the_next_tick() {
    let mut engine = engine(
        vec![trigger_seen("T1", "SOL", Condition::CrossesAbove, 100.0, 95.0)],
        vec![],
    );
    let mut events = Vec::new();

    engine.evaluate_tick(&prices([("SOL", 105.0)]), t0(), &mut events);
    let fired = engine.evaluate_tick(
        &prices([("SOL", 110.0)]),
        t0() + Duration::seconds(3),
        &mut events,
    );

    assert!(fired.is_empty());
    let state = trigger_state(&engine, "T1");
    assert!(!state.fired);
    assert_eq!(state.last_observed_price, Some(110.0));
    // Last fire time is kept.
    assert_eq!(state.fired_at, Some(t0()));
}

#[test]
fn crossing_compares_against_previous_tick_not_current() {
    let mut engine = engine(
        vec![trigger("T1", "SOL", Condition::CrossesBelow, 100.0)],
        vec![],
    );
    let mut events = Vec::new();

    // First observation: null previous counts as 0, so no downward cross.
    assert!(engine.evaluate_tick(&prices([("SOL", 120.0)]), t0(), &mut events).is_empty());
    // 120 -> 90 crosses below.
    let fired = engine.evaluate_tick(&prices([("SOL", 90.0)]), t0(), &mut events);
    assert_eq!(fired.len(), 1);
    // 90 -> 80 stays below.
    assert!(engine.evaluate_tick(&prices([("SOL", 80.0)]), t0(), &mut events).is_empty());
}

#[test]
fn missing_asset_leaves_state_untouched() {
    let seen = trigger_seen("T1", "SOL", Condition::Above, 100.0, 150.0)
        .with_trigger_state(TriggerState {
            last_observed_price: Some(150.0),
            fired: true,
            fired_at: Some(t0()),
        });
    let mut engine = engine(vec![seen], vec![]);
    let before = trigger_state(&engine, "T1").clone();
    let mut events = Vec::new();

    let fired = engine.evaluate_tick(
        &prices([("BTC", 50_000.0)]),
        t0() + Duration::seconds(3),
        &mut events,
    );

    assert!(fired.is_empty());
    assert!(events.is_empty());
    assert_eq!(trigger_state(&engine, "T1"), &before);
}

#[test]
fn invalid_price_is_isolated_to_its_node() {
    let mut engine = engine(
        vec![
            trigger("bad", "SOL", Condition::Above, 100.0),
            trigger("good", "ETH", Condition::Above, 100.0),
        ],
        vec![],
    );
    let mut events = Vec::new();

    let fired = engine.evaluate_tick(
        &prices([("SOL", f64::NAN), ("ETH", 150.0)]),
        t0(),
        &mut events,
    );

    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].node_id, "good");
    assert_eq!(trigger_state(&engine, "bad"), &TriggerState::default());
    assert!(events.iter().any(|e| matches!(
        e,
        EngineEvent::Error { node_id: Some(id), .. } if id == "bad"
    )));
}

#[test]
fn triggers_do_not_observe_each_other_within_a_tick() {
    let mut engine = engine(
        vec![
            trigger("a", "SOL", Condition::CrossesAbove, 100.0),
            trigger("b", "SOL", Condition::CrossesAbove, 100.0),
        ],
        vec![],
    );
    let mut events = Vec::new();

    let fired = engine.evaluate_tick(&prices([("SOL", 101.0)]), t0(), &mut events);

    let ids: Vec<&str> = fired.iter().map(|f| f.node_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

// ── Dispatch ────────────────────────────────────────────────────────

#[test]
fn fired_trigger_dispatches_its_action_once() {
    let mut engine = engine(
        vec![
            trigger_seen("T1", "SOL", Condition::CrossesAbove, 100.0, 95.0),
            action("A1"),
        ],
        vec![Edge::new("T1", "A1")],
    );
    let mut events = Vec::new();

    let report = engine.tick(&prices([("SOL", 105.0)]), t0(), &mut events);

    assert_eq!(report.executed.len(), 1);
    let record = &report.executed[0];
    assert_eq!(record.action_id, "A1");
    assert_eq!(record.trigger_id, "T1");
    assert_eq!(record.trigger_price, 105.0);
    assert_eq!(record.config.pair, "SOLUSDT");

    assert_eq!(action_state(&engine, "A1"), &ActionState::executed(105.0, t0()));
    assert!(events
        .iter()
        .any(|e| matches!(e, EngineEvent::ActionExecuted { action_id, .. } if action_id == "A1")));
}

#[test]
fn level_trigger_re_executes_every_tick_it_holds() {
    let mut engine = engine(
        vec![trigger("T1", "SOL", Condition::Above, 100.0), action("A1")],
        vec![Edge::new("T1", "A1")],
    );
    let mut events = Vec::new();

    let first = engine.tick(&prices([("SOL", 105.0)]), t0(), &mut events);
    let later = t0() + Duration::seconds(3);
    let second = engine.tick(&prices([("SOL", 107.0)]), later, &mut events);

    assert_eq!(first.executed.len(), 1);
    assert_eq!(second.executed.len(), 1);
    assert_eq!(action_state(&engine, "A1"), &ActionState::executed(107.0, later));
}

#[test]
fn action_reached_from_two_fired_triggers_runs_twice() {
    let mut engine = engine(
        vec![
            trigger("sol", "SOL", Condition::Above, 100.0),
            trigger("eth", "ETH", Condition::Above, 1_000.0),
            action("A1"),
        ],
        vec![Edge::new("sol", "A1"), Edge::new("eth", "A1")],
    );
    let mut events = Vec::new();

    let report = engine.tick(
        &prices([("SOL", 150.0), ("ETH", 2_000.0)]),
        t0(),
        &mut events,
    );

    let prices_seen: Vec<f64> = report.executed.iter().map(|r| r.trigger_price).collect();
    assert_eq!(prices_seen, vec![150.0, 2_000.0]);
    // Last dispatch wins.
    assert_eq!(
        action_state(&engine, "A1").last_trigger_price,
        Some(2_000.0)
    );
}

#[test]
fn dangling_edge_is_skipped_and_siblings_still_dispatch() {
    let mut engine = engine(
        vec![
            trigger("T1", "SOL", Condition::Above, 100.0),
            action("A1"),
            action("A2"),
        ],
        vec![
            Edge::new("T1", "A1"),
            Edge::new("T1", "A2"),
        ],
    );
    engine.store_mut().remove_node("A1");
    // Simulate a stale edge left behind by the editor.
    let mut graph = engine.snapshot();
    graph.edges.insert(0, Edge::new("T1", "A1"));
    let mut engine = Engine::new(graph).unwrap();
    let mut events = Vec::new();

    let report = engine.tick(&prices([("SOL", 120.0)]), t0(), &mut events);

    let executed: Vec<&str> = report.executed.iter().map(|r| r.action_id.as_str()).collect();
    assert_eq!(executed, vec!["A2"]);
    assert!(!events.iter().any(|e| matches!(e, EngineEvent::Error { .. })));
}

#[test]
fn edges_to_non_actions_are_skipped() {
    let mut engine = engine(
        vec![
            trigger("T1", "SOL", Condition::Above, 100.0),
            trigger("T2", "BTC", Condition::Above, 100.0),
            action("A1"),
        ],
        vec![Edge::new("T1", "T2"), Edge::new("T1", "A1")],
    );
    let mut events = Vec::new();

    let report = engine.tick(&prices([("SOL", 120.0)]), t0(), &mut events);

    assert_eq!(report.executed.len(), 1);
    assert_eq!(report.executed[0].action_id, "A1");
    assert_eq!(trigger_state(&engine, "T2"), &TriggerState::default());
}

#[test]
fn dispatch_without_trigger_price_reports_error() {
    let mut engine = engine(
        vec![trigger("T1", "SOL", Condition::Above, 100.0), action("A1")],
        vec![Edge::new("T1", "A1")],
    );
    let mut events = Vec::new();

    let records = engine.dispatch(&["T1".to_string()], |_| None, t0(), &mut events);

    assert!(records.is_empty());
    assert_eq!(action_state(&engine, "A1"), &ActionState::default());
    assert!(matches!(events.as_slice(), [EngineEvent::Error { .. }]));
}

#[test]
fn engine_never_changes_configuration_or_topology() {
    let graph = Graph::new(
        vec![trigger("T1", "SOL", Condition::Above, 100.0), action("A1")],
        vec![Edge::new("T1", "A1")],
    );
    let mut engine = Engine::new(graph.clone()).unwrap();
    let mut events = Vec::new();

    engine.tick(&prices([("SOL", 120.0)]), t0(), &mut events);
    let after = engine.snapshot();

    assert_eq!(after.edges, graph.edges);
    assert_eq!(after.nodes.len(), graph.nodes.len());
    for (old, new) in graph.nodes.iter().zip(&after.nodes) {
        assert_eq!(old.id(), new.id());
        assert_eq!(
            old.with_trigger_state(TriggerState::default())
                .with_action_state(ActionState::default()),
            new.with_trigger_state(TriggerState::default())
                .with_action_state(ActionState::default())
        );
    }
}
