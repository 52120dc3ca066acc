use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::engine::clock::Clock;
use crate::engine::events::EventSink;
use crate::engine::{Engine, TickReport};
use crate::feed::PriceFeed;

/// Requests a driver to stop. The request is honored between ticks only;
/// a tick already running always completes.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        if !self.is_requested() {
            self.notify.notified().await;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Requested,
    TickLimit,
    FeedExhausted,
}

/// Totals over a whole run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub triggers_fired: usize,
    pub actions_executed: usize,
    pub stop_reason: StopReason,
}

/// Drives an engine from a price feed on a fixed interval.
///
/// Ticks never overlap: each one pulls a batch from the feed, evaluates,
/// dispatches and persists synchronously before the next is admitted.
pub struct Driver<F, C, S> {
    engine: Engine,
    feed: F,
    clock: C,
    sink: S,
    interval: Duration,
    max_ticks: Option<u64>,
    state_file: Option<PathBuf>,
    stop: StopHandle,
}

impl<F, C, S> Driver<F, C, S>
where
    F: PriceFeed,
    C: Clock,
    S: EventSink,
{
    pub fn new(engine: Engine, feed: F, clock: C, sink: S, interval: Duration) -> Self {
        Driver {
            engine,
            feed,
            clock,
            sink,
            interval,
            max_ticks: None,
            state_file: None,
            stop: StopHandle::new(),
        }
    }

    pub fn with_max_ticks(mut self, max_ticks: Option<u64>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Persist the snapshot to `path` after every tick.
    pub fn with_state_file(mut self, path: Option<PathBuf>) -> Self {
        self.state_file = path;
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    /// Run a single tick now. Returns `None` when the feed is exhausted.
    pub fn step(&mut self) -> Result<Option<TickReport>> {
        let Some(prices) = self.feed.next_tick() else {
            return Ok(None);
        };
        let now = self.clock.now();
        let report = self.engine.tick(&prices, now, &mut self.sink);

        debug!(
            fired = report.fired.len(),
            executed = report.executed.len(),
            "tick at {}",
            now.format("%H:%M:%S")
        );

        if let Some(path) = &self.state_file {
            self.engine
                .snapshot()
                .save(path)
                .with_context(|| format!("writing snapshot to {}", path.display()))?;
        }

        Ok(Some(report))
    }

    /// Tick on the interval until stopped, the tick limit is reached or the
    /// feed runs dry.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut ticks = 0u64;
        let mut triggers_fired = 0usize;
        let mut actions_executed = 0usize;

        let stop_reason = loop {
            if self.max_ticks.is_some_and(|max| ticks >= max) {
                break StopReason::TickLimit;
            }

            tokio::select! {
                biased;
                _ = self.stop.wait() => break StopReason::Requested,
                _ = interval.tick() => {}
            }
            if self.stop.is_requested() {
                break StopReason::Requested;
            }

            match self.step()? {
                Some(report) => {
                    ticks += 1;
                    triggers_fired += report.fired.len();
                    actions_executed += report.executed.len();
                }
                None => break StopReason::FeedExhausted,
            }
        };

        info!(ticks, triggers_fired, actions_executed, "driver stopped: {stop_reason:?}");

        Ok(RunSummary {
            ticks,
            triggers_fired,
            actions_executed,
            stop_reason,
        })
    }
}
