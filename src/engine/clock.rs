use chrono::{DateTime, Duration, Utc};

/// Source of tick timestamps.
pub trait Clock {
    fn now(&mut self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock that advances a fixed step on every reading.
/// The first reading returns `start`.
#[derive(Debug, Clone)]
pub struct SimClock {
    next: DateTime<Utc>,
    step: Duration,
}

impl SimClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        SimClock { next: start, step }
    }
}

impl Clock for SimClock {
    fn now(&mut self) -> DateTime<Utc> {
        let now = self.next;
        self.next += self.step;
        now
    }
}
