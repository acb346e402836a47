use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::ClockError;
use crate::ticks::{duration_to_ticks, Tick};

use super::ClockSource;

/// Manually driven clock for deterministic tests.
///
/// Clones share the same counter, so a test can hand one clone to a timer and
/// keep another to move time forward (or backward).
#[derive(Debug, Clone)]
pub struct ManualClock {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    ticks: AtomicU64,
    system_millis: AtomicU64,
    frequency: Tick,
}

impl ManualClock {
    /// Creates a clock at tick zero running at `frequency` ticks/second.
    ///
    /// A zero frequency makes the clock fail its capability probe, which is
    /// how tests exercise [`ClockError::ClockUnavailable`].
    pub fn new(frequency: Tick) -> Self {
        Self {
            shared: Arc::new(Shared {
                ticks: AtomicU64::new(0),
                system_millis: AtomicU64::new(0),
                frequency,
            }),
        }
    }

    /// Creates a clock whose probe always fails.
    pub fn unavailable() -> Self {
        Self::new(0)
    }

    pub fn set(&self, ticks: Tick) {
        self.shared.ticks.store(ticks, Ordering::Relaxed);
    }

    /// Moves the counter forward by `ticks`, wrapping at `Tick::MAX` like a
    /// fixed-width hardware counter.
    pub fn advance(&self, ticks: Tick) {
        let _ = self
            .shared
            .ticks
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |t| Some(t.wrapping_add(ticks)));
    }

    /// Moves the counter forward by `duration` converted at this clock's frequency.
    pub fn advance_by(&self, duration: Duration) {
        self.advance(duration_to_ticks(duration, self.shared.frequency));
    }

    /// Moves the counter backward, simulating a misbehaving counter.
    pub fn rewind(&self, ticks: Tick) {
        let _ = self
            .shared
            .ticks
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |t| Some(t.wrapping_sub(ticks)));
    }

    pub fn set_system_millis(&self, millis: Tick) {
        self.shared.system_millis.store(millis, Ordering::Relaxed);
    }
}

impl ClockSource for ManualClock {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn now(&self) -> Tick {
        self.shared.ticks.load(Ordering::Relaxed)
    }

    fn frequency(&self) -> Result<Tick, ClockError> {
        match self.shared.frequency {
            0 => Err(ClockError::unavailable(self.name(), "no frequency configured")),
            f => Ok(f),
        }
    }

    fn system_millis(&self) -> Tick {
        self.shared.system_millis.load(Ordering::Relaxed)
    }
}
