use std::sync::OnceLock;
use std::time::Instant;

use crate::error::ClockError;
use crate::ticks::{Tick, NANOS_PER_SEC};

use super::ClockSource;

static ANCHOR: OnceLock<Instant> = OnceLock::new();

/// `std::time::Instant` measured from a process-wide anchor, in nanoseconds.
///
/// Used on targets without a dedicated native path.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    anchor: Instant,
}

impl StdClock {
    pub fn probe() -> Result<Self, ClockError> {
        Ok(Self { anchor: *ANCHOR.get_or_init(Instant::now) })
    }
}

impl ClockSource for StdClock {
    fn name(&self) -> &'static str {
        "std_instant"
    }

    #[inline]
    fn now(&self) -> Tick {
        self.anchor.elapsed().as_nanos().min(Tick::MAX as u128) as Tick
    }

    fn frequency(&self) -> Result<Tick, ClockError> {
        Ok(NANOS_PER_SEC)
    }
}
