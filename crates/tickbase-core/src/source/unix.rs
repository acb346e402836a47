use crate::error::ClockError;
use crate::ticks::{Tick, NANOS_PER_SEC};

use super::posix;
use super::ClockSource;

/// `CLOCK_MONOTONIC`, in nanoseconds.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    _probed: (),
}

impl MonotonicClock {
    /// Verifies that `CLOCK_MONOTONIC` can be read.
    pub fn probe() -> Result<Self, ClockError> {
        let clock = Self { _probed: () };
        posix::probe_nanos(clock.name(), libc::CLOCK_MONOTONIC)?;
        Ok(clock)
    }
}

impl ClockSource for MonotonicClock {
    fn name(&self) -> &'static str {
        "clock_monotonic"
    }

    #[inline]
    fn now(&self) -> Tick {
        // Probed at construction; the call cannot start failing afterwards.
        posix::read_nanos(libc::CLOCK_MONOTONIC).unwrap_or(0)
    }

    fn try_now(&self) -> Result<Tick, ClockError> {
        posix::probe_nanos(self.name(), libc::CLOCK_MONOTONIC)
    }

    fn frequency(&self) -> Result<Tick, ClockError> {
        Ok(NANOS_PER_SEC)
    }

    fn system_millis(&self) -> Tick {
        posix::realtime_millis()
    }
}

/// `CLOCK_MONOTONIC_COARSE`: the tick-granular kernel clock.
///
/// Reported in nanoseconds but only advances once per scheduler tick
/// (typically 1-4 ms). Cheap and independent of the clocksource driver, which
/// makes it a usable reference for drift reconciliation.
#[cfg(any(target_os = "linux", target_os = "android"))]
#[derive(Debug, Clone, Copy)]
pub struct CoarseMonotonicClock {
    _probed: (),
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl CoarseMonotonicClock {
    /// Verifies that `CLOCK_MONOTONIC_COARSE` can be read.
    pub fn probe() -> Result<Self, ClockError> {
        let clock = Self { _probed: () };
        posix::probe_nanos(clock.name(), libc::CLOCK_MONOTONIC_COARSE)?;
        Ok(clock)
    }
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl ClockSource for CoarseMonotonicClock {
    fn name(&self) -> &'static str {
        "clock_monotonic_coarse"
    }

    #[inline]
    fn now(&self) -> Tick {
        posix::read_nanos(libc::CLOCK_MONOTONIC_COARSE).unwrap_or(0)
    }

    fn try_now(&self) -> Result<Tick, ClockError> {
        posix::probe_nanos(self.name(), libc::CLOCK_MONOTONIC_COARSE)
    }

    fn frequency(&self) -> Result<Tick, ClockError> {
        Ok(NANOS_PER_SEC)
    }

    fn system_millis(&self) -> Tick {
        posix::realtime_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_probe_succeeds() {
        let clock = MonotonicClock::probe().unwrap();
        assert!(clock.try_now().unwrap() > 0);
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    #[test]
    fn coarse_tracks_fine_clock() {
        let fine = MonotonicClock::probe().unwrap();
        let coarse = CoarseMonotonicClock::probe().unwrap();
        let f = fine.now();
        let c = coarse.now();
        // The coarse clock lags the fine one by at most a few scheduler ticks.
        assert!(f.abs_diff(c) < 100_000_000, "fine {f} coarse {c}");
    }
}
