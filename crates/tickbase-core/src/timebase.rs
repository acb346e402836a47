use std::time::Duration;

use crate::error::ClockError;
use crate::source::ClockSource;
use crate::ticks::{tick_delta, ticks_to_duration, DeltaTime, Tick};

/// A probed clock source with its frequency resolved.
///
/// Construction runs the capability probe once; afterwards the frequency and
/// its reciprocal are fixed, so every conversion is a single multiplication.
/// `TimeBase` is immutable and can be shared freely between threads when the
/// source is `Sync`.
#[derive(Debug, Clone)]
pub struct TimeBase<C> {
    source: C,
    frequency: Tick,
    inverse_frequency: DeltaTime,
}

impl<C: ClockSource> TimeBase<C> {
    /// Probes `source`: reads its frequency and one checked sample.
    ///
    /// A zero frequency is reported as unavailable, since every later
    /// conversion would divide by it.
    pub fn new(source: C) -> Result<Self, ClockError> {
        let frequency = source.frequency()?;
        if frequency == 0 {
            return Err(ClockError::unavailable(source.name(), "reported zero frequency"));
        }
        source.try_now()?;

        log::debug!("clock '{}' resolved at {frequency} ticks/s", source.name());

        Ok(Self {
            source,
            frequency,
            inverse_frequency: 1.0 / frequency as DeltaTime,
        })
    }

    #[inline]
    pub fn now(&self) -> Tick {
        self.source.now()
    }

    #[inline]
    pub fn ticks_per_second(&self) -> Tick {
        self.frequency
    }

    /// Seconds per tick.
    #[inline]
    pub fn inverse_frequency(&self) -> DeltaTime {
        self.inverse_frequency
    }

    /// Ticks elapsed since `since`, wraparound-safe.
    #[inline]
    pub fn elapsed_ticks(&self, since: Tick) -> Tick {
        tick_delta(self.source.now(), since)
    }

    #[inline]
    pub fn ticks_to_seconds(&self, delta: Tick) -> DeltaTime {
        delta as DeltaTime * self.inverse_frequency
    }

    #[inline]
    pub fn elapsed_seconds(&self, since: Tick) -> DeltaTime {
        self.ticks_to_seconds(self.elapsed_ticks(since))
    }

    /// Exact conversion to `Duration`, without the floating-point step.
    pub fn ticks_to_duration(&self, delta: Tick) -> Duration {
        ticks_to_duration(delta, self.frequency)
    }

    pub fn system_time_millis(&self) -> Tick {
        self.source.system_millis()
    }

    pub fn source(&self) -> &C {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ManualClock;

    fn base(freq: Tick) -> (TimeBase<ManualClock>, ManualClock) {
        let clock = ManualClock::new(freq);
        (TimeBase::new(clock.clone()).unwrap(), clock)
    }

    #[test]
    fn probe_rejects_unavailable_source() {
        let err = TimeBase::new(ManualClock::unavailable()).unwrap_err();
        assert!(matches!(err, ClockError::ClockUnavailable { .. }));
    }

    #[test]
    fn inverse_is_reciprocal() {
        let (tb, _) = base(3_579_545);
        assert_eq!(tb.ticks_per_second(), 3_579_545);
        assert!((tb.inverse_frequency() * 3_579_545.0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn one_second_of_ticks_is_one_second() {
        let (tb, _) = base(10_000_000);
        assert!((tb.ticks_to_seconds(tb.ticks_per_second()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn elapsed_follows_source() {
        let (tb, clock) = base(1_000_000);
        clock.set(5_000);
        let start = tb.now();
        clock.advance(250_000);
        assert_eq!(tb.elapsed_ticks(start), 250_000);
        assert!((tb.elapsed_seconds(start) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn elapsed_across_counter_wrap() {
        let (tb, clock) = base(1_000);
        clock.set(Tick::MAX - 9);
        let start = tb.now();
        clock.advance(20);
        assert_eq!(tb.elapsed_ticks(start), 20);
    }

    #[test]
    fn duration_conversion() {
        let (tb, _) = base(1_000);
        assert_eq!(tb.ticks_to_duration(1_500), Duration::from_millis(1_500));
    }

    #[test]
    fn epoch_readout_comes_from_source() {
        let (tb, clock) = base(1_000);
        clock.set_system_millis(1_234);
        assert_eq!(tb.system_time_millis(), 1_234);
    }
}
