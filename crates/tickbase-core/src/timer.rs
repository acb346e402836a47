use crate::error::ClockError;
use crate::source::ClockSource;
use crate::ticks::{tick_delta, DeltaTime, Tick};
use crate::timebase::TimeBase;

/// Common surface of the per-instance timers.
///
/// A timer holds a baseline sample. Elapsed queries measure from the baseline
/// and, when `reset` is set, move the baseline to the sample just taken.
pub trait ElapsedTimer {
    /// Moves the baseline to now.
    fn reset(&mut self);

    /// Ticks since the baseline.
    fn elapsed_ticks(&mut self, reset: bool) -> Tick;

    fn ticks_per_second(&self) -> Tick;

    /// Seconds since the baseline.
    fn elapsed(&mut self, reset: bool) -> DeltaTime;
}

/// Single-source stopwatch.
///
/// Trusts its clock source outright; there is no second source to check it
/// against. Use [`crate::ReconcilingTimer`] when the primary source is known to
/// misbehave.
#[derive(Debug, Clone)]
pub struct Timer<C> {
    base: TimeBase<C>,
    clock: Tick,
}

impl<C: ClockSource> Timer<C> {
    /// Probes `source` and starts the timer.
    pub fn new(source: C) -> Result<Self, ClockError> {
        Ok(Self::from_base(TimeBase::new(source)?))
    }

    /// Starts a timer on an already-resolved time base.
    pub fn from_base(base: TimeBase<C>) -> Self {
        let clock = base.now();
        Self { base, clock }
    }

    /// The baseline sample.
    pub fn baseline(&self) -> Tick {
        self.clock
    }

    pub fn time_base(&self) -> &TimeBase<C> {
        &self.base
    }
}

impl<C: ClockSource> ElapsedTimer for Timer<C> {
    fn reset(&mut self) {
        self.clock = self.base.now();
    }

    fn elapsed_ticks(&mut self, reset: bool) -> Tick {
        let now = self.base.now();
        let dt = tick_delta(now, self.clock);
        if reset {
            self.clock = now;
        }
        dt
    }

    fn ticks_per_second(&self) -> Tick {
        self.base.ticks_per_second()
    }

    fn elapsed(&mut self, reset: bool) -> DeltaTime {
        let ticks = self.elapsed_ticks(reset);
        self.base.ticks_to_seconds(ticks)
    }
}
