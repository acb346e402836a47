//! Drift reconciliation between a fast primary clock and a coarse reference.
//!
//! Some performance counters stall or jump (power management, migration
//! between cores with unsynchronized counters). A coarse OS millisecond counter
//! does not have that failure mode, so it serves as a sanity check: over each
//! interval both sources are sampled, and when the primary's delta goes
//! negative or disagrees with the reference by more than the configured
//! tolerance, the reference delta (rescaled to primary ticks) replaces it.
//!
//! The reference only bounds the error; precision still comes from the
//! primary source whenever the two agree.

use crate::config::ReconcileConfig;
use crate::error::ClockError;
use crate::source::ClockSource;
use crate::ticks::{signed_delta, DeltaTime, Tick};
use crate::timebase::TimeBase;
use crate::timer::ElapsedTimer;

/// Outcome of one reconciled elapsed query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Reading {
    /// Elapsed ticks in the primary source's units. Never negative.
    pub ticks: Tick,
    /// The primary delta was rejected and the reference-derived value used.
    pub corrected: bool,
}

/// Stopwatch over a primary source, checked against a reference source.
///
/// Both baselines are always sampled together: at construction, on
/// [`ElapsedTimer::reset`] and on every elapsed query with `reset` set.
#[derive(Debug, Clone)]
pub struct ReconcilingTimer<P, R> {
    primary: TimeBase<P>,
    reference: TimeBase<R>,
    primary_clock: Tick,
    reference_clock: Tick,
    config: ReconcileConfig,
    corrections: u64,
}

impl<P: ClockSource, R: ClockSource> ReconcilingTimer<P, R> {
    /// Probes both sources and starts the timer with the default tolerance.
    pub fn new(primary: P, reference: R) -> Result<Self, ClockError> {
        Self::with_config(primary, reference, ReconcileConfig::default())
    }

    pub fn with_config(primary: P, reference: R, config: ReconcileConfig) -> Result<Self, ClockError> {
        Ok(Self::from_bases(TimeBase::new(primary)?, TimeBase::new(reference)?, config))
    }

    /// Starts a timer on already-resolved time bases.
    pub fn from_bases(primary: TimeBase<P>, reference: TimeBase<R>, config: ReconcileConfig) -> Self {
        let mut timer = Self {
            primary,
            reference,
            primary_clock: 0,
            reference_clock: 0,
            config,
            corrections: 0,
        };
        timer.reset();
        timer
    }

    /// Elapsed ticks since the baseline, with whether a correction applied.
    pub fn reading(&mut self, reset: bool) -> Reading {
        let primary_now = self.primary.now();
        let reference_now = self.reference.now();

        let reading = self.reconcile(
            signed_delta(primary_now, self.primary_clock),
            signed_delta(reference_now, self.reference_clock),
        );

        if reading.corrected {
            self.corrections += 1;
            log::log!(
                correction_log_level(self.corrections),
                "clock '{}' disagreed with reference '{}'; using reference delta ({} ticks, correction #{})",
                self.primary.source().name(),
                self.reference.source().name(),
                reading.ticks,
                self.corrections,
            );
        }

        if reset {
            self.primary_clock = primary_now;
            self.reference_clock = reference_now;
        }

        reading
    }

    fn reconcile(&self, primary_delta: i64, mut reference_delta: i64) -> Reading {
        let primary_secs = primary_delta as DeltaTime * self.primary.inverse_frequency();

        // A fixed-width reference counter wrapped; its raw delta is meaningless,
        // so assume it agrees with the primary.
        if reference_delta < 0 {
            reference_delta = (primary_secs * self.reference.ticks_per_second() as DeltaTime) as i64;
        }
        let reference_secs = reference_delta as DeltaTime * self.reference.inverse_frequency();

        let discrepancy = primary_secs - reference_secs;
        if primary_delta < 0 || discrepancy.abs() > self.config.tolerance_secs() {
            let rescaled = reference_secs * self.primary.ticks_per_second() as DeltaTime;
            return Reading { ticks: rescaled.max(0.0).round() as Tick, corrected: true };
        }

        Reading { ticks: primary_delta as Tick, corrected: false }
    }

    /// Number of readings so far that used the reference-derived value.
    pub fn corrections(&self) -> u64 {
        self.corrections
    }

    /// Baseline samples as `(primary, reference)`.
    pub fn baseline(&self) -> (Tick, Tick) {
        (self.primary_clock, self.reference_clock)
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn primary(&self) -> &TimeBase<P> {
        &self.primary
    }

    pub fn reference(&self) -> &TimeBase<R> {
        &self.reference
    }
}

/// A broken counter polled in a loop corrects on every read; only the first
/// one is worth a warning, the running count is in `corrections()`.
fn correction_log_level(count: u64) -> log::Level {
    if count <= 1 { log::Level::Warn } else { log::Level::Debug }
}

impl<P: ClockSource, R: ClockSource> ElapsedTimer for ReconcilingTimer<P, R> {
    fn reset(&mut self) {
        self.primary_clock = self.primary.now();
        self.reference_clock = self.reference.now();
    }

    fn elapsed_ticks(&mut self, reset: bool) -> Tick {
        self.reading(reset).ticks
    }

    fn ticks_per_second(&self) -> Tick {
        self.primary.ticks_per_second()
    }

    fn elapsed(&mut self, reset: bool) -> DeltaTime {
        let ticks = self.elapsed_ticks(reset);
        self.primary.ticks_to_seconds(ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ManualClock;
    use std::time::Duration;

    const QPC_FREQ: Tick = 10_000_000;
    const MS_FREQ: Tick = 1_000;

    struct Rig {
        timer: ReconcilingTimer<ManualClock, ManualClock>,
        primary: ManualClock,
        reference: ManualClock,
    }

    fn rig_with(config: ReconcileConfig) -> Rig {
        let primary = ManualClock::new(QPC_FREQ);
        let reference = ManualClock::new(MS_FREQ);
        primary.set(7_000_000_000);
        reference.set(3_600_000);
        let timer = ReconcilingTimer::with_config(primary.clone(), reference.clone(), config).unwrap();
        Rig { timer, primary, reference }
    }

    fn rig() -> Rig {
        rig_with(ReconcileConfig::default())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn construction_samples_both_sources() {
        let r = rig();
        assert_eq!(r.timer.baseline(), (7_000_000_000, 3_600_000));
    }

    #[test]
    fn construction_propagates_reference_failure() {
        let err = ReconcilingTimer::new(ManualClock::new(QPC_FREQ), ManualClock::unavailable());
        assert!(err.is_err());
    }

    #[test]
    fn agreeing_sources_pass_primary_through() {
        let mut r = rig();
        r.primary.advance_by(ms(100));
        r.reference.advance_by(ms(100));
        let reading = r.timer.reading(false);
        assert_eq!(reading, Reading { ticks: 1_000_000, corrected: false });
    }

    #[test]
    fn small_disagreement_keeps_primary_precision() {
        let mut r = rig();
        // 150 ms vs 100 ms: 0.05 s apart, inside the 0.1 s band.
        r.primary.advance_by(ms(150));
        r.reference.advance_by(ms(100));
        assert_eq!(r.timer.elapsed_ticks(false), 1_500_000);
        assert_eq!(r.timer.corrections(), 0);
    }

    #[test]
    fn backward_jump_uses_reference() {
        let mut r = rig();
        r.primary.rewind(QPC_FREQ / 2);
        r.reference.advance_by(ms(50));
        let reading = r.timer.reading(false);
        assert!(reading.corrected);
        assert!(reading.ticks.abs_diff(500_000) <= 1, "got {}", reading.ticks);
        assert!((r.timer.elapsed(false) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn large_disagreement_uses_reference() {
        let mut r = rig();
        r.primary.advance_by(ms(500));
        r.reference.advance_by(ms(100));
        let reading = r.timer.reading(false);
        assert!(reading.corrected);
        assert!(reading.ticks.abs_diff(1_000_000) <= 1, "got {}", reading.ticks);
    }

    #[test]
    fn stalled_primary_uses_reference() {
        let mut r = rig();
        r.reference.advance_by(ms(300));
        let reading = r.timer.reading(false);
        assert!(reading.corrected);
        assert!(reading.ticks.abs_diff(3_000_000) <= 1);
    }

    #[test]
    fn tolerance_is_configurable() {
        let mut r = rig_with(ReconcileConfig::with_tolerance(Duration::from_secs(1)));
        r.primary.advance_by(ms(500));
        r.reference.advance_by(ms(100));
        assert_eq!(r.timer.reading(false), Reading { ticks: 5_000_000, corrected: false });
    }

    #[test]
    fn reference_wrap_trusts_primary() {
        let mut r = rig();
        // 32-bit millisecond counter about to wrap.
        r.reference.set(u32::MAX as Tick - 10);
        r.timer.reset();
        r.primary.advance_by(ms(20));
        r.reference.set(9);
        assert_eq!(r.timer.reading(false), Reading { ticks: 200_000, corrected: false });
    }

    #[test]
    fn reference_wrap_with_backward_primary_reads_zero() {
        let mut r = rig();
        r.reference.set(u32::MAX as Tick - 10);
        r.timer.reset();
        r.primary.rewind(1_000);
        r.reference.set(9);
        let reading = r.timer.reading(false);
        assert_eq!(reading, Reading { ticks: 0, corrected: true });
    }

    #[test]
    fn reset_moves_both_baselines() {
        let mut r = rig();
        r.primary.advance_by(ms(40));
        r.reference.advance_by(ms(40));
        assert_eq!(r.timer.elapsed_ticks(true), 400_000);
        assert_eq!(r.timer.baseline(), (7_000_400_000, 3_600_040));

        r.primary.advance_by(ms(10));
        r.reference.advance_by(ms(10));
        assert_eq!(r.timer.elapsed_ticks(true), 100_000);
    }

    #[test]
    fn query_without_reset_leaves_state() {
        let mut r = rig();
        r.primary.advance_by(ms(40));
        r.reference.advance_by(ms(40));
        r.timer.elapsed_ticks(false);
        assert_eq!(r.timer.baseline(), (7_000_000_000, 3_600_000));
    }

    #[test]
    fn corrections_are_counted() {
        let mut r = rig();
        r.primary.advance_by(ms(500));
        r.reference.advance_by(ms(100));
        r.timer.elapsed_ticks(true);
        r.primary.advance_by(ms(100));
        r.reference.advance_by(ms(100));
        r.timer.elapsed_ticks(true);
        r.primary.rewind(10);
        r.timer.elapsed_ticks(true);
        assert_eq!(r.timer.corrections(), 2);
    }

    #[test]
    fn only_first_correction_warns() {
        assert_eq!(correction_log_level(1), log::Level::Warn);
        assert_eq!(correction_log_level(2), log::Level::Debug);
        assert_eq!(correction_log_level(10_000), log::Level::Debug);
    }

    #[test]
    fn repeated_corrections_keep_counting() {
        let mut r = rig();
        for _ in 0..100 {
            r.primary.rewind(10);
            r.reference.advance_by(ms(1));
            assert!(r.timer.reading(true).corrected);
        }
        assert_eq!(r.timer.corrections(), 100);
    }

    #[test]
    fn reports_primary_frequency() {
        let r = rig();
        assert_eq!(r.timer.ticks_per_second(), QPC_FREQ);
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    #[test]
    fn real_sources_agree() {
        use crate::source::{NativeClock, NativeReference};

        let mut timer =
            ReconcilingTimer::new(NativeClock::probe().unwrap(), NativeReference::probe().unwrap())
                .unwrap();
        std::thread::sleep(ms(30));
        let secs = timer.elapsed(true);
        assert!(secs >= 0.029 && secs < 1.0, "elapsed {secs}s");
        assert_eq!(timer.corrections(), 0);
    }
}
