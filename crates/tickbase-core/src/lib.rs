//! High-resolution monotonic timing.
//!
//! A tick counter over the best native clock of each platform, tick/second
//! conversion with a cached reciprocal frequency, and a wall-clock epoch
//! readout.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`source`] | `ClockSource` and the per-platform clocks |
//! | [`timebase`] | `TimeBase`: a probed source with its frequency resolved |
//! | [`ticks`] | `Tick`, `DeltaTime`, wraparound-safe arithmetic |
//! | [`timer`] | `Timer`, `ElapsedTimer` |
//! | [`reconcile`] | `ReconcilingTimer`: primary clock checked against a reference |
//! | [`epoch`] | `system_time_millis` |
//! | [`logging`] | `env_logger` setup for binaries |
//!
//! # Quick start
//!
//! ```rust
//! tickbase_core::initialize().unwrap();
//!
//! let start = tickbase_core::now();
//! // ... work ...
//! let secs = tickbase_core::elapsed_seconds(start);
//! assert!(secs >= 0.0);
//!
//! tickbase_core::shutdown();
//! ```

pub mod config;
pub mod epoch;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod source;
pub mod ticks;
pub mod timebase;
pub mod timer;

mod global;

pub use config::{LibConfig, ReconcileConfig, DEFAULT_DRIFT_TOLERANCE};
pub use epoch::system_time_millis;
pub use error::ClockError;
pub use global::{
    elapsed_seconds, elapsed_ticks, initialize, initialize_with, is_initialized, now, shutdown,
    ticks_per_second, ticks_to_seconds, time_base,
};
pub use reconcile::{Reading, ReconcilingTimer};
pub use source::{ClockSource, ManualClock, NativeClock};
pub use ticks::{DeltaTime, Tick};
pub use timebase::TimeBase;
pub use timer::{ElapsedTimer, Timer};

/// Per-instance timer for the build target.
///
/// On Windows the performance counter is reconciled against the multimedia
/// millisecond counter; elsewhere the monotonic clock is trusted directly.
#[cfg(windows)]
pub type NativeTimer = ReconcilingTimer<NativeClock, source::NativeReference>;
#[cfg(not(windows))]
pub type NativeTimer = Timer<NativeClock>;

/// Starts a [`NativeTimer`] on the process-wide time base.
pub fn native_timer() -> Result<NativeTimer, ClockError> {
    let base = global::time_base_checked()?.clone();

    #[cfg(windows)]
    {
        let reference = TimeBase::new(source::NativeReference::probe()?)?;
        Ok(ReconcilingTimer::from_bases(base, reference, ReconcileConfig::default()))
    }
    #[cfg(not(windows))]
    {
        Ok(Timer::from_base(base))
    }
}
