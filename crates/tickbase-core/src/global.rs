//! Process-wide time base.
//!
//! [`initialize`] probes the native clock once and publishes the outcome
//! through a `OnceLock`; every free function reads it without locking. A
//! failed probe is published too, so it is never repeated.
//!
//! The time base never changes after publication, so [`shutdown`]
//! only releases platform resources and a later [`initialize`] simply
//! re-acquires them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use crate::config::LibConfig;
use crate::error::ClockError;
use crate::source::{ClockSource, NativeClock};
use crate::ticks::{DeltaTime, Tick};
use crate::timebase::TimeBase;

static TIMEBASE: OnceLock<Result<TimeBase<NativeClock>, ClockError>> = OnceLock::new();
static RESOLUTION_RAISED: AtomicBool = AtomicBool::new(false);

/// Initializes the library with the default [`LibConfig`].
pub fn initialize() -> Result<(), ClockError> {
    initialize_with(LibConfig::default())
}

/// Probes the native clock and establishes the process-wide frequency.
///
/// Idempotent: the probe runs at most once per process, later calls only
/// apply `config`. A failed probe leaves nothing established and its error is
/// returned on every call.
pub fn initialize_with(config: LibConfig) -> Result<(), ClockError> {
    let base = time_base_checked()?;

    if config.raise_timer_resolution
        && !RESOLUTION_RAISED.load(Ordering::Acquire)
        && base.source().raise_resolution()
    {
        // Lost a race with another initializer; keep exactly one raise outstanding.
        if RESOLUTION_RAISED.swap(true, Ordering::AcqRel) {
            base.source().restore_resolution();
        } else {
            log::debug!("raised system timer resolution");
        }
    }

    Ok(())
}

/// Releases platform resources acquired by [`initialize_with`].
///
/// Safe to call any number of times, including before or without a successful
/// initialize.
pub fn shutdown() {
    if !RESOLUTION_RAISED.swap(false, Ordering::AcqRel) {
        return;
    }
    if let Some(Ok(base)) = TIMEBASE.get() {
        base.source().restore_resolution();
        log::debug!("restored system timer resolution");
    }
}

/// Whether a native time base has been established.
pub fn is_initialized() -> bool {
    matches!(TIMEBASE.get(), Some(Ok(_)))
}

pub(crate) fn time_base_checked() -> Result<&'static TimeBase<NativeClock>, ClockError> {
    resolve_once(&TIMEBASE, NativeClock::probe)
}

/// Runs `probe` the first time `cell` is read and caches the outcome,
/// success or failure.
fn resolve_once<C, F>(
    cell: &OnceLock<Result<TimeBase<C>, ClockError>>,
    probe: F,
) -> Result<&TimeBase<C>, ClockError>
where
    C: ClockSource,
    F: FnOnce() -> Result<C, ClockError>,
{
    cell.get_or_init(|| {
        let resolved = probe().and_then(TimeBase::new);
        match &resolved {
            Ok(base) => log::debug!("native clock '{}' initialized", base.source().name()),
            Err(e) => log::error!("no working clock: {e}"),
        }
        resolved
    })
    .as_ref()
    .map_err(Clone::clone)
}

/// The process-wide time base, probing on first use.
///
/// Returns `None` only when the native clock is unavailable.
pub fn time_base() -> Option<&'static TimeBase<NativeClock>> {
    time_base_checked().ok()
}

/// Current monotonic tick. Zero if no native clock exists.
#[inline]
pub fn now() -> Tick {
    time_base().map_or(0, |b| b.now())
}

/// Ticks per second for [`now`]. Zero if no native clock exists.
#[inline]
pub fn ticks_per_second() -> Tick {
    time_base().map_or(0, |b| b.ticks_per_second())
}

/// Ticks elapsed since `since`, wraparound-safe.
#[inline]
pub fn elapsed_ticks(since: Tick) -> Tick {
    time_base().map_or(0, |b| b.elapsed_ticks(since))
}

/// Seconds elapsed since `since`.
#[inline]
pub fn elapsed_seconds(since: Tick) -> DeltaTime {
    time_base().map_or(0.0, |b| b.elapsed_seconds(since))
}

#[inline]
pub fn ticks_to_seconds(delta: Tick) -> DeltaTime {
    time_base().map_or(0.0, |b| b.ticks_to_seconds(delta))
}
