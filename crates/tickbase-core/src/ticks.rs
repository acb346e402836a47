//! Tick and delta-time primitives.

use std::time::Duration;

/// Opaque monotonic counter value.
///
/// The base is platform-defined (hardware counter, nanoseconds since boot, ...).
/// Only differences between ticks taken by the same process on the same
/// machine carry meaning; never persist or compare ticks across platforms.
pub type Tick = u64;

/// Elapsed time in seconds.
///
/// Double precision keeps sub-microsecond resolution when many deltas are
/// accumulated over long runs; single precision degrades to millisecond steps
/// after a couple of hours.
pub type DeltaTime = f64;

pub(crate) const NANOS_PER_SEC: Tick = 1_000_000_000;

/// Wraparound-safe difference `now - since`.
#[inline]
pub fn tick_delta(now: Tick, since: Tick) -> Tick {
    now.wrapping_sub(since)
}

/// Signed difference `now - since`.
///
/// A negative result means the source went backward (or a fixed-width counter
/// wrapped) between the two samples.
#[inline]
pub(crate) fn signed_delta(now: Tick, since: Tick) -> i64 {
    now.wrapping_sub(since) as i64
}

/// Converts a tick count at `frequency` ticks/second to a `Duration`.
///
/// Returns `Duration::ZERO` for a zero frequency.
pub fn ticks_to_duration(ticks: Tick, frequency: Tick) -> Duration {
    if frequency == 0 {
        return Duration::ZERO;
    }
    let secs = ticks / frequency;
    let rem = ticks % frequency;
    // rem < frequency, so the product stays below frequency * 1e9 and fits in u128.
    let nanos = (rem as u128 * NANOS_PER_SEC as u128 / frequency as u128) as u32;
    Duration::new(secs, nanos)
}

/// Converts a `Duration` to ticks at `frequency` ticks/second, saturating at
/// `Tick::MAX`.
pub fn duration_to_ticks(duration: Duration, frequency: Tick) -> Tick {
    duration
        .as_nanos()
        .checked_mul(frequency as u128)
        .map_or(Tick::MAX, |n| (n / NANOS_PER_SEC as u128).min(Tick::MAX as u128) as Tick)
}
