//! `clock_gettime` helpers shared by every Unix target.

use std::mem::MaybeUninit;

use crate::error::ClockError;
use crate::ticks::{Tick, NANOS_PER_SEC};

/// Reads `clock` and returns it as nanoseconds.
#[inline]
pub(super) fn read_nanos(clock: libc::clockid_t) -> Result<Tick, std::io::Error> {
    let mut ts = MaybeUninit::<libc::timespec>::uninit();
    // Safety: `ts` is a valid out-pointer; it is only read after a zero return,
    // when the kernel has filled it.
    let rc = unsafe { libc::clock_gettime(clock, ts.as_mut_ptr()) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error());
    }
    let ts = unsafe { ts.assume_init() };
    Ok((ts.tv_sec as Tick) * NANOS_PER_SEC + ts.tv_nsec as Tick)
}

/// Like [`read_nanos`], mapping failure to a probe error for `name`.
pub(super) fn probe_nanos(name: &'static str, clock: libc::clockid_t) -> Result<Tick, ClockError> {
    read_nanos(clock).map_err(|e| ClockError::unavailable(name, format!("clock_gettime failed: {e}")))
}

/// Wall-clock milliseconds since the UNIX epoch.
pub(crate) fn realtime_millis() -> Tick {
    match read_nanos(libc::CLOCK_REALTIME) {
        Ok(nanos) => nanos / 1_000_000,
        // CLOCK_REALTIME is mandatory in POSIX; a failure here means a broken
        // sandbox, and std's wall clock is the next best source.
        Err(_) => crate::epoch::std_system_millis(),
    }
}
