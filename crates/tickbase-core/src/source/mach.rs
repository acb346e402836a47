use mach2::kern_return::KERN_SUCCESS;
use mach2::mach_time::{mach_absolute_time, mach_timebase_info, mach_timebase_info_data_t};

use crate::error::ClockError;
use crate::ticks::{Tick, NANOS_PER_SEC};

use super::posix;
use super::ClockSource;

/// `mach_absolute_time`, normalized to nanoseconds.
///
/// The raw counter runs in arbitrary timebase units. The numer/denom ratio is
/// queried once by [`MachClock::probe`] and folded into every sample, so ticks
/// from this source are linear nanoseconds like every other Unix source.
///
/// On Apple Silicon the ratio is usually 125/3 (24 MHz counter); on Intel it
/// is 1/1.
#[derive(Debug, Clone, Copy)]
pub struct MachClock {
    numer: u32,
    denom: u32,
}

impl MachClock {
    /// Queries the timebase ratio.
    pub fn probe() -> Result<Self, ClockError> {
        let mut info = mach_timebase_info_data_t { numer: 0, denom: 0 };
        // Safety: `info` is a valid out-pointer for the duration of the call.
        let rc = unsafe { mach_timebase_info(&mut info) };
        if rc != KERN_SUCCESS {
            return Err(ClockError::unavailable(
                "mach_absolute_time",
                format!("mach_timebase_info returned {rc}"),
            ));
        }
        if info.numer == 0 || info.denom == 0 {
            return Err(ClockError::unavailable(
                "mach_absolute_time",
                format!("degenerate timebase {}/{}", info.numer, info.denom),
            ));
        }
        log::debug!("mach timebase {}/{}", info.numer, info.denom);
        Ok(Self { numer: info.numer, denom: info.denom })
    }

    /// The timebase ratio as `(numer, denom)`.
    pub fn timebase(&self) -> (u32, u32) {
        (self.numer, self.denom)
    }

    #[inline]
    fn normalize(&self, raw: u64) -> Tick {
        if self.numer == self.denom {
            return raw;
        }
        // u128 keeps `raw * numer` from overflowing after long uptimes.
        (raw as u128 * self.numer as u128 / self.denom as u128) as Tick
    }
}

impl ClockSource for MachClock {
    fn name(&self) -> &'static str {
        "mach_absolute_time"
    }

    #[inline]
    fn now(&self) -> Tick {
        // Safety: mach_absolute_time has no preconditions.
        self.normalize(unsafe { mach_absolute_time() })
    }

    fn frequency(&self) -> Result<Tick, ClockError> {
        Ok(NANOS_PER_SEC)
    }

    fn system_millis(&self) -> Tick {
        posix::realtime_millis()
    }
}
