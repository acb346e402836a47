//! Platform clock sources.
//!
//! Each native timing mechanism is wrapped in one type implementing
//! [`ClockSource`]. [`NativeClock`] names the best monotonic source for the
//! build target; [`NativeReference`] (where one exists) names a coarser,
//! independent source usable for drift reconciliation.
//!
//! | Target | `NativeClock` | `NativeReference` |
//! |--------|---------------|-------------------|
//! | Windows | [`PerformanceCounter`] | [`MultimediaTimer`] |
//! | Apple | [`MachClock`] | none |
//! | Linux/Android | [`MonotonicClock`] | [`CoarseMonotonicClock`] |
//! | other Unix | [`MonotonicClock`] | none |
//! | anything else | [`StdClock`] | none |

use crate::error::ClockError;
use crate::ticks::Tick;

mod manual;

#[cfg(unix)]
mod posix;

#[cfg(all(unix, not(target_vendor = "apple")))]
mod unix;

#[cfg(target_vendor = "apple")]
mod mach;

#[cfg(windows)]
mod windows;

#[cfg(not(any(unix, windows)))]
mod fallback;

pub use manual::ManualClock;

#[cfg(all(unix, not(target_vendor = "apple")))]
pub use unix::MonotonicClock;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use unix::CoarseMonotonicClock;

#[cfg(target_vendor = "apple")]
pub use mach::MachClock;

#[cfg(windows)]
pub use windows::{MultimediaTimer, PerformanceCounter};

#[cfg(not(any(unix, windows)))]
pub use fallback::StdClock;

#[cfg(unix)]
pub(crate) use posix::realtime_millis as posix_realtime_millis;

#[cfg(windows)]
pub(crate) use windows::filetime_millis as windows_filetime_millis;

/// Best available monotonic clock for the build target.
#[cfg(windows)]
pub type NativeClock = PerformanceCounter;
#[cfg(target_vendor = "apple")]
pub type NativeClock = MachClock;
#[cfg(all(unix, not(target_vendor = "apple")))]
pub type NativeClock = MonotonicClock;
#[cfg(not(any(unix, windows)))]
pub type NativeClock = StdClock;

/// Coarse, independent reference clock for the build target.
#[cfg(windows)]
pub type NativeReference = MultimediaTimer;
#[cfg(any(target_os = "linux", target_os = "android"))]
pub type NativeReference = CoarseMonotonicClock;

/// One native timing mechanism.
///
/// `now` is on the hot path of polling loops and must stay a single platform
/// call. Anything that can fail belongs in [`ClockSource::frequency`] or
/// [`ClockSource::try_now`], which run once during the capability probe.
pub trait ClockSource {
    /// Diagnostic name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Current monotonic sample at the source's native resolution.
    fn now(&self) -> Tick;

    /// Checked sample used by the capability probe.
    fn try_now(&self) -> Result<Tick, ClockError> {
        Ok(self.now())
    }

    /// Ticks per second for [`ClockSource::now`].
    fn frequency(&self) -> Result<Tick, ClockError>;

    /// Milliseconds since the UNIX epoch from the platform wall clock.
    fn system_millis(&self) -> Tick {
        crate::epoch::system_time_millis()
    }

    /// Acquires any platform resource that sharpens this source.
    ///
    /// Returns `true` if something was acquired and must later be released
    /// through [`ClockSource::restore_resolution`].
    fn raise_resolution(&self) -> bool {
        false
    }

    /// Releases what [`ClockSource::raise_resolution`] acquired.
    fn restore_resolution(&self) {}
}

impl<C: ClockSource + ?Sized> ClockSource for &C {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    #[inline]
    fn now(&self) -> Tick {
        (**self).now()
    }

    fn try_now(&self) -> Result<Tick, ClockError> {
        (**self).try_now()
    }

    fn frequency(&self) -> Result<Tick, ClockError> {
        (**self).frequency()
    }

    fn system_millis(&self) -> Tick {
        (**self).system_millis()
    }

    fn raise_resolution(&self) -> bool {
        (**self).raise_resolution()
    }

    fn restore_resolution(&self) {
        (**self).restore_resolution()
    }
}
