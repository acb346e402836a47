use windows_sys::Win32::Foundation::FILETIME;
use windows_sys::Win32::Media::{timeBeginPeriod, timeEndPeriod, timeGetTime};
use windows_sys::Win32::System::Performance::{QueryPerformanceCounter, QueryPerformanceFrequency};
use windows_sys::Win32::System::SystemInformation::GetSystemTimePreciseAsFileTime;

use crate::error::ClockError;
use crate::ticks::Tick;

use super::ClockSource;

const TIMERR_NOERROR: u32 = 0;

/// System timer period requested while the library is initialized, in ms.
const TIMER_PERIOD_MS: u32 = 1;

/// 100 ns intervals between 1601-01-01 and 1970-01-01.
const FILETIME_UNIX_OFFSET: u64 = 116_444_736_000_000_000;

/// `QueryPerformanceCounter` with the frequency reported by
/// `QueryPerformanceFrequency`.
#[derive(Debug, Clone, Copy)]
pub struct PerformanceCounter {
    frequency: Tick,
}

impl PerformanceCounter {
    /// Reads the counter frequency and one sample.
    ///
    /// Fails on hardware without a performance counter (pre-XP era machines).
    pub fn probe() -> Result<Self, ClockError> {
        let mut frequency = 0i64;
        // Safety: valid out-pointer.
        if unsafe { QueryPerformanceFrequency(&mut frequency) } == 0 || frequency <= 0 {
            return Err(ClockError::unavailable(
                "query_performance_counter",
                format!("QueryPerformanceFrequency failed: {}", std::io::Error::last_os_error()),
            ));
        }
        let clock = Self { frequency: frequency as Tick };
        clock.try_now()?;
        Ok(clock)
    }
}

impl ClockSource for PerformanceCounter {
    fn name(&self) -> &'static str {
        "query_performance_counter"
    }

    #[inline]
    fn now(&self) -> Tick {
        let mut value = 0i64;
        // Safety: valid out-pointer. Cannot fail on XP and later.
        unsafe { QueryPerformanceCounter(&mut value) };
        value as Tick
    }

    fn try_now(&self) -> Result<Tick, ClockError> {
        let mut value = 0i64;
        // Safety: valid out-pointer.
        if unsafe { QueryPerformanceCounter(&mut value) } == 0 {
            return Err(ClockError::unavailable(
                self.name(),
                format!("QueryPerformanceCounter failed: {}", std::io::Error::last_os_error()),
            ));
        }
        Ok(value as Tick)
    }

    fn frequency(&self) -> Result<Tick, ClockError> {
        Ok(self.frequency)
    }

    fn system_millis(&self) -> Tick {
        filetime_millis()
    }

    fn raise_resolution(&self) -> bool {
        // Safety: plain value argument.
        let rc = unsafe { timeBeginPeriod(TIMER_PERIOD_MS) };
        if rc != TIMERR_NOERROR {
            log::warn!("timeBeginPeriod({TIMER_PERIOD_MS}) failed with {rc}");
            return false;
        }
        true
    }

    fn restore_resolution(&self) {
        // Safety: paired with a successful timeBeginPeriod.
        unsafe { timeEndPeriod(TIMER_PERIOD_MS) };
    }
}

/// `timeGetTime`: the multimedia millisecond counter.
///
/// 32 bits wide, so it wraps roughly every 49.7 days. Granularity follows the
/// system timer period, which `raise_resolution` lowers to 1 ms.
#[derive(Debug, Clone, Copy)]
pub struct MultimediaTimer {
    _probed: (),
}

impl MultimediaTimer {
    pub fn probe() -> Result<Self, ClockError> {
        Ok(Self { _probed: () })
    }
}

impl ClockSource for MultimediaTimer {
    fn name(&self) -> &'static str {
        "time_get_time"
    }

    #[inline]
    fn now(&self) -> Tick {
        // Safety: no preconditions.
        unsafe { timeGetTime() as Tick }
    }

    fn frequency(&self) -> Result<Tick, ClockError> {
        Ok(1_000)
    }

    fn system_millis(&self) -> Tick {
        filetime_millis()
    }

    fn raise_resolution(&self) -> bool {
        // Safety: plain value argument.
        unsafe { timeBeginPeriod(TIMER_PERIOD_MS) == TIMERR_NOERROR }
    }

    fn restore_resolution(&self) {
        // Safety: paired with a successful timeBeginPeriod.
        unsafe { timeEndPeriod(TIMER_PERIOD_MS) };
    }
}

/// Wall-clock milliseconds since the UNIX epoch.
pub(crate) fn filetime_millis() -> Tick {
    let mut ft = FILETIME { dwLowDateTime: 0, dwHighDateTime: 0 };
    // Safety: valid out-pointer. Available since Windows 8.
    unsafe { GetSystemTimePreciseAsFileTime(&mut ft) };
    let intervals = ((ft.dwHighDateTime as u64) << 32) | ft.dwLowDateTime as u64;
    intervals.saturating_sub(FILETIME_UNIX_OFFSET) / 10_000
}
