//! Wall-clock readout.
//!
//! Milliseconds since the UNIX epoch. Unrelated to the monotonic tick domain:
//! it may jump when the system clock is adjusted, but it is the only value in
//! this crate that means something across processes and machines.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::ticks::Tick;

/// Milliseconds since 1970-01-01T00:00:00Z.
///
/// Works with or without [`crate::initialize`].
pub fn system_time_millis() -> Tick {
    #[cfg(unix)]
    {
        crate::source::posix_realtime_millis()
    }
    #[cfg(windows)]
    {
        crate::source::windows_filetime_millis()
    }
    #[cfg(not(any(unix, windows)))]
    {
        std_system_millis()
    }
}

/// `SystemTime`-based readout. Clocks set before 1970 read as zero.
#[cfg_attr(windows, allow(dead_code))]
pub(crate) fn std_system_millis() -> Tick {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Tick)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn agrees_with_std_wall_clock() {
        let ours = system_time_millis();
        let std = std_system_millis();
        assert!(ours.abs_diff(std) < 1_000, "ours {ours} std {std}");
    }

    #[test]
    fn after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(system_time_millis() > 1_577_836_800_000);
    }

    #[test]
    fn one_second_apart() {
        let a = system_time_millis();
        std::thread::sleep(Duration::from_secs(1));
        let b = system_time_millis();
        let diff = b.saturating_sub(a);
        assert!((950..=1_500).contains(&diff), "diff {diff}ms");
    }
}
