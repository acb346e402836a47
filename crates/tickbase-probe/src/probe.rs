use std::time::Duration;

use anyhow::{Context, Result};
use tickbase_core::{ClockSource, DeltaTime, Tick, TimeBase};

/// Probe parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    /// How long to keep sampling.
    pub duration: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { duration: Duration::from_secs(10) }
    }
}

impl ProbeConfig {
    /// Reads the optional probe duration, in seconds, from the first argument.
    pub fn from_args<I>(mut args: I) -> Result<Self>
    where
        I: Iterator<Item = String>,
    {
        let Some(arg) = args.next() else {
            return Ok(Self::default());
        };
        let secs: f64 = arg
            .parse()
            .with_context(|| format!("invalid probe duration '{arg}'"))?;
        anyhow::ensure!(secs.is_finite() && secs > 0.0, "probe duration must be positive, got {secs}");
        Ok(Self { duration: Duration::from_secs_f64(secs) })
    }
}

/// Result of a resolution probe.
#[derive(Debug, Copy, Clone)]
pub struct Resolution {
    /// Smallest non-zero step observed between two samples.
    pub min_ticks: Tick,
    pub frequency: Tick,
    /// Number of non-zero steps observed.
    pub samples: u64,
}

impl Resolution {
    pub fn seconds(&self) -> DeltaTime {
        self.min_ticks as DeltaTime / self.frequency as DeltaTime
    }

    pub fn millis(&self) -> DeltaTime {
        1000.0 * self.seconds()
    }
}

/// Spins on `base` for `duration`, recording the smallest non-zero tick step.
///
/// The source must advance; a stalled clock never returns.
pub fn measure_resolution<C: ClockSource>(base: &TimeBase<C>, duration: Duration) -> Resolution {
    let limit = duration.as_secs_f64();
    let start = base.now();
    let mut min_ticks = Tick::MAX;
    let mut samples = 0u64;

    loop {
        let time = base.now();
        let step = loop {
            let dt = base.elapsed_ticks(time);
            if dt != 0 {
                break dt;
            }
        };

        min_ticks = min_ticks.min(step);
        samples += 1;

        if base.elapsed_seconds(start) > limit {
            break;
        }
    }

    Resolution { min_ticks, frequency: base.ticks_per_second(), samples }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> std::vec::IntoIter<String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn default_duration_is_ten_seconds() {
        let config = ProbeConfig::from_args(args(&[])).unwrap();
        assert_eq!(config.duration, Duration::from_secs(10));
    }

    #[test]
    fn duration_from_first_argument() {
        let config = ProbeConfig::from_args(args(&["0.5", "ignored"])).unwrap();
        assert_eq!(config.duration, Duration::from_millis(500));
    }

    #[test]
    fn rejects_bad_duration() {
        assert!(ProbeConfig::from_args(args(&["soon"])).is_err());
        assert!(ProbeConfig::from_args(args(&["-1"])).is_err());
        assert!(ProbeConfig::from_args(args(&["0"])).is_err());
    }

    #[test]
    fn resolution_is_at_least_one_tick() {
        tickbase_core::initialize().unwrap();
        let base = tickbase_core::time_base().unwrap();
        let res = measure_resolution(base, Duration::from_millis(50));

        assert!(res.samples > 0);
        assert!(res.min_ticks >= 1);
        assert_eq!(res.frequency, base.ticks_per_second());
        // Any usable monotonic clock resolves well below 20 ms.
        assert!(res.seconds() < 0.02, "resolution {}s", res.seconds());
    }

    #[test]
    fn millis_scales_seconds() {
        let res = Resolution { min_ticks: 3, frequency: 1_000, samples: 1 };
        assert!((res.millis() - 3.0).abs() < 1e-12);
    }
}
