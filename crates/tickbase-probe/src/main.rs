use anyhow::{Context, Result};
use tickbase_core::logging::{init_logging, LoggingConfig};
use tickbase_core::{ClockSource, ElapsedTimer, LibConfig};

mod probe;

use probe::{measure_resolution, ProbeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = ProbeConfig::from_args(std::env::args().skip(1))?;

    println!("Timer test");

    tickbase_core::initialize_with(LibConfig { raise_timer_resolution: true })
        .context("no high-resolution clock available")?;

    let base = tickbase_core::time_base().context("time base missing after initialize")?;
    log::info!(
        "clock '{}' at {} ticks/s, probing for {:?}",
        base.source().name(),
        base.ticks_per_second(),
        config.duration,
    );

    let mut timer = tickbase_core::native_timer().context("failed to start timer")?;
    let started_at = tickbase_core::system_time_millis();

    let res = measure_resolution(base, config.duration);

    let wall = tickbase_core::system_time_millis().saturating_sub(started_at);
    log::info!(
        "{} steps observed; timer {:.3}s, wall clock {}ms",
        res.samples,
        timer.elapsed(true),
        wall,
    );

    println!("Resolution: {:.6}ms", res.millis());

    tickbase_core::shutdown();

    Ok(())
}
