use std::sync::Once;

/// Logger configuration for binaries built on this crate.
///
/// `env_filter` uses `env_logger` directive syntax, e.g.
/// `"tickbase_core=debug,tickbase_probe=info"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Explicit directives; take precedence over `RUST_LOG`.
    pub env_filter: Option<String>,
    /// Level used when neither `env_filter` nor `RUST_LOG` is set.
    pub default_level: log::LevelFilter,
    /// Stamp records with microsecond precision instead of seconds.
    pub micros_timestamps: bool,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            micros_timestamps: true,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the global logger.
///
/// Only the first call does anything. If the host already installed another
/// logger, that one is kept.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok()) {
            Some(directives) => builder.parse_filters(&directives),
            None => builder.filter_level(config.default_level),
        };

        if config.micros_timestamps {
            builder.format_timestamp_micros();
        }
        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

/// Picks the directive string to apply: explicit config first, then the
/// environment. Blank strings count as unset.
fn resolve_filter(explicit: Option<String>, env: Option<String>) -> Option<String> {
    explicit
        .filter(|s| !s.trim().is_empty())
        .or_else(|| env.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let got = resolve_filter(Some("tickbase_core=trace".into()), Some("warn".into()));
        assert_eq!(got.as_deref(), Some("tickbase_core=trace"));
    }

    #[test]
    fn env_filter_used_when_no_explicit() {
        assert_eq!(resolve_filter(None, Some("debug".into())).as_deref(), Some("debug"));
    }

    #[test]
    fn blank_filters_are_ignored() {
        assert_eq!(resolve_filter(Some("  ".into()), Some(String::new())), None);
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig {
            env_filter: Some("tickbase_core=debug".into()),
            ..Default::default()
        });
        init_logging(LoggingConfig::default());
    }
}
