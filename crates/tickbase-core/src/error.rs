use std::fmt;

/// Failure raised by the one-time clock capability probe.
///
/// Every other operation in this crate is infallible once a clock source has
/// been probed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The platform clock could not be queried.
    ClockUnavailable {
        /// Diagnostic name of the clock source that failed.
        clock: &'static str,
        /// What went wrong, usually the failing call and its return code.
        reason: String,
    },
}

impl ClockError {
    pub(crate) fn unavailable(clock: &'static str, reason: impl Into<String>) -> Self {
        Self::ClockUnavailable { clock, reason: reason.into() }
    }
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClockUnavailable { clock, reason } => {
                write!(f, "clock source '{clock}' unavailable: {reason}")
            }
        }
    }
}

impl std::error::Error for ClockError {}
