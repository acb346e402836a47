use std::time::Duration;

/// Process-wide initialization parameters.
#[derive(Debug, Clone, Default)]
pub struct LibConfig {
    /// Request a 1 ms system timer period for the lifetime of the library.
    ///
    /// Only Windows acts on this. It sharpens the multimedia millisecond
    /// counter used as a reference source, at the cost of higher system power
    /// draw. Released again by [`crate::shutdown`].
    pub raise_timer_resolution: bool,
}

/// Tolerance used by [`crate::ReconcilingTimer`] to decide whether the primary
/// source misbehaved.
pub const DEFAULT_DRIFT_TOLERANCE: Duration = Duration::from_millis(100);

/// Drift reconciliation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileConfig {
    /// Maximum disagreement between the primary and reference sources over one
    /// interval before the reference-derived value is substituted.
    pub tolerance: Duration,
}

impl ReconcileConfig {
    pub fn with_tolerance(tolerance: Duration) -> Self {
        Self { tolerance }
    }

    pub(crate) fn tolerance_secs(&self) -> f64 {
        self.tolerance.as_secs_f64()
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self { tolerance: DEFAULT_DRIFT_TOLERANCE }
    }
}
