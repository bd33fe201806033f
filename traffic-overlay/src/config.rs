//! Configuration for the overlay engine.
//!
//! [`OverlayConfig`] carries the refresh period of the scheduler and the two
//! policy decisions the pipeline leaves open: what to do with route elements
//! that have no stable identifier, and how to resolve several events hitting
//! the same element.

use std::time::Duration;

/// Default delay between refresh cycles in seconds.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 15;

/// Shortest delay the scheduler will wait between refresh cycles.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Handling of route elements without a stable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnidentifiedElementPolicy {
    /// Drop the element and do not advance the running offset.
    ///
    /// Offsets of every later segment are understated by the skipped
    /// length. This is the reference behavior.
    #[default]
    Skip,

    /// Drop the element but advance the running offset by its length.
    ///
    /// Later segments keep their true position; the skipped stretch is left
    /// uncovered by the overlay.
    AdvanceOffset,
}

/// Resolution of several events affecting the same element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityResolution {
    /// The event applied last wins, whatever its severity.
    #[default]
    LastWriteWins,

    /// The highest [`Severity::rank`](crate::traffic::Severity::rank) wins.
    MostSevere,
}

/// Configuration for the overlay pipeline and scheduler.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Delay between the end of one cycle and the start of the next.
    ///
    /// Default: 15 seconds. The scheduler never waits less than
    /// [`MIN_REFRESH_INTERVAL`], whatever is stored here.
    pub refresh_interval: Duration,

    /// Handling of unidentified route elements. Default: `Skip`.
    pub unidentified_elements: UnidentifiedElementPolicy,

    /// Severity conflict resolution. Default: `LastWriteWins`.
    pub severity_resolution: SeverityResolution,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECS),
            unidentified_elements: UnidentifiedElementPolicy::default(),
            severity_resolution: SeverityResolution::default(),
        }
    }
}

impl OverlayConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the refresh interval, raised to [`MIN_REFRESH_INTERVAL`] if shorter.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval.max(MIN_REFRESH_INTERVAL);
        self
    }

    /// The delay the scheduler actually waits between cycles.
    pub fn effective_refresh_interval(&self) -> Duration {
        self.refresh_interval.max(MIN_REFRESH_INTERVAL)
    }

    /// Set the unidentified element policy.
    pub fn with_unidentified_elements(mut self, policy: UnidentifiedElementPolicy) -> Self {
        self.unidentified_elements = policy;
        self
    }

    /// Set the severity conflict resolution.
    pub fn with_severity_resolution(mut self, resolution: SeverityResolution) -> Self {
        self.severity_resolution = resolution;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OverlayConfig::default();
        assert_eq!(config.refresh_interval, Duration::from_secs(15));
        assert_eq!(config.unidentified_elements, UnidentifiedElementPolicy::Skip);
        assert_eq!(config.severity_resolution, SeverityResolution::LastWriteWins);
    }

    #[test]
    fn test_config_builder() {
        let config = OverlayConfig::new()
            .with_refresh_interval(Duration::from_secs(5))
            .with_unidentified_elements(UnidentifiedElementPolicy::AdvanceOffset)
            .with_severity_resolution(SeverityResolution::MostSevere);

        assert_eq!(config.refresh_interval, Duration::from_secs(5));
        assert_eq!(
            config.unidentified_elements,
            UnidentifiedElementPolicy::AdvanceOffset
        );
        assert_eq!(config.severity_resolution, SeverityResolution::MostSevere);
    }

    #[test]
    fn test_zero_refresh_interval_is_clamped() {
        let config = OverlayConfig::new().with_refresh_interval(Duration::ZERO);
        assert_eq!(config.refresh_interval, MIN_REFRESH_INTERVAL);

        let mut raw = OverlayConfig::new();
        raw.refresh_interval = Duration::ZERO;
        assert_eq!(raw.effective_refresh_interval(), MIN_REFRESH_INTERVAL);
    }
}
