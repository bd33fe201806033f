//! Common types and utilities shared across CLI commands.

use std::time::Duration;

use clap::ValueEnum;
use traffic_overlay::config::{SeverityResolution, UnidentifiedElementPolicy};
use traffic_overlay::OverlayConfig;

/// Handling of route elements without an identifier.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
pub enum ElementPolicy {
    /// Drop them without advancing later offsets (reference behavior)
    #[default]
    Skip,
    /// Drop them but keep later elements at their true position
    AdvanceOffset,
}

impl From<ElementPolicy> for UnidentifiedElementPolicy {
    fn from(policy: ElementPolicy) -> Self {
        match policy {
            ElementPolicy::Skip => UnidentifiedElementPolicy::Skip,
            ElementPolicy::AdvanceOffset => UnidentifiedElementPolicy::AdvanceOffset,
        }
    }
}

/// Resolution of conflicting events on one element.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
pub enum Resolution {
    /// The event listed last wins
    #[default]
    LastWriteWins,
    /// The most severe event wins
    MostSevere,
}

impl From<Resolution> for SeverityResolution {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::LastWriteWins => SeverityResolution::LastWriteWins,
            Resolution::MostSevere => SeverityResolution::MostSevere,
        }
    }
}

/// Build the engine configuration from CLI arguments.
pub fn build_config(
    policy: ElementPolicy,
    resolution: Resolution,
    interval_secs: Option<u64>,
) -> OverlayConfig {
    let config = OverlayConfig::new()
        .with_unidentified_elements(policy.into())
        .with_severity_resolution(resolution.into());

    match interval_secs {
        Some(secs) => config.with_refresh_interval(Duration::from_secs(secs.max(1))),
        None => config,
    }
}
