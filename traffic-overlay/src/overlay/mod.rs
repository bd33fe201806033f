//! Single-cycle overlay computation.
//!
//! The pipeline turns a route and a batch of traffic events into a list of
//! severity intervals covering the route as fractions of its length:
//!
//! ```text
//! Route ──► index_elements ──► annotate_segments ──► merge_segments ──► normalize_intervals
//!           (offsets)          (severity by id)      (run-length)       ([0,1] fractions)
//! ```
//!
//! Every stage is a pure function over per-cycle values. Nothing here awaits
//! or blocks; [`OverlayScheduler`](crate::scheduler::OverlayScheduler) wraps
//! it in the periodic refresh loop.
//!
//! # Example
//!
//! ```
//! use traffic_overlay::config::OverlayConfig;
//! use traffic_overlay::overlay::compute_overlay;
//! use traffic_overlay::route::{Route, RouteElement};
//! use traffic_overlay::traffic::{Severity, TrafficEvent};
//!
//! let route = Route::new(
//!     1000.0,
//!     vec![
//!         RouteElement::identified("a", 300.0),
//!         RouteElement::identified("b", 400.0),
//!         RouteElement::identified("c", 300.0),
//!     ],
//! );
//! let events = vec![TrafficEvent::new(Severity::High, ["b"])];
//!
//! let overlay = compute_overlay(&route, &events, &OverlayConfig::default())?;
//! assert_eq!(overlay.len(), 3);
//! assert_eq!(overlay[1].severity, Severity::High);
//! # Ok::<(), traffic_overlay::OverlayError>(())
//! ```

mod annotator;
mod indexer;
mod merger;
mod normalizer;

pub use annotator::annotate_segments;
pub use indexer::index_elements;
pub use merger::{merge_intervals, merge_segments};
pub use normalizer::normalize_intervals;

use serde::{Deserialize, Serialize};

use crate::config::OverlayConfig;
use crate::error::OverlayError;
use crate::route::{ElementId, Route};
use crate::traffic::{Severity, TrafficEvent};

/// A position-indexed route element.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteElementSegment {
    pub id: ElementId,
    pub start_offset_m: f64,
    pub length_m: f64,
    pub severity: Severity,
}

impl RouteElementSegment {
    pub fn end_offset_m(&self) -> f64 {
        self.start_offset_m + self.length_m
    }
}

/// A merged run of equal severity, in meters along the route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrafficInterval {
    pub start_offset_m: f64,
    pub length_m: f64,
    pub severity: Severity,
}

impl TrafficInterval {
    pub fn end_offset_m(&self) -> f64 {
        self.start_offset_m + self.length_m
    }
}

/// A merged run of equal severity as fractions of the route length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteTrafficInterval {
    /// Start of the run in `[0, 1]`.
    pub start_fraction: f64,
    /// End of the run in `[0, 1]`, never below `start_fraction`.
    pub end_fraction: f64,
    pub severity: Severity,
}

/// Run one full pipeline cycle for `route` against `events`.
///
/// The route is validated first; a NaN or negative element length would
/// otherwise shift every later offset.
pub fn compute_overlay(
    route: &Route,
    events: &[TrafficEvent],
    config: &OverlayConfig,
) -> Result<Vec<RouteTrafficInterval>, OverlayError> {
    route.validate()?;
    Ok(compute_validated_overlay(route, events, config))
}

/// [`compute_overlay`] for a route that already passed [`Route::validate`].
pub(crate) fn compute_validated_overlay(
    route: &Route,
    events: &[TrafficEvent],
    config: &OverlayConfig,
) -> Vec<RouteTrafficInterval> {
    let segments = index_elements(route.elements(), config.unidentified_elements);
    let segments = annotate_segments(segments, events, route, config.severity_resolution);
    let intervals = merge_segments(&segments);
    normalize_intervals(&intervals, route.length_m)
}
