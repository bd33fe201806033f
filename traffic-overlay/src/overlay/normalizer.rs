//! Conversion of absolute intervals into route fractions.

use super::{RouteTrafficInterval, TrafficInterval};

fn fraction(offset_m: f64, route_length_m: f64) -> f64 {
    offset_m.clamp(0.0, route_length_m) / route_length_m
}

/// Express intervals as fractions of the route length.
///
/// Offsets are clamped into `[0, route_length_m]` before dividing, so
/// accumulated drift past the nominal length never yields a fraction outside
/// `[0, 1]`. A non-positive or non-finite route length yields no intervals.
pub fn normalize_intervals(
    intervals: &[TrafficInterval],
    route_length_m: f64,
) -> Vec<RouteTrafficInterval> {
    if !route_length_m.is_finite() || route_length_m <= 0.0 {
        return Vec::new();
    }

    intervals
        .iter()
        .filter(|i| i.start_offset_m.is_finite() && i.length_m.is_finite())
        .map(|i| RouteTrafficInterval {
            start_fraction: fraction(i.start_offset_m, route_length_m),
            end_fraction: fraction(i.end_offset_m(), route_length_m),
            severity: i.severity,
        })
        .collect()
}
