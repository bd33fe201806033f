//! Run-length merging of annotated segments.

use super::{RouteElementSegment, TrafficInterval};

/// Relative tolerance when deciding whether two stretches touch.
const CONTIGUITY_EPSILON: f64 = 1e-9;

fn touches(end: f64, start: f64) -> bool {
    (end - start).abs() <= CONTIGUITY_EPSILON * end.abs().max(start.abs()).max(1.0)
}

/// Merge contiguous same-severity segments into maximal intervals.
///
/// Segments are processed in ascending start order. A segment extends the
/// previous interval when it has the same severity and starts where that
/// interval ends; otherwise it opens a new interval. Total length is
/// conserved and merging an already merged sequence is a no-op.
pub fn merge_segments(segments: &[RouteElementSegment]) -> Vec<TrafficInterval> {
    let mut ordered: Vec<&RouteElementSegment> = segments.iter().collect();
    ordered.sort_by(|a, b| a.start_offset_m.total_cmp(&b.start_offset_m));

    let intervals = ordered
        .into_iter()
        .map(|s| TrafficInterval {
            start_offset_m: s.start_offset_m,
            length_m: s.length_m,
            severity: s.severity,
        })
        .collect::<Vec<_>>();

    merge_intervals(&intervals)
}

/// Merge contiguous same-severity intervals, assuming ascending start order.
pub fn merge_intervals(intervals: &[TrafficInterval]) -> Vec<TrafficInterval> {
    let mut merged: Vec<TrafficInterval> = Vec::with_capacity(intervals.len());

    for interval in intervals {
        match merged.last_mut() {
            Some(last)
                if last.severity == interval.severity
                    && touches(last.end_offset_m(), interval.start_offset_m) =>
            {
                last.length_m += interval.length_m;
            }
            _ => merged.push(*interval),
        }
    }

    merged
}
