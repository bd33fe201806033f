//! Application of traffic events onto indexed segments.

use std::collections::HashMap;

use tracing::trace;

use crate::config::SeverityResolution;
use crate::route::{ElementId, Route};
use crate::traffic::{Severity, TrafficEvent};

use super::RouteElementSegment;

/// Overwrite segment severities with the severities of qualifying events.
///
/// Events with [`Severity::Normal`] and events not relevant to `route` are
/// ignored. Every segment whose id is affected by a qualifying event takes
/// that event's severity, subject to `resolution` when several events touch
/// the same id. Ids not present among the segments are ignored.
pub fn annotate_segments(
    mut segments: Vec<RouteElementSegment>,
    events: &[TrafficEvent],
    route: &Route,
    resolution: SeverityResolution,
) -> Vec<RouteElementSegment> {
    let mut by_id: HashMap<ElementId, Vec<usize>> = HashMap::with_capacity(segments.len());
    for (index, segment) in segments.iter().enumerate() {
        by_id.entry(segment.id.clone()).or_default().push(index);
    }

    let qualifying = events
        .iter()
        .filter(|e| e.severity() != Severity::Normal)
        .filter(|e| e.relevant_to_route(route));

    for event in qualifying {
        let severity = event.severity();
        for id in event.affected_element_ids() {
            let Some(indices) = by_id.get(id) else {
                continue;
            };
            for &index in indices {
                let segment = &mut segments[index];
                let apply = match resolution {
                    SeverityResolution::LastWriteWins => true,
                    SeverityResolution::MostSevere => severity.rank() > segment.severity.rank(),
                };
                if apply {
                    trace!(element = %id, from = %segment.severity, to = %severity, "Severity applied");
                    segment.severity = severity;
                }
            }
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnidentifiedElementPolicy;
    use crate::overlay::index_elements;
    use crate::route::RouteElement;
    use crate::traffic::RouteRelevance;
    use std::sync::Arc;

    fn route() -> Route {
        Route::new(
            1000.0,
            vec![
                RouteElement::identified("a", 300.0),
                RouteElement::identified("b", 400.0),
                RouteElement::identified("c", 300.0),
            ],
        )
    }

    fn segments(route: &Route) -> Vec<RouteElementSegment> {
        index_elements(route.elements(), UnidentifiedElementPolicy::Skip)
    }

    fn severities(segments: &[RouteElementSegment]) -> Vec<Severity> {
        segments.iter().map(|s| s.severity).collect()
    }

    #[test]
    fn test_event_marks_affected_segment() {
        let route = route();
        let events = vec![TrafficEvent::new(Severity::High, ["b"])];

        let result = annotate_segments(
            segments(&route),
            &events,
            &route,
            SeverityResolution::LastWriteWins,
        );

        assert_eq!(
            severities(&result),
            vec![Severity::Normal, Severity::High, Severity::Normal]
        );
    }

    #[test]
    fn test_normal_events_are_ignored() {
        let route = route();
        let events = vec![
            TrafficEvent::new(Severity::High, ["a"]),
            TrafficEvent::new(Severity::Normal, ["a"]),
        ];

        let result = annotate_segments(
            segments(&route),
            &events,
            &route,
            SeverityResolution::LastWriteWins,
        );

        assert_eq!(result[0].severity, Severity::High);
    }

    #[test]
    fn test_irrelevant_events_are_ignored() {
        struct Never;
        impl RouteRelevance for Never {
            fn is_relevant(&self, _route: &Route) -> bool {
                false
            }
        }

        let route = route();
        let events =
            vec![TrafficEvent::new(Severity::High, ["a"]).with_relevance(Arc::new(Never))];

        let result = annotate_segments(
            segments(&route),
            &events,
            &route,
            SeverityResolution::LastWriteWins,
        );

        assert!(result.iter().all(|s| s.severity == Severity::Normal));
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let route = route();
        let events = vec![TrafficEvent::new(Severity::Moderate, ["nope"])];

        let result = annotate_segments(
            segments(&route),
            &events,
            &route,
            SeverityResolution::LastWriteWins,
        );

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|s| s.severity == Severity::Normal));
    }

    #[test]
    fn test_last_write_wins() {
        let route = route();
        let events = vec![
            TrafficEvent::new(Severity::High, ["b"]),
            TrafficEvent::new(Severity::Low, ["b"]),
        ];

        let result = annotate_segments(
            segments(&route),
            &events,
            &route,
            SeverityResolution::LastWriteWins,
        );

        assert_eq!(result[1].severity, Severity::Low);
    }

    #[test]
    fn test_most_severe_wins() {
        let route = route();
        let events = vec![
            TrafficEvent::new(Severity::High, ["b"]),
            TrafficEvent::new(Severity::Low, ["b"]),
            TrafficEvent::new(Severity::Unknown, ["b"]),
        ];

        let result = annotate_segments(
            segments(&route),
            &events,
            &route,
            SeverityResolution::MostSevere,
        );

        assert_eq!(result[1].severity, Severity::High);
    }

    #[test]
    fn test_duplicate_ids_are_all_annotated() {
        let route = Route::new(
            300.0,
            vec![
                RouteElement::identified("a", 100.0),
                RouteElement::identified("b", 100.0),
                RouteElement::identified("a", 100.0),
            ],
        );
        let events = vec![TrafficEvent::new(Severity::Moderate, ["a"])];

        let result = annotate_segments(
            segments(&route),
            &events,
            &route,
            SeverityResolution::LastWriteWins,
        );

        assert_eq!(
            severities(&result),
            vec![Severity::Moderate, Severity::Normal, Severity::Moderate]
        );
    }
}
