//! Position indexing of route elements.

use crate::config::UnidentifiedElementPolicy;
use crate::route::RouteElement;
use crate::traffic::Severity;

use super::RouteElementSegment;

/// Convert ordered route elements into position-indexed segments.
///
/// Folds over the elements with a running offset starting at zero. Every
/// identified element with a positive length becomes a segment starting at
/// the current offset and pushes the offset forward by its length. What an
/// unidentified element does to the offset is decided by `policy`.
///
/// All segments start out as [`Severity::Normal`].
pub fn index_elements(
    elements: &[RouteElement],
    policy: UnidentifiedElementPolicy,
) -> Vec<RouteElementSegment> {
    let (_, segments) = elements.iter().fold(
        (0.0_f64, Vec::with_capacity(elements.len())),
        |(offset, mut segments), element| {
            let length = element.geometry_length_m;
            let next = match (&element.id, policy) {
                (Some(id), _) => {
                    if length > 0.0 {
                        segments.push(RouteElementSegment {
                            id: id.clone(),
                            start_offset_m: offset,
                            length_m: length,
                            severity: Severity::Normal,
                        });
                    }
                    offset + length
                }
                (None, UnidentifiedElementPolicy::Skip) => offset,
                (None, UnidentifiedElementPolicy::AdvanceOffset) => offset + length,
            };
            (next, segments)
        },
    );
    segments
}
