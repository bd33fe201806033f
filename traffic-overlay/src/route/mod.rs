//! Route model consumed by the overlay engine.
//!
//! A [`Route`] is produced by an external routing service and is treated as
//! read-only input. The engine only needs the total length and the ordered
//! sequence of [`RouteElement`]s, each carrying a geometry length and
//! (usually) a stable [`ElementId`] used to correlate traffic events with the
//! route independently of geometry.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::OverlayError;

/// Stable, map-matched identifier of a route element.
///
/// Cloning is cheap; the underlying string is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Arc<str>);

impl ElementId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

/// One geometric unit of a calculated route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteElement {
    /// Stable identifier, if the routing service could map-match the element.
    #[serde(default)]
    pub id: Option<ElementId>,

    /// Length of the element's geometry in meters.
    pub geometry_length_m: f64,
}

impl RouteElement {
    /// Create an element with a stable identifier.
    pub fn identified(id: impl Into<ElementId>, geometry_length_m: f64) -> Self {
        Self {
            id: Some(id.into()),
            geometry_length_m,
        }
    }

    /// Create an element the routing service could not identify.
    pub fn unidentified(geometry_length_m: f64) -> Self {
        Self {
            id: None,
            geometry_length_m,
        }
    }
}

/// A calculated route: total length plus ordered geometry elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Total route length in meters.
    pub length_m: f64,

    /// Route elements in driving order.
    #[serde(default)]
    pub elements: Vec<RouteElement>,
}

impl Route {
    /// Create a route from its length and ordered elements.
    pub fn new(length_m: f64, elements: Vec<RouteElement>) -> Self {
        Self { length_m, elements }
    }

    /// Route elements in driving order.
    pub fn elements(&self) -> &[RouteElement] {
        &self.elements
    }

    /// Returns true if any element of this route carries `id`.
    pub fn contains_element(&self, id: &ElementId) -> bool {
        self.elements.iter().any(|e| e.id.as_ref() == Some(id))
    }

    /// Check the invariants the overlay pipeline relies on.
    ///
    /// The route length must be finite and positive and every element length
    /// must be finite and non-negative.
    pub fn validate(&self) -> Result<(), OverlayError> {
        if !self.length_m.is_finite() || self.length_m <= 0.0 {
            return Err(OverlayError::InvalidRoute(format!(
                "route length must be finite and positive, got {}",
                self.length_m
            )));
        }

        if let Some((index, element)) = self
            .elements
            .iter()
            .enumerate()
            .find(|(_, e)| !e.geometry_length_m.is_finite() || e.geometry_length_m < 0.0)
        {
            return Err(OverlayError::InvalidRoute(format!(
                "element {} has invalid geometry length {}",
                index, element.geometry_length_m
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_id_display_and_eq() {
        let a = ElementId::new("link-42");
        let b: ElementId = "link-42".into();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "link-42");
        assert_eq!(a.as_str(), "link-42");
    }

    #[test]
    fn test_contains_element() {
        let route = Route::new(
            100.0,
            vec![
                RouteElement::identified("a", 60.0),
                RouteElement::unidentified(40.0),
            ],
        );
        assert!(route.contains_element(&"a".into()));
        assert!(!route.contains_element(&"b".into()));
    }

    #[test]
    fn test_validate_accepts_well_formed_route() {
        let route = Route::new(100.0, vec![RouteElement::identified("a", 100.0)]);
        assert!(route.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_length() {
        assert!(Route::new(0.0, vec![]).validate().is_err());
        assert!(Route::new(-5.0, vec![]).validate().is_err());
        assert!(Route::new(f64::NAN, vec![]).validate().is_err());
        assert!(Route::new(f64::INFINITY, vec![]).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_element_length() {
        let route = Route::new(
            100.0,
            vec![
                RouteElement::identified("a", 50.0),
                RouteElement::identified("b", -1.0),
            ],
        );
        let err = route.validate().unwrap_err();
        assert!(err.to_string().contains("element 1"));
    }

    #[test]
    fn test_route_deserializes_missing_ids() {
        let route: Route = serde_json::from_str(
            r#"{"length_m": 10.0, "elements": [{"geometry_length_m": 10.0}]}"#,
        )
        .unwrap();
        assert_eq!(route.elements[0].id, None);
    }

    #[test]
    fn test_element_id_serializes_as_plain_string() {
        let id = ElementId::new("link-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"link-7\"");

        let parsed: ElementId = serde_json::from_str("\"link-7\"").unwrap();
        assert_eq!(parsed, id);
    }
}
