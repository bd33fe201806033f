//! Traffic events and severity levels.
//!
//! A [`TrafficEvent`] names the route elements it affects and the
//! [`Severity`] of the condition. Whether an event matters for a given route
//! is decided by a [`RouteRelevance`] check supplied by whoever produced the
//! event, typically a geometric test owned by the map/traffic provider.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::route::{ElementId, Route};

/// Ordinal traffic-condition level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Free-flowing traffic.
    Normal,
    /// Light congestion.
    Low,
    /// Moderate congestion.
    Moderate,
    /// Heavy congestion.
    High,
    /// The provider reported a condition it could not classify.
    Unknown,
}

impl Severity {
    /// Ranking used when resolving conflicts by severity.
    ///
    /// `Unknown` sits just above `Normal` so an unclassified report never
    /// masks a classified one.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Normal => 0,
            Severity::Unknown => 1,
            Severity::Low => 2,
            Severity::Moderate => 3,
            Severity::High => 4,
        }
    }

    /// Short lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether a traffic event is relevant to a route.
pub trait RouteRelevance: Send + Sync {
    /// Returns true if the event should be applied to `route`.
    fn is_relevant(&self, route: &Route) -> bool;
}

/// Treats every event as relevant.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysRelevant;

impl RouteRelevance for AlwaysRelevant {
    fn is_relevant(&self, _route: &Route) -> bool {
        true
    }
}

/// Relevant when at least one of the given elements lies on the route.
#[derive(Debug, Clone)]
pub struct SharesElements {
    ids: HashSet<ElementId>,
}

impl SharesElements {
    pub fn new(ids: HashSet<ElementId>) -> Self {
        Self { ids }
    }
}

impl RouteRelevance for SharesElements {
    fn is_relevant(&self, route: &Route) -> bool {
        route
            .elements()
            .iter()
            .filter_map(|e| e.id.as_ref())
            .any(|id| self.ids.contains(id))
    }
}

/// A traffic condition reported against a set of route elements.
#[derive(Clone)]
pub struct TrafficEvent {
    severity: Severity,
    affected_element_ids: HashSet<ElementId>,
    relevance: Arc<dyn RouteRelevance>,
}

impl fmt::Debug for TrafficEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrafficEvent")
            .field("severity", &self.severity)
            .field("affected_element_ids", &self.affected_element_ids)
            .finish_non_exhaustive()
    }
}

impl TrafficEvent {
    /// Create an event that is relevant to every route.
    pub fn new<I, T>(severity: Severity, affected: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ElementId>,
    {
        Self {
            severity,
            affected_element_ids: affected.into_iter().map(Into::into).collect(),
            relevance: Arc::new(AlwaysRelevant),
        }
    }

    /// Replace the relevance check.
    pub fn with_relevance(mut self, relevance: Arc<dyn RouteRelevance>) -> Self {
        self.relevance = relevance;
        self
    }

    /// Use [`SharesElements`] over this event's own affected elements.
    pub fn relevant_when_on_route(self) -> Self {
        let check = SharesElements::new(self.affected_element_ids.clone());
        self.with_relevance(Arc::new(check))
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn affected_element_ids(&self) -> &HashSet<ElementId> {
        &self.affected_element_ids
    }

    /// Returns true if this event applies to `route`.
    pub fn relevant_to_route(&self, route: &Route) -> bool {
        self.relevance.is_relevant(route)
    }
}
