//! Traffic event source abstraction.
//!
//! The overlay engine does not talk to any traffic service directly. It
//! depends on the [`TrafficEventSource`] trait, which exposes the three
//! operations the refresh loop needs:
//!
//! - fetch the events currently known for a route
//! - ask upstream for a fresher computation over the route's elements
//! - cancel such a request by its [`RequestHandle`]
//!
//! Futures are boxed so the trait stays dyn-compatible and sources can be
//! shared as `Arc<dyn TrafficEventSource>`.

mod memory;

pub use memory::InMemoryEventSource;

use std::fmt;

use futures::future::BoxFuture;

use crate::error::{FetchError, RequestError};
use crate::route::{Route, RouteElement};
use crate::traffic::TrafficEvent;

/// Identifier of an in-flight update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestHandle(pub u64);

impl fmt::Display for RequestHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// An accepted update request.
///
/// The handle is known as soon as the request is accepted, so the caller can
/// cancel it while `completion` is still pending.
pub struct UpdateRequest {
    pub handle: RequestHandle,
    pub completion: BoxFuture<'static, Result<(), RequestError>>,
}

impl UpdateRequest {
    pub fn new(
        handle: RequestHandle,
        completion: BoxFuture<'static, Result<(), RequestError>>,
    ) -> Self {
        Self { handle, completion }
    }
}

impl fmt::Debug for UpdateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateRequest")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

/// Provider of traffic events for a route.
pub trait TrafficEventSource: Send + Sync + 'static {
    /// Fetch the events currently known for `route`.
    fn fetch_events<'a>(
        &'a self,
        route: &'a Route,
    ) -> BoxFuture<'a, Result<Vec<TrafficEvent>, FetchError>>;

    /// Ask upstream to recompute traffic for `elements`.
    ///
    /// Returns immediately with the request handle; the returned
    /// [`UpdateRequest::completion`] resolves once upstream is done.
    fn request_update(&self, elements: &[RouteElement]) -> Result<UpdateRequest, RequestError>;

    /// Cancel an in-flight update request. Fire-and-forget.
    fn cancel_request(&self, handle: RequestHandle);
}
