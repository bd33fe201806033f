//! In-process traffic event source.

use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{FetchError, RequestError};
use crate::route::{Route, RouteElement};
use crate::traffic::TrafficEvent;

use super::{RequestHandle, TrafficEventSource, UpdateRequest};

/// Event source backed by an in-memory event list.
///
/// Fetches return a snapshot of the current list. Update requests complete
/// immediately; the list only changes through [`set_events`](Self::set_events).
#[derive(Debug, Default)]
pub struct InMemoryEventSource {
    events: RwLock<Vec<TrafficEvent>>,
    next_request: AtomicU64,
    requests: AtomicU64,
    cancellations: AtomicU64,
}

impl InMemoryEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding `events`.
    pub fn with_events(events: Vec<TrafficEvent>) -> Self {
        Self {
            events: RwLock::new(events),
            ..Self::default()
        }
    }

    /// Replace the current event list.
    pub fn set_events(&self, events: Vec<TrafficEvent>) {
        *self.events.write() = events;
    }

    /// Number of update requests accepted so far.
    pub fn update_requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Number of cancellations received so far.
    pub fn cancellations(&self) -> u64 {
        self.cancellations.load(Ordering::Relaxed)
    }
}

impl TrafficEventSource for InMemoryEventSource {
    fn fetch_events<'a>(
        &'a self,
        _route: &'a Route,
    ) -> BoxFuture<'a, Result<Vec<TrafficEvent>, FetchError>> {
        let events = self.events.read().clone();
        future::ready(Ok(events)).boxed()
    }

    fn request_update(&self, elements: &[RouteElement]) -> Result<UpdateRequest, RequestError> {
        let handle = RequestHandle(self.next_request.fetch_add(1, Ordering::Relaxed));
        self.requests.fetch_add(1, Ordering::Relaxed);
        debug!(request = %handle, elements = elements.len(), "Update request accepted");
        Ok(UpdateRequest::new(handle, future::ready(Ok(())).boxed()))
    }

    fn cancel_request(&self, handle: RequestHandle) {
        self.cancellations.fetch_add(1, Ordering::Relaxed);
        debug!(request = %handle, "Update request cancelled");
    }
}
