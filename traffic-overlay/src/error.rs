//! Error types for the overlay engine.
//!
//! Only [`OverlayError`] ever reaches the caller of
//! [`OverlayScheduler::start`](crate::scheduler::OverlayScheduler::start).
//! Event-source failures ([`FetchError`], [`RequestError`]) are recovered
//! inside the refresh loop and degrade a single tick to an empty overlay.

use thiserror::Error;

/// Errors surfaced to the caller of the overlay engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OverlayError {
    /// The route violates an invariant the pipeline relies on.
    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    /// No Tokio runtime is available to run the refresh loop.
    #[error("No Tokio runtime available: {0}")]
    NoRuntime(String),
}

/// Retrieving current traffic events failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The event source could not be reached.
    #[error("Traffic event source unavailable: {0}")]
    Unavailable(String),

    /// The event source answered with an error.
    #[error("Traffic event fetch failed: {0}")]
    Failed(String),
}

/// Requesting fresh traffic computation failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RequestError {
    /// The event source refused to start the request.
    #[error("Traffic update request rejected: {0}")]
    Rejected(String),

    /// The request was accepted but did not complete successfully.
    #[error("Traffic update request failed: {0}")]
    Failed(String),
}

/// Outcome of a single refresh cycle that did not produce intervals.
///
/// Cancellation is kept apart from the recoverable variants so the refresh
/// loop can unwind on it without the generic degrade path ever seeing it.
#[derive(Debug, Error)]
pub(crate) enum CycleError {
    #[error("cycle cancelled")]
    Cancelled,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Request(#[from] RequestError),
}
