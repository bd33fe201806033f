//! Traffic Overlay - Route traffic severity overlays
//!
//! This library computes, for a calculated route, the stretches of the route
//! affected by traffic and their severity, expressed as fractions of the
//! route length so a renderer can color the route line.
//!
//! # Modules
//!
//! - [`route`] / [`traffic`]: input model (route elements, traffic events)
//! - [`overlay`]: the pure index → annotate → merge → normalize pipeline
//! - [`source`]: the event source abstraction the engine consumes
//! - [`scheduler`]: the cancellable periodic refresh loop
//! - [`telemetry`], [`logging`]: observability

pub mod config;
pub mod error;
pub mod logging;
pub mod overlay;
pub mod route;
pub mod scheduler;
pub mod source;
pub mod telemetry;
pub mod traffic;

pub use config::OverlayConfig;
pub use error::{FetchError, OverlayError, RequestError};
pub use overlay::{compute_overlay, RouteTrafficInterval};
pub use route::{ElementId, Route, RouteElement};
pub use scheduler::{ChannelSink, OverlayScheduler, OverlaySink};
pub use source::{RequestHandle, TrafficEventSource, UpdateRequest};
pub use traffic::{Severity, TrafficEvent};
