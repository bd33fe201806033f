//! Delivery targets for computed overlays.

use tokio::sync::mpsc;

use crate::overlay::RouteTrafficInterval;

/// Receives the overlay computed on each refresh tick.
///
/// The sink is owned by the refresh task of its cycle and called through
/// `&mut self`, one tick after another, so it may keep plain mutable state.
/// Calls happen on that task, which can move between runtime worker
/// threads; use [`ChannelSink`] to receive deliveries on a context of your
/// own, such as a UI loop.
pub trait OverlaySink: Send + 'static {
    fn deliver(&mut self, intervals: Vec<RouteTrafficInterval>);
}

impl<F> OverlaySink for F
where
    F: FnMut(Vec<RouteTrafficInterval>) + Send + 'static,
{
    fn deliver(&mut self, intervals: Vec<RouteTrafficInterval>) {
        self(intervals)
    }
}

/// Sink that forwards every delivery over an unbounded channel.
///
/// Lets a single consumer context pick deliveries up on its own schedule.
/// Deliveries after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Vec<RouteTrafficInterval>>,
}

impl ChannelSink {
    /// Create a sink and the receiver its deliveries arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Vec<RouteTrafficInterval>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl OverlaySink for ChannelSink {
    fn deliver(&mut self, intervals: Vec<RouteTrafficInterval>) {
        let _ = self.tx.send(intervals);
    }
}
