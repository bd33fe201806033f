//! The refresh loop run by one poll cycle.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::OverlayConfig;
use crate::error::CycleError;
use crate::overlay::{compute_validated_overlay, RouteTrafficInterval};
use crate::route::Route;
use crate::source::TrafficEventSource;
use crate::telemetry::OverlayMetrics;
use crate::traffic::TrafficEvent;

use super::OverlaySink;

/// State owned by the background task of one poll cycle.
pub(super) struct RefreshWorker {
    pub(super) route: Arc<Route>,
    pub(super) source: Arc<dyn TrafficEventSource>,
    pub(super) config: OverlayConfig,
    pub(super) metrics: Arc<OverlayMetrics>,
    pub(super) cancellation: CancellationToken,
}

impl RefreshWorker {
    /// Run ticks until cancelled, delivering each overlay to `sink`.
    ///
    /// `previous` is the task of the cycle this one superseded. It has
    /// already been cancelled and is awaited before the first tick so two
    /// cycles of one scheduler never deliver concurrently. The sink lives
    /// and dies with this task.
    pub(super) async fn run(
        self,
        mut sink: Box<dyn OverlaySink>,
        previous: Option<JoinHandle<()>>,
    ) {
        if let Some(previous) = previous {
            let _ = previous.await;
        }

        self.metrics.cycle_started();
        info!(
            route_length_m = self.route.length_m,
            elements = self.route.elements().len(),
            refresh_secs = self.config.refresh_interval.as_secs_f64(),
            "Traffic overlay cycle starting"
        );

        let mut tick: u64 = 0;
        loop {
            if tick > 0 {
                tokio::select! {
                    biased;
                    _ = self.cancellation.cancelled() => break,
                    _ = tokio::time::sleep(self.config.effective_refresh_interval()) => {}
                }
            }

            let (intervals, degraded) = match self.refresh(tick > 0).await {
                Ok(intervals) => (intervals, false),
                Err(CycleError::Cancelled) => break,
                Err(error) => {
                    match &error {
                        CycleError::Fetch(_) => self.metrics.fetch_failed(),
                        CycleError::Request(_) => self.metrics.request_failed(),
                        CycleError::Cancelled => {}
                    }
                    warn!(tick, error = %error, "Traffic refresh failed, delivering empty overlay");
                    (Vec::new(), true)
                }
            };

            // No await between this check and the delivery.
            if self.cancellation.is_cancelled() {
                break;
            }
            if degraded {
                self.metrics.degraded();
            } else {
                self.metrics.delivered();
            }
            debug!(tick, intervals = intervals.len(), "Traffic overlay delivered");
            sink.deliver(intervals);

            tick += 1;
        }

        self.metrics.cancelled();
        info!(ticks = tick, "Traffic overlay cycle stopped");
    }

    /// One tick: optionally request fresh data, fetch events, compute.
    async fn refresh(&self, request_fresh: bool) -> Result<Vec<RouteTrafficInterval>, CycleError> {
        if self.cancellation.is_cancelled() {
            return Err(CycleError::Cancelled);
        }

        if request_fresh {
            self.request_update().await?;
        }

        let events = self.fetch_events().await?;
        Ok(compute_validated_overlay(&self.route, &events, &self.config))
    }

    async fn request_update(&self) -> Result<(), CycleError> {
        let request = self.source.request_update(self.route.elements())?;
        let handle = request.handle;

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                debug!(request = %handle, "Cancelling in-flight update request");
                self.source.cancel_request(handle);
                Err(CycleError::Cancelled)
            }
            result = request.completion => {
                debug!(request = %handle, ok = result.is_ok(), "Update request finished");
                result.map_err(CycleError::from)
            }
        }
    }

    async fn fetch_events(&self) -> Result<Vec<TrafficEvent>, CycleError> {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(CycleError::Cancelled),
            result = self.source.fetch_events(&self.route) => {
                let events = result?;
                debug!(events = events.len(), "Traffic events fetched");
                Ok(events)
            }
        }
    }
}
