//! Periodic traffic overlay delivery.
//!
//! The [`OverlayScheduler`] owns at most one active poll cycle. Each cycle is
//! a background task that:
//! - fetches the events already known for the route and delivers a first overlay
//! - then, every refresh interval, requests fresh traffic upstream, fetches
//!   events again and delivers the recomputed overlay
//!
//! # State Machine
//!
//! ```text
//! Idle --start--> Running --tick--> Running
//! Running --stop / start(new route)--> Cancelled
//! ```
//!
//! Failed ticks deliver an empty overlay and the loop carries on.
//! Deliveries run on the cycle task, one at a time, through a sink it owns.
//! Cancellation ends the loop; no delivery happens once a cycle has observed
//! it. A superseding cycle waits for the cancelled one to unwind before its
//! first tick.
//!
//! # Example
//!
//! ```ignore
//! use traffic_overlay::scheduler::{ChannelSink, OverlayScheduler};
//!
//! let scheduler = OverlayScheduler::from_current(OverlayConfig::default())?;
//! let (sink, mut deliveries) = ChannelSink::new();
//! scheduler.start(route, source, sink)?;
//!
//! while let Some(overlay) = deliveries.recv().await {
//!     render(&overlay);
//! }
//!
//! scheduler.shutdown().await;
//! ```

mod sink;
mod worker;

pub use sink::{ChannelSink, OverlaySink};

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::OverlayConfig;
use crate::error::OverlayError;
use crate::route::Route;
use crate::source::TrafficEventSource;
use crate::telemetry::{OverlayMetrics, OverlaySnapshot};

use worker::RefreshWorker;

/// The running refresh loop for one route.
struct PollCycle {
    route: Arc<Route>,
    cancellation: CancellationToken,
    task: JoinHandle<()>,
}

/// Cycle bookkeeping guarded by the scheduler's mutex.
#[derive(Default)]
struct CycleSlot {
    /// The cycle currently delivering.
    active: Option<PollCycle>,
    /// Task of a stopped cycle that may still be unwinding.
    stopping: Option<JoinHandle<()>>,
}

impl CycleSlot {
    /// Cancel whatever is running and return the task the next cycle must
    /// wait for.
    fn cancel_current(&mut self) -> Option<JoinHandle<()>> {
        match self.active.take() {
            Some(cycle) => {
                cycle.cancellation.cancel();
                Some(cycle.task)
            }
            None => self.stopping.take(),
        }
    }
}

/// Drives periodic overlay computation for one route at a time.
pub struct OverlayScheduler {
    config: OverlayConfig,
    runtime: Handle,
    metrics: Arc<OverlayMetrics>,
    slot: Mutex<CycleSlot>,
}

impl std::fmt::Debug for OverlayScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayScheduler")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl OverlayScheduler {
    /// Create a scheduler spawning its cycles on `runtime`.
    pub fn new(config: OverlayConfig, runtime: Handle) -> Self {
        Self {
            config,
            runtime,
            metrics: Arc::new(OverlayMetrics::new()),
            slot: Mutex::new(CycleSlot::default()),
        }
    }

    /// Create a scheduler on the runtime of the calling context.
    pub fn from_current(config: OverlayConfig) -> Result<Self, OverlayError> {
        let runtime = Handle::try_current().map_err(|e| OverlayError::NoRuntime(e.to_string()))?;
        Ok(Self::new(config, runtime))
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Begin delivering overlays for `route` to `sink`.
    ///
    /// Any running cycle is cancelled first. The route is validated before
    /// anything is cancelled or spawned.
    pub fn start(
        &self,
        route: Route,
        source: Arc<dyn TrafficEventSource>,
        sink: impl OverlaySink,
    ) -> Result<(), OverlayError> {
        route.validate()?;
        let route = Arc::new(route);
        let cancellation = CancellationToken::new();

        let mut slot = self.slot.lock();
        if slot.active.is_some() {
            debug!("Superseding running traffic overlay cycle");
        }
        let previous = slot.cancel_current();

        let worker = RefreshWorker {
            route: Arc::clone(&route),
            source,
            config: self.config.clone(),
            metrics: Arc::clone(&self.metrics),
            cancellation: cancellation.clone(),
        };
        let task = self.runtime.spawn(worker.run(Box::new(sink), previous));

        info!(route_length_m = route.length_m, "Traffic overlay started");
        slot.active = Some(PollCycle {
            route,
            cancellation,
            task,
        });
        Ok(())
    }

    /// Cancel the running cycle, if any.
    ///
    /// Returns `false` when nothing was running. The cycle unwinds in the
    /// background: a tick that passed its last cancellation check just
    /// before this call may still reach the sink once. Use
    /// [`shutdown`](Self::shutdown) when no delivery may follow.
    pub fn stop(&self) -> bool {
        let mut slot = self.slot.lock();
        match slot.active.take() {
            Some(cycle) => {
                cycle.cancellation.cancel();
                slot.stopping = Some(cycle.task);
                info!("Traffic overlay stopped");
                true
            }
            None => false,
        }
    }

    /// Cancel the running cycle and wait until its task has finished.
    ///
    /// Once this returns the sink has been dropped and receives nothing more.
    pub async fn shutdown(&self) {
        let task = self.slot.lock().cancel_current();
        if let Some(task) = task {
            let _ = task.await;
            info!("Traffic overlay shut down");
        }
    }

    /// Returns true while a cycle is active.
    pub fn is_running(&self) -> bool {
        self.slot
            .lock()
            .active
            .as_ref()
            .is_some_and(|cycle| !cycle.task.is_finished())
    }

    /// The route of the active cycle.
    pub fn active_route(&self) -> Option<Arc<Route>> {
        self.slot
            .lock()
            .active
            .as_ref()
            .map(|cycle| Arc::clone(&cycle.route))
    }

    /// Snapshot of the refresh loop counters.
    pub fn metrics(&self) -> OverlaySnapshot {
        self.metrics.snapshot()
    }
}

impl Drop for OverlayScheduler {
    fn drop(&mut self) {
        let _ = self.slot.get_mut().cancel_current();
    }
}
