//! Refresh loop telemetry.
//!
//! Lock-free counters recorded by the scheduler's refresh loop and a
//! point-in-time copy for display or tests.
//!
//! ```text
//! Refresh loop ─────► OverlayMetrics ─────► OverlaySnapshot ─────► Views
//!                     (atomic counters)     (point-in-time copy)
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the overlay refresh loop.
#[derive(Debug, Default)]
pub struct OverlayMetrics {
    cycles_started: AtomicU64,
    deliveries: AtomicU64,
    degraded_deliveries: AtomicU64,
    fetch_failures: AtomicU64,
    request_failures: AtomicU64,
    cancellations: AtomicU64,
}

impl OverlayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A poll cycle was started for a route.
    pub fn cycle_started(&self) {
        self.cycles_started.fetch_add(1, Ordering::Relaxed);
    }

    /// A tick delivered a computed overlay.
    pub fn delivered(&self) {
        self.deliveries.fetch_add(1, Ordering::Relaxed);
    }

    /// A tick failed and delivered an empty overlay.
    pub fn degraded(&self) {
        self.deliveries.fetch_add(1, Ordering::Relaxed);
        self.degraded_deliveries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetch_failed(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn request_failed(&self) {
        self.request_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// A poll cycle unwound on cancellation.
    pub fn cancelled(&self) {
        self.cancellations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            cycles_started: self.cycles_started.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            degraded_deliveries: self.degraded_deliveries.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            request_failures: self.request_failures.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`OverlayMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlaySnapshot {
    /// Poll cycles started (one per `start`).
    pub cycles_started: u64,
    /// Deliveries to the sink, degraded ones included.
    pub deliveries: u64,
    /// Deliveries of an empty overlay after a failed tick.
    pub degraded_deliveries: u64,
    pub fetch_failures: u64,
    pub request_failures: u64,
    /// Poll cycles that ended through cancellation.
    pub cancellations: u64,
}
