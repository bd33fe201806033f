//! Watch command - run the refresh loop against an events file.
//!
//! The events file is re-read on every tick, so editing it while the command
//! runs changes the next overlay. Ctrl+C stops the loop.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::info;
use traffic_overlay::{ChannelSink, OverlayScheduler, RouteTrafficInterval};

use super::common::{build_config, ElementPolicy, Resolution};
use super::input::{load_route, FileEventSource};
use super::output::render_overlay;
use crate::error::CliError;

/// Arguments for the watch command.
pub struct WatchArgs {
    pub route: PathBuf,
    pub events: PathBuf,
    pub policy: ElementPolicy,
    pub resolution: Resolution,
    pub interval_secs: Option<u64>,
    /// Stop after this many deliveries.
    pub ticks: Option<u64>,
    pub json: bool,
}

/// Run the watch command.
pub fn run(args: WatchArgs) -> Result<(), CliError> {
    let route = load_route(&args.route)?;
    let config = build_config(args.policy, args.resolution, args.interval_secs);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("Received shutdown signal, stopping...");
        signal.cancel();
    })
    .map_err(|e| CliError::Signal(e.to_string()))?;

    println!(
        "Watching {} (refresh every {}s)",
        args.events.display(),
        config.refresh_interval.as_secs()
    );
    println!("Press Ctrl+C to stop");
    println!();

    runtime.block_on(async move {
        let scheduler = OverlayScheduler::new(config, Handle::current());
        let source = Arc::new(FileEventSource::new(&args.events));
        let (sink, mut deliveries) = ChannelSink::new();

        scheduler.start(route, source, sink)?;

        let result = print_deliveries(
            &mut deliveries,
            &shutdown,
            args.ticks,
            args.json,
            &mut std::io::stdout(),
        )
        .await;

        scheduler.shutdown().await;
        let metrics = scheduler.metrics();
        info!(
            deliveries = metrics.deliveries,
            degraded = metrics.degraded_deliveries,
            "Watch finished"
        );
        result.map(|_| ())
    })
}

/// Render deliveries to `out` until `shutdown` fires, the channel closes or
/// `ticks` deliveries have been rendered.
///
/// Returns the number of deliveries rendered.
pub async fn print_deliveries(
    deliveries: &mut UnboundedReceiver<Vec<RouteTrafficInterval>>,
    shutdown: &CancellationToken,
    ticks: Option<u64>,
    json: bool,
    out: &mut impl Write,
) -> Result<u64, CliError> {
    let mut delivered = 0u64;
    while ticks.map_or(true, |limit| delivered < limit) {
        let overlay = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            overlay = deliveries.recv() => overlay,
        };
        let Some(overlay) = overlay else {
            break;
        };

        delivered += 1;
        let rendered = render_overlay(&overlay, json)?;
        if !json {
            writeln!(out, "Tick {}:", delivered)?;
        }
        writeln!(out, "{}", rendered)?;
    }
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::NamedTempFile;
    use traffic_overlay::{OverlayConfig, Route, RouteElement};

    fn events_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"[ { "severity": "high", "affected_element_ids": ["b"] } ]"#)
            .unwrap();
        file
    }

    fn route() -> Route {
        Route::new(
            1000.0,
            vec![
                RouteElement::identified("a", 300.0),
                RouteElement::identified("b", 400.0),
                RouteElement::identified("c", 300.0),
            ],
        )
    }

    #[tokio::test]
    async fn test_stops_after_tick_limit() {
        let events = events_file();
        let scheduler = OverlayScheduler::from_current(
            OverlayConfig::new().with_refresh_interval(Duration::from_millis(100)),
        )
        .unwrap();
        let (sink, mut deliveries) = ChannelSink::new();
        scheduler
            .start(route(), Arc::new(FileEventSource::new(events.path())), sink)
            .unwrap();

        let shutdown = CancellationToken::new();
        let mut out = Vec::new();
        let rendered = print_deliveries(&mut deliveries, &shutdown, Some(2), false, &mut out)
            .await
            .unwrap();
        scheduler.shutdown().await;

        assert_eq!(rendered, 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Tick 1:"));
        assert!(text.contains("Tick 2:"));
        assert!(!text.contains("Tick 3:"));
        assert!(text.contains("high"));
    }

    #[tokio::test]
    async fn test_cancelled_token_exits_cleanly() {
        let events = events_file();
        let scheduler = OverlayScheduler::from_current(OverlayConfig::default()).unwrap();
        let (sink, mut deliveries) = ChannelSink::new();
        scheduler
            .start(route(), Arc::new(FileEventSource::new(events.path())), sink)
            .unwrap();

        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let mut out = Vec::new();
        let rendered = print_deliveries(&mut deliveries, &shutdown, None, true, &mut out)
            .await
            .unwrap();
        scheduler.shutdown().await;

        assert_eq!(rendered, 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_closed_channel_ends_watch() {
        let (sink, mut deliveries) = ChannelSink::new();
        drop(sink);

        let shutdown = CancellationToken::new();
        let mut out = Vec::new();
        let rendered = print_deliveries(&mut deliveries, &shutdown, None, false, &mut out)
            .await
            .unwrap();

        assert_eq!(rendered, 0);
    }
}
