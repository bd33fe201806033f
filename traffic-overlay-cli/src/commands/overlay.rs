//! Overlay command - compute one overlay from a route and an events snapshot.

use std::path::PathBuf;

use tracing::debug;
use traffic_overlay::compute_overlay;

use super::common::{build_config, ElementPolicy, Resolution};
use super::input::{load_events, load_route};
use super::output::render_overlay;
use crate::error::CliError;

/// Arguments for the overlay command.
pub struct OverlayArgs {
    pub route: PathBuf,
    pub events: PathBuf,
    pub policy: ElementPolicy,
    pub resolution: Resolution,
    pub json: bool,
}

/// Run the overlay command.
pub fn run(args: OverlayArgs) -> Result<(), CliError> {
    let route = load_route(&args.route)?;
    let events = load_events(&args.events)?;
    let config = build_config(args.policy, args.resolution, None);

    debug!(
        elements = route.elements.len(),
        events = events.len(),
        "Computing traffic overlay"
    );

    let overlay = compute_overlay(&route, &events, &config)?;
    println!("{}", render_overlay(&overlay, args.json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn args(route: &NamedTempFile, events: &NamedTempFile) -> OverlayArgs {
        OverlayArgs {
            route: route.path().to_path_buf(),
            events: events.path().to_path_buf(),
            policy: ElementPolicy::default(),
            resolution: Resolution::default(),
            json: true,
        }
    }

    #[test]
    fn test_run_with_valid_inputs() {
        let route = temp_file(
            r#"{ "length_m": 100.0, "elements": [ { "id": "a", "geometry_length_m": 100.0 } ] }"#,
        );
        let events = temp_file(r#"[ { "severity": "low", "affected_element_ids": ["a"] } ]"#);

        assert!(run(args(&route, &events)).is_ok());
    }

    #[test]
    fn test_run_rejects_invalid_route() {
        let route = temp_file(r#"{ "length_m": 0.0, "elements": [] }"#);
        let events = temp_file("[]");

        let err = run(args(&route, &events)).unwrap_err();
        assert!(matches!(err, CliError::Overlay(_)));
    }

    #[test]
    fn test_run_reports_unreadable_events() {
        let route = temp_file(r#"{ "length_m": 10.0, "elements": [] }"#);
        let events = temp_file("not json");

        let err = run(args(&route, &events)).unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
    }
}
