//! JSON input files: routes, event snapshots and a file-backed event source.
//!
//! Route file:
//!
//! ```text
//! { "length_m": 1000.0,
//!   "elements": [ { "id": "a", "geometry_length_m": 300.0 }, ... ] }
//! ```
//!
//! Events file:
//!
//! ```text
//! [ { "severity": "high", "affected_element_ids": ["b"] }, ... ]
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::{self, BoxFuture, FutureExt};
use serde::Deserialize;
use tracing::debug;
use traffic_overlay::{
    ElementId, FetchError, RequestError, RequestHandle, Route, RouteElement, Severity,
    TrafficEvent, TrafficEventSource, UpdateRequest,
};

use crate::error::CliError;

/// One event as written in an events file.
#[derive(Debug, Deserialize)]
struct EventRecord {
    severity: Severity,
    #[serde(default)]
    affected_element_ids: Vec<ElementId>,
}

impl From<EventRecord> for TrafficEvent {
    fn from(record: EventRecord) -> Self {
        TrafficEvent::new(record.severity, record.affected_element_ids).relevant_when_on_route()
    }
}

/// Parse an events document.
///
/// Events from files are relevant to a route when they touch one of its
/// elements.
pub fn parse_events(json: &str) -> Result<Vec<TrafficEvent>, serde_json::Error> {
    let records: Vec<EventRecord> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(TrafficEvent::from).collect())
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a route file.
pub fn load_route(path: &Path) -> Result<Route, CliError> {
    let text = read(path)?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load an events file.
pub fn load_events(path: &Path) -> Result<Vec<TrafficEvent>, CliError> {
    let text = read(path)?;
    parse_events(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Event source re-reading an events file on every fetch.
///
/// There is no upstream to refresh, so update requests complete at once.
#[derive(Debug)]
pub struct FileEventSource {
    path: PathBuf,
    next_request: AtomicU64,
}

impl FileEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            next_request: AtomicU64::new(0),
        }
    }
}

impl TrafficEventSource for FileEventSource {
    fn fetch_events<'a>(
        &'a self,
        _route: &'a Route,
    ) -> BoxFuture<'a, Result<Vec<TrafficEvent>, FetchError>> {
        async move {
            let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
                FetchError::Unavailable(format!("{}: {}", self.path.display(), e))
            })?;
            parse_events(&text)
                .map_err(|e| FetchError::Failed(format!("{}: {}", self.path.display(), e)))
        }
        .boxed()
    }

    fn request_update(&self, elements: &[RouteElement]) -> Result<UpdateRequest, RequestError> {
        let handle = RequestHandle(self.next_request.fetch_add(1, Ordering::Relaxed));
        debug!(request = %handle, elements = elements.len(), "File source update requested");
        Ok(UpdateRequest::new(handle, future::ready(Ok(())).boxed()))
    }

    fn cancel_request(&self, handle: RequestHandle) {
        debug!(request = %handle, "File source update cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ROUTE_JSON: &str = r#"{
        "length_m": 1000.0,
        "elements": [
            { "id": "a", "geometry_length_m": 300.0 },
            { "id": null, "geometry_length_m": 50.0 },
            { "id": "b", "geometry_length_m": 400.0 }
        ]
    }"#;

    const EVENTS_JSON: &str = r#"[
        { "severity": "high", "affected_element_ids": ["b"] },
        { "severity": "moderate", "affected_element_ids": ["elsewhere"] }
    ]"#;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_route() {
        let file = temp_file(ROUTE_JSON);
        let route = load_route(file.path()).unwrap();

        assert_eq!(route.length_m, 1000.0);
        assert_eq!(route.elements.len(), 3);
        assert_eq!(route.elements[1].id, None);
    }

    #[test]
    fn test_load_route_missing_file() {
        let err = load_route(Path::new("/nonexistent/route.json")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn test_load_route_bad_json() {
        let file = temp_file("{ not json");
        let err = load_route(file.path()).unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
    }

    #[test]
    fn test_events_are_relevant_only_when_on_route() {
        let file = temp_file(ROUTE_JSON);
        let route = load_route(file.path()).unwrap();
        let events = parse_events(EVENTS_JSON).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].severity(), Severity::High);
        assert!(events[0].relevant_to_route(&route));
        assert!(!events[1].relevant_to_route(&route));
    }

    #[tokio::test]
    async fn test_file_source_rereads_file() {
        let file = temp_file(EVENTS_JSON);
        let source = FileEventSource::new(file.path());
        let route = Route::new(10.0, vec![]);

        assert_eq!(source.fetch_events(&route).await.unwrap().len(), 2);

        std::fs::write(file.path(), "[]").unwrap();
        assert!(source.fetch_events(&route).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_fetch_error() {
        let source = FileEventSource::new("/nonexistent/events.json");
        let route = Route::new(10.0, vec![]);

        let err = source.fetch_events(&route).await.unwrap_err();
        assert!(matches!(err, FetchError::Unavailable(_)));
    }
}
