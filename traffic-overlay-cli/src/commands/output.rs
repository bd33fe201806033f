//! Rendering of overlays for the terminal.

use traffic_overlay::RouteTrafficInterval;

use crate::error::CliError;

/// Format one interval as a table row.
pub fn format_interval(interval: &RouteTrafficInterval) -> String {
    format!(
        "{:>6.1}% - {:>6.1}%  {}",
        interval.start_fraction * 100.0,
        interval.end_fraction * 100.0,
        interval.severity
    )
}

/// Render an overlay as a table or as JSON.
pub fn render_overlay(overlay: &[RouteTrafficInterval], json: bool) -> Result<String, CliError> {
    if json {
        return Ok(serde_json::to_string_pretty(overlay)?);
    }

    if overlay.is_empty() {
        return Ok("  (no traffic data)".to_string());
    }

    Ok(overlay
        .iter()
        .map(|i| format!("  {}", format_interval(i)))
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use traffic_overlay::Severity;

    fn overlay() -> Vec<RouteTrafficInterval> {
        vec![
            RouteTrafficInterval {
                start_fraction: 0.0,
                end_fraction: 0.3,
                severity: Severity::Normal,
            },
            RouteTrafficInterval {
                start_fraction: 0.3,
                end_fraction: 1.0,
                severity: Severity::High,
            },
        ]
    }

    #[test]
    fn test_format_interval() {
        let row = format_interval(&overlay()[1]);
        assert_eq!(row, "  30.0% -  100.0%  high");
    }

    #[test]
    fn test_render_table() {
        let text = render_overlay(&overlay(), false).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("normal"));
    }

    #[test]
    fn test_render_empty() {
        assert!(render_overlay(&[], false).unwrap().contains("no traffic data"));
    }

    #[test]
    fn test_render_json() {
        let text = render_overlay(&overlay(), true).unwrap();
        let parsed: Vec<RouteTrafficInterval> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, overlay());
    }
}
