//! Place lookup commands.

use std::path::Path;

use etappe::coord::parse_lat_lon;
use serde_json::json;

use crate::error::CliError;
use crate::output::Output;
use crate::runner::CliRunner;

/// Run `etappe geocode`.
pub fn run_geocode(config_path: Option<&Path>, out: &Output, text: &str) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path)?;
    let place = runner.planner()?.geocode(text)?;

    out.emit(&place, || format!("{}\n  {}", place.label, place.point))
}

/// Run `etappe reverse`.
pub fn run_reverse(
    config_path: Option<&Path>,
    out: &Output,
    coordinate: &str,
) -> Result<(), CliError> {
    let point = parse_lat_lon(coordinate).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let runner = CliRunner::new(config_path)?;
    let label = runner.planner()?.reverse(&point)?;

    out.emit(&json!({ "point": point, "label": label }), || {
        label
            .clone()
            .unwrap_or_else(|| format!("No place found near {}", point))
    })
}

/// Run `etappe autocomplete`.
pub fn run_autocomplete(
    config_path: Option<&Path>,
    out: &Output,
    text: &str,
) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path)?;
    let places = runner.planner()?.autocomplete(text)?;

    out.emit(&places, || {
        if places.is_empty() {
            return "No suggestions".to_string();
        }
        places
            .iter()
            .map(|p| format!("{}  ({})", p.label, p.point))
            .collect::<Vec<_>>()
            .join("\n")
    })
}
