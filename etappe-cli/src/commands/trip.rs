//! Route and stage planning commands.

use std::path::Path;

use clap::Args;
use etappe::polyline;
use etappe::trip::{RoutePlan, TripRequest, Waypoint};
use serde::Serialize;

use crate::error::CliError;
use crate::output::{round_km, waypoint_summary, Output, StagePlanView};
use crate::runner::CliRunner;

/// Start, end and optional stops of a trip.
#[derive(Debug, Args)]
pub struct WaypointArgs {
    /// Start: place name or "lat,lon"
    #[arg(allow_hyphen_values = true)]
    pub from: String,

    /// Destination: place name or "lat,lon"
    #[arg(allow_hyphen_values = true)]
    pub to: String,

    /// Intermediate stop, in order (repeatable)
    #[arg(long = "via", value_name = "WAYPOINT", allow_hyphen_values = true)]
    pub via: Vec<String>,
}

impl WaypointArgs {
    fn to_request(&self) -> Result<TripRequest, CliError> {
        let stops = self
            .via
            .iter()
            .map(|s| s.parse::<Waypoint>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TripRequest::new(self.from.parse()?, self.to.parse()?).with_stops(stops))
    }
}

#[derive(Debug, Args)]
pub struct RouteArgs {
    #[command(flatten)]
    pub waypoints: WaypointArgs,

    /// Print the geometry as an encoded polyline instead of a point list
    #[arg(long)]
    pub polyline: bool,
}

#[derive(Debug, Args)]
pub struct StagesArgs {
    #[command(flatten)]
    pub waypoints: WaypointArgs,

    /// Target stage length in km (default: [stages] length_km).
    /// 0 or less gives one stage per leg
    #[arg(long, value_name = "KM", allow_negative_numbers = true)]
    pub length: Option<f64>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Geometry {
    Points(Vec<etappe::coord::GeoPoint>),
    Polyline(String),
}

#[derive(Serialize)]
struct RouteView<'a> {
    distance_km: f64,
    waypoints: &'a [etappe::trip::ResolvedWaypoint],
    geometry: Geometry,
}

/// Run `etappe route`.
pub fn run_route(config_path: Option<&Path>, out: &Output, args: RouteArgs) -> Result<(), CliError> {
    let request = args.waypoints.to_request()?;
    let runner = CliRunner::new(config_path)?;
    let plan = runner.planner()?.plan_route(&request)?;

    let geometry = if args.polyline {
        Geometry::Polyline(encode_geometry(&plan)?)
    } else {
        Geometry::Points(plan.points.clone())
    };
    let view = RouteView {
        distance_km: round_km(plan.distance_km),
        waypoints: &plan.waypoints,
        geometry,
    };

    out.emit(&view, || {
        let mut text = format!(
            "{}\n{:.1} km, {} points",
            waypoint_summary(&plan.waypoints),
            view.distance_km,
            plan.points.len()
        );
        if let Geometry::Polyline(encoded) = &view.geometry {
            text.push('\n');
            text.push_str(encoded);
        }
        text
    })
}

/// Route geometry as a 3-D polyline when every point has an elevation,
/// 2-D otherwise.
fn encode_geometry(plan: &RoutePlan) -> Result<String, CliError> {
    let with_elevation: Option<Vec<(f64, f64, f64)>> = plan
        .points
        .iter()
        .map(|p| p.elevation.map(|ele| (p.lon, p.lat, ele)))
        .collect();

    let encoded = match with_elevation {
        Some(triples) => polyline::encode(&triples),
        None => {
            let pairs: Vec<(f64, f64)> = plan.points.iter().map(|p| (p.lon, p.lat)).collect();
            polyline::encode_2d(&pairs)
        }
    };
    encoded.map_err(|e| CliError::InvalidInput(e.to_string()))
}

/// Run `etappe stages`.
pub fn run_stages(
    config_path: Option<&Path>,
    out: &Output,
    args: StagesArgs,
) -> Result<(), CliError> {
    let request = args.waypoints.to_request()?;
    let runner = CliRunner::new(config_path)?;

    let length = stage_length(args.length, runner.config().stages.length_km)?;
    let plan = runner.planner()?.plan_stages(&request, length)?;
    let view = StagePlanView::new(&plan);
    out.emit(&view, || {
        format!("{}\n{}", waypoint_summary(&plan.waypoints), view.to_text())
    })
}

/// Stage length from the flag, else the config.
///
/// Zero or less is passed through and gives one stage per leg.
fn stage_length(flag: Option<f64>, configured: f64) -> Result<f64, CliError> {
    let length = flag.unwrap_or(configured);
    if !length.is_finite() {
        return Err(CliError::InvalidInput(format!(
            "stage length must be a finite number of km, got {}",
            length
        )));
    }
    Ok(length)
}
