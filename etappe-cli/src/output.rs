//! Text and JSON rendering of command results.
//!
//! Distances are rounded to one decimal place here and nowhere else; the
//! library always works with unrounded values.

use serde::Serialize;

use etappe::coord::GeoPoint;
use etappe::elevation::ElevationStats;
use etappe::trip::{PlannedStage, ResolvedWaypoint, StagePlan};

use crate::error::CliError;

/// Where command results go: pretty JSON or human readable text.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Prints `value` as JSON, or the text produced by `text`.
    pub fn emit<T, F>(&self, value: &T, text: F) -> Result<(), CliError>
    where
        T: Serialize,
        F: FnOnce() -> String,
    {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

/// Rounds a distance to one decimal place.
pub fn round_km(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}

/// Formats a byte count with a binary unit suffix.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = "B";
    for candidate in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = candidate;
    }
    format!("{:.1} {}", value, unit)
}

/// One stage as printed by `etappe stages`.
#[derive(Debug, Serialize)]
pub struct StageView {
    pub number: usize,
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub distance_km: f64,
    pub points: usize,
    pub elevation: Option<ElevationStats>,
    pub profile: Vec<f64>,
}

impl StageView {
    pub fn new(number: usize, planned: &PlannedStage) -> Self {
        let stage = &planned.stage;
        Self {
            number,
            start: *stage.start(),
            end: *stage.end(),
            distance_km: round_km(stage.distance_km),
            points: stage.points.len(),
            elevation: stage.elevation.clone(),
            profile: planned.profile.clone(),
        }
    }
}

/// Stage plan as printed by `etappe stages`.
#[derive(Debug, Serialize)]
pub struct StagePlanView {
    pub total_distance_km: f64,
    pub waypoints: Vec<ResolvedWaypoint>,
    pub stages: Vec<StageView>,
}

impl StagePlanView {
    pub fn new(plan: &StagePlan) -> Self {
        Self {
            total_distance_km: round_km(plan.total_distance_km),
            waypoints: plan.waypoints.clone(),
            stages: plan
                .stages
                .iter()
                .enumerate()
                .map(|(i, stage)| StageView::new(i + 1, stage))
                .collect(),
        }
    }

    pub fn to_text(&self) -> String {
        let mut lines = vec![format!(
            "{} stages, {:.1} km total",
            self.stages.len(),
            self.total_distance_km
        )];
        for stage in &self.stages {
            lines.push(String::new());
            lines.push(format!(
                "Stage {}: {:.1} km, {} -> {}",
                stage.number, stage.distance_km, stage.start, stage.end
            ));
            if let Some(stats) = &stage.elevation {
                lines.push(elevation_line(stats));
                if !stats.estimated {
                    let bands: Vec<String> = stats
                        .gradients
                        .bands
                        .iter()
                        .map(|band| match band.upper_m {
                            Some(upper) => format!("{}-{} m: {}", band.lower_m, upper, band.segments),
                            None => format!(">={} m: {}", band.lower_m, band.segments),
                        })
                        .collect();
                    lines.push(format!("  gradients  {}", bands.join(", ")));
                }
            }
        }
        lines.join("\n")
    }
}

fn elevation_line(stats: &ElevationStats) -> String {
    if stats.estimated {
        format!(
            "  elevation  +{:.0} m / -{:.0} m (estimated from distance)",
            stats.gain_m, stats.loss_m
        )
    } else {
        format!(
            "  elevation  +{:.0} m / -{:.0} m, {:.0}-{:.0} m",
            stats.gain_m, stats.loss_m, stats.min_m, stats.max_m
        )
    }
}

/// Waypoint labels joined for a one-line summary.
pub fn waypoint_summary(waypoints: &[ResolvedWaypoint]) -> String {
    waypoints
        .iter()
        .map(|w| w.label.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}
