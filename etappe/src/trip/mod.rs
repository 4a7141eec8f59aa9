//! Trip assembly.
//!
//! [`TripPlanner`] resolves waypoints through geocoding, fetches the route,
//! splits it into stages and attaches elevation statistics to each stage.
//! Stages are reconciled in parallel since their lookups are independent.

mod planner;
mod types;

pub use planner::TripPlanner;
pub use types::{
    CacheTtls, PlannedStage, ResolvedWaypoint, RoutePlan, StagePlan, TripError, TripRequest,
    Waypoint, DEFAULT_STAGE_LENGTH_KM,
};
