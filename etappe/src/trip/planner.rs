//! Trip assembly over the providers, segmentation and elevation.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::types::{
    CacheTtls, PlannedStage, ResolvedWaypoint, RoutePlan, StagePlan, TripError, TripRequest,
    Waypoint,
};
use crate::cache::{CacheStore, Category};
use crate::coord::GeoPoint;
use crate::elevation::{
    estimate_from_distance, ElevationConfig, ElevationReconciler, ElevationStats,
};
use crate::provider::{
    autocomplete_eligible, ElevationSource, GeocodingProvider, Place, Route, RouteResponse,
    RoutingProvider,
};
use crate::segment::{segment, Stage};

/// Builds routes and stage plans from named or explicit waypoints.
///
/// Every upstream call goes through the cache under its own category:
/// routes for [`CacheTtls::route`], elevation for [`CacheTtls::elevation`]
/// and all geocoding for [`CacheTtls::geocode`].
pub struct TripPlanner<R, E, G>
where
    R: RoutingProvider,
    E: ElevationSource,
    G: GeocodingProvider,
{
    routing: R,
    geocoding: G,
    elevation: ElevationReconciler<E>,
    cache: CacheStore,
    ttls: CacheTtls,
}

impl<R, E, G> TripPlanner<R, E, G>
where
    R: RoutingProvider,
    E: ElevationSource,
    G: GeocodingProvider,
{
    pub fn new(
        routing: R,
        elevation: E,
        geocoding: G,
        cache: CacheStore,
        ttls: CacheTtls,
        elevation_config: ElevationConfig,
    ) -> Self {
        let elevation =
            ElevationReconciler::new(elevation, cache.clone(), ttls.elevation, elevation_config);
        Self {
            routing,
            geocoding,
            elevation,
            cache,
            ttls,
        }
    }

    /// The cache all lookups go through.
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Top geocoding match for a place name.
    pub fn geocode(&self, text: &str) -> Result<Place, TripError> {
        let request = self.geocoding.search_request(text);
        let place = self
            .cache
            .get_or_fetch(Category::GEOCODE, &request, self.ttls.geocode, || {
                self.geocoding.search(text)
            })?;
        place.ok_or_else(|| TripError::PlaceNotFound(text.to_string()))
    }

    /// Label of the place nearest to `point`.
    pub fn reverse(&self, point: &GeoPoint) -> Result<Option<String>, TripError> {
        let request = self.geocoding.reverse_request(point);
        Ok(self
            .cache
            .get_or_fetch(Category::REVERSE, &request, self.ttls.geocode, || {
                self.geocoding.reverse(point)
            })?)
    }

    /// Candidates for partial input; too-short input returns nothing.
    pub fn autocomplete(&self, text: &str) -> Result<Vec<Place>, TripError> {
        if !autocomplete_eligible(text) {
            return Ok(Vec::new());
        }
        let request = self.geocoding.autocomplete_request(text);
        Ok(self
            .cache
            .get_or_fetch(Category::AUTOCOMPLETE, &request, self.ttls.geocode, || {
                self.geocoding.autocomplete(text)
            })?)
    }

    /// Resolves a waypoint to a coordinate, geocoding place names.
    pub fn resolve(&self, waypoint: &Waypoint) -> Result<ResolvedWaypoint, TripError> {
        match waypoint {
            Waypoint::Coordinate(point) => Ok(ResolvedWaypoint {
                label: point.to_string(),
                point: *point,
            }),
            Waypoint::Place(name) => {
                let place = self.geocode(name)?;
                debug!(query = %name, label = %place.label, "Waypoint resolved");
                Ok(ResolvedWaypoint {
                    label: place.label,
                    point: place.point,
                })
            }
        }
    }

    /// Computes the full route through all waypoints.
    pub fn plan_route(&self, request: &TripRequest) -> Result<RoutePlan, TripError> {
        let (waypoints, route) = self.route(request)?;
        info!(
            waypoints = waypoints.len(),
            points = route.points.len(),
            distance_km = route.distance_km,
            "Route planned"
        );
        Ok(RoutePlan {
            points: route.points,
            distance_km: route.distance_km,
            waypoints,
        })
    }

    /// Computes the route and splits it into stages of about
    /// `stage_length_km`, each with elevation statistics.
    ///
    /// Stages whose elevation cannot be fetched get a distance-based
    /// estimate flagged as such.
    pub fn plan_stages(
        &self,
        request: &TripRequest,
        stage_length_km: f64,
    ) -> Result<StagePlan, TripError> {
        let (waypoints, route) = self.route(request)?;
        let stages = segment(&route.points, stage_length_km)?;

        let stages: Vec<PlannedStage> = stages
            .into_par_iter()
            .map(|stage| self.with_elevation(stage))
            .collect();

        let total_distance_km = stages.iter().map(|s| s.stage.distance_km).sum();
        info!(
            stages = stages.len(),
            total_distance_km = total_distance_km,
            stage_length_km = stage_length_km,
            "Stages planned"
        );

        Ok(StagePlan {
            stages,
            total_distance_km,
            waypoints,
        })
    }

    fn route(&self, request: &TripRequest) -> Result<(Vec<ResolvedWaypoint>, Route), TripError> {
        let waypoints = request
            .waypoints()
            .map(|w| self.resolve(w))
            .collect::<Result<Vec<_>, _>>()?;
        let points: Vec<GeoPoint> = waypoints.iter().map(|w| w.point).collect();

        let descriptor = self.routing.route_request(&points);
        let response: RouteResponse =
            self.cache
                .get_or_fetch(Category::ROUTE, &descriptor, self.ttls.route, || {
                    self.routing.route(&points)
                })?;

        Ok((waypoints, response.into_route()?))
    }

    fn with_elevation(&self, stage: Stage) -> PlannedStage {
        let profile = self.elevation.profile(&stage.points).elevations();
        let bands = &self.elevation.config().gradient_bands;

        let stats = match ElevationStats::from_profile(&profile, bands) {
            Ok(stats) => stats,
            Err(_) => {
                warn!(
                    distance_km = stage.distance_km,
                    "No elevation data for stage, using distance estimate"
                );
                estimate_from_distance(stage.distance_km)
            }
        };

        PlannedStage {
            stage: stage.with_elevation(stats),
            profile,
        }
    }
}
