//! Turn-by-turn routing providers.
//!
//! A routing provider answers an ordered list of waypoints with the route
//! geometry in one of two shapes: explicit coordinate arrays, or a
//! delta-encoded polyline (see [`crate::polyline`]). The shape is decided
//! once when the response is parsed; [`RouteResponse::into_route`] turns
//! either into the same [`Route`].
//!
//! # API Endpoint
//!
//! - Directions: `POST {base}/v2/directions/{profile}` with body
//!   `{"coordinates": [[lon, lat], ...], "elevation": true}`

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::http::{parse_json, HttpClient};
use super::types::ProviderError;
use crate::cache::RequestDescriptor;
use crate::coord::{total_distance_km, GeoPoint};
use crate::polyline;

/// Default routing profile.
pub const DEFAULT_PROFILE: &str = "driving-car";

/// A routing response in one of the shapes upstream services return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RouteResponse {
    /// Coordinates listed one by one
    ExplicitGeometry {
        coordinates: Vec<GeoPoint>,
        distance_km: f64,
    },
    /// Coordinates packed into a polyline string
    EncodedPolyline {
        polyline: String,
        has_elevation: bool,
        distance_km: f64,
    },
}

/// A normalized route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub points: Vec<GeoPoint>,
    /// Distance reported by the provider, in kilometres
    pub distance_km: f64,
}

impl RouteResponse {
    /// Normalizes either shape into a [`Route`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UpstreamMalformed`] if the polyline does not
    /// decode or the geometry has fewer than two points.
    pub fn into_route(self) -> Result<Route, ProviderError> {
        let (points, distance_km) = match self {
            RouteResponse::ExplicitGeometry {
                coordinates,
                distance_km,
            } => (coordinates, distance_km),
            RouteResponse::EncodedPolyline {
                polyline,
                has_elevation,
                distance_km,
            } => {
                let points = polyline::decode_points(&polyline, has_elevation).map_err(|e| {
                    ProviderError::UpstreamMalformed(format!("Undecodable route polyline: {}", e))
                })?;
                (points, distance_km)
            }
        };

        if points.len() < 2 {
            return Err(ProviderError::UpstreamMalformed(format!(
                "Route geometry has {} point(s)",
                points.len()
            )));
        }

        Ok(Route {
            points,
            distance_km,
        })
    }
}

/// Trait for routing services.
pub trait RoutingProvider: Send + Sync {
    /// Describes the upstream request [`route`](Self::route) would send.
    fn route_request(&self, waypoints: &[GeoPoint]) -> RequestDescriptor;

    /// Computes a route through `waypoints` in order.
    fn route(&self, waypoints: &[GeoPoint]) -> Result<RouteResponse, ProviderError>;
}

/// openrouteservice directions API.
pub struct OrsRouting<C: HttpClient> {
    http_client: C,
    base_url: String,
    profile: String,
    elevation: bool,
}

impl<C: HttpClient> OrsRouting<C> {
    /// Creates a provider for `profile` (e.g. `driving-car`, `driving-hgv`).
    ///
    /// Routes are requested with elevation so that the polyline carries a
    /// third channel.
    pub fn new(http_client: C, base_url: impl Into<String>, profile: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            profile: profile.into(),
            elevation: true,
        }
    }

    /// Enables or disables elevation in the returned geometry.
    pub fn with_elevation(mut self, elevation: bool) -> Self {
        self.elevation = elevation;
        self
    }

    fn url(&self) -> String {
        format!("{}/v2/directions/{}", self.base_url, self.profile)
    }

    fn parse(&self, body: &[u8]) -> Result<RouteResponse, ProviderError> {
        match parse_json::<DirectionsBody>(body)? {
            DirectionsBody::GeoJson { features } => {
                let feature = features.into_iter().next().ok_or_else(|| {
                    ProviderError::NotFound("No route between the waypoints".to_string())
                })?;
                let coordinates: Vec<GeoPoint> = feature
                    .geometry
                    .coordinates
                    .iter()
                    .map(|c| position_to_point(c))
                    .collect::<Result<_, _>>()?;

                let distance_km = match feature.properties.and_then(|p| p.summary) {
                    Some(summary) => summary.distance / 1000.0,
                    None => total_distance_km(&coordinates).map_err(|e| {
                        ProviderError::UpstreamMalformed(format!("Route geometry: {}", e))
                    })?,
                };

                Ok(RouteResponse::ExplicitGeometry {
                    coordinates,
                    distance_km,
                })
            }
            DirectionsBody::Json { routes } => {
                let route = routes.into_iter().next().ok_or_else(|| {
                    ProviderError::NotFound("No route between the waypoints".to_string())
                })?;
                Ok(RouteResponse::EncodedPolyline {
                    polyline: route.geometry,
                    has_elevation: self.elevation,
                    distance_km: route.summary.distance / 1000.0,
                })
            }
        }
    }
}

impl<C: HttpClient> RoutingProvider for OrsRouting<C> {
    fn route_request(&self, waypoints: &[GeoPoint]) -> RequestDescriptor {
        let coordinates: Vec<[f64; 2]> = waypoints.iter().map(GeoPoint::lon_lat).collect();
        RequestDescriptor::new(
            self.url(),
            json!({
                "coordinates": coordinates,
                "elevation": self.elevation,
            }),
        )
    }

    fn route(&self, waypoints: &[GeoPoint]) -> Result<RouteResponse, ProviderError> {
        if waypoints.len() < 2 {
            return Err(ProviderError::NotFound(format!(
                "A route needs at least two waypoints, got {}",
                waypoints.len()
            )));
        }

        let request = self.route_request(waypoints);
        let body = self.http_client.post_json(&request.url, &request.body)?;
        self.parse(&body)
    }
}

/// Converts a GeoJSON position `[lon, lat]` or `[lon, lat, ele]`.
pub(crate) fn position_to_point(position: &[f64]) -> Result<GeoPoint, ProviderError> {
    match *position {
        [lon, lat] => Ok(GeoPoint::new(lat, lon)),
        [lon, lat, ele, ..] => Ok(GeoPoint::new(lat, lon).with_elevation(ele)),
        _ => Err(ProviderError::UpstreamMalformed(format!(
            "Invalid position {:?}",
            position
        ))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DirectionsBody {
    GeoJson { features: Vec<DirectionsFeature> },
    Json { routes: Vec<DirectionsRoute> },
}

#[derive(Deserialize)]
struct DirectionsFeature {
    geometry: LineGeometry,
    properties: Option<FeatureProperties>,
}

#[derive(Deserialize)]
struct LineGeometry {
    coordinates: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct FeatureProperties {
    summary: Option<Summary>,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    geometry: String,
    summary: Summary,
}

#[derive(Deserialize)]
struct Summary {
    #[serde(default)]
    distance: f64,
}
