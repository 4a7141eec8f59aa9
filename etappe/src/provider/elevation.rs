//! Elevation sampling providers.
//!
//! Two query shapes are supported. A line query treats the points as one
//! connected path and returns all elevations in a single call. A point query
//! treats them as independent samples.
//!
//! # API Endpoints
//!
//! - Line: `POST {base}/elevation/line` with a GeoJSON `LineString`
//! - Point: `GET {base}/elevation/point?geometry={lon},{lat}`, one per point

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::http::{parse_json, HttpClient};
use super::types::ProviderError;
use crate::cache::RequestDescriptor;
use crate::coord::GeoPoint;

/// Trait for elevation services.
///
/// Both query shapes return one entry per input point, `None` where the
/// service had no value.
pub trait ElevationSource: Send + Sync {
    /// Describes the upstream request [`line`](Self::line) would send.
    fn line_request(&self, points: &[GeoPoint]) -> RequestDescriptor;

    /// Elevations along a connected path.
    fn line(&self, points: &[GeoPoint]) -> Result<Vec<Option<f64>>, ProviderError>;

    /// Describes the upstream requests [`point`](Self::point) would send.
    fn point_request(&self, points: &[GeoPoint]) -> RequestDescriptor;

    /// Elevations of independent points.
    fn point(&self, points: &[GeoPoint]) -> Result<Vec<Option<f64>>, ProviderError>;
}

/// openrouteservice elevation API.
pub struct OrsElevation<C: HttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: HttpClient> OrsElevation<C> {
    pub fn new(http_client: C, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn line_url(&self) -> String {
        format!("{}/elevation/line", self.base_url)
    }

    fn point_url(&self) -> String {
        format!("{}/elevation/point", self.base_url)
    }
}

fn geometry_param(point: &GeoPoint) -> String {
    format!("{},{}", point.lon, point.lat)
}

impl<C: HttpClient> ElevationSource for OrsElevation<C> {
    fn line_request(&self, points: &[GeoPoint]) -> RequestDescriptor {
        let coordinates: Vec<[f64; 2]> = points.iter().map(GeoPoint::lon_lat).collect();
        RequestDescriptor::new(
            self.line_url(),
            json!({
                "format_in": "geojson",
                "format_out": "geojson",
                "geometry": {"type": "LineString", "coordinates": coordinates},
            }),
        )
    }

    fn line(&self, points: &[GeoPoint]) -> Result<Vec<Option<f64>>, ProviderError> {
        let request = self.line_request(points);
        let body = self.http_client.post_json(&request.url, &request.body)?;
        let response: LineResponse = parse_json(&body)?;

        let values: Vec<Option<f64>> = response
            .geometry
            .coordinates
            .iter()
            .map(|c| c.get(2).copied())
            .collect();

        if values.len() != points.len() {
            return Err(ProviderError::UpstreamMalformed(format!(
                "Line elevation returned {} coordinates for {} points",
                values.len(),
                points.len()
            )));
        }
        Ok(values)
    }

    fn point_request(&self, points: &[GeoPoint]) -> RequestDescriptor {
        let geometries: Vec<String> = points.iter().map(geometry_param).collect();
        RequestDescriptor::new(self.point_url(), json!({ "geometry": geometries }))
    }

    fn point(&self, points: &[GeoPoint]) -> Result<Vec<Option<f64>>, ProviderError> {
        let url = self.point_url();
        let mut values = Vec::with_capacity(points.len());

        for point in points {
            let body = self
                .http_client
                .get(&url, &[("geometry", geometry_param(point))])?;
            let response: PointResponse = parse_json(&body)?;
            values.push(response.geometry.coordinates.get(2).copied());
        }

        debug!(
            points = points.len(),
            missing = values.iter().filter(|v| v.is_none()).count(),
            "Point elevation lookup complete"
        );
        Ok(values)
    }
}

#[derive(Deserialize)]
struct LineResponse {
    geometry: LineGeometry,
}

#[derive(Deserialize)]
struct LineGeometry {
    coordinates: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct PointResponse {
    geometry: PointGeometry,
}

#[derive(Deserialize)]
struct PointGeometry {
    coordinates: Vec<f64>,
}
