//! Upstream geospatial provider abstraction
//!
//! This module provides traits for the three upstream services the engine
//! depends on (routing, elevation and geocoding) and implementations for
//! openrouteservice. All of them are generic over [`HttpClient`] so tests
//! can substitute a mock.
//!
//! Every trait pairs each call with a `*_request` method describing the
//! upstream request. The descriptor is what the cache keys on; it never
//! contains credentials.
//!
//! ```ignore
//! use etappe::provider::{OrsRouting, ReqwestClient, RoutingProvider};
//!
//! let http_client = ReqwestClient::with_timeout(timeout, Some(&api_key))?;
//! let routing = OrsRouting::new(http_client, "https://api.openrouteservice.org", "driving-car");
//! let route = routing.route(&waypoints)?.into_route()?;
//! ```

mod elevation;
mod geocoding;
mod http;
mod routing;
mod types;

pub use elevation::{ElevationSource, OrsElevation};
pub use geocoding::{
    autocomplete_eligible, GeocodingProvider, OrsGeocoding, Place, MIN_AUTOCOMPLETE_CHARS,
};
pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use routing::{OrsRouting, Route, RouteResponse, RoutingProvider, DEFAULT_PROFILE};
pub use types::ProviderError;

#[cfg(test)]
pub use http::tests::{MockHttpClient, RecordedRequest};
