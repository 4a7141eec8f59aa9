//! Geocoding providers: forward search, reverse lookup and autocomplete.
//!
//! # API Endpoints
//!
//! - Search: `GET {base}/geocode/search?text={text}&size=1`
//! - Reverse: `GET {base}/geocode/reverse?point.lon={lon}&point.lat={lat}&size=1`
//! - Autocomplete: `GET {base}/geocode/autocomplete?text={text}`

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::http::{parse_json, HttpClient};
use super::routing::position_to_point;
use super::types::ProviderError;
use crate::cache::RequestDescriptor;
use crate::coord::GeoPoint;

/// Shortest text for which autocomplete queries upstream.
pub const MIN_AUTOCOMPLETE_CHARS: usize = 2;

/// A named location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub label: String,
    pub point: GeoPoint,
}

/// Trait for geocoding services.
pub trait GeocodingProvider: Send + Sync {
    fn search_request(&self, text: &str) -> RequestDescriptor;

    /// Top match for a place name, if any.
    fn search(&self, text: &str) -> Result<Option<Place>, ProviderError>;

    fn reverse_request(&self, point: &GeoPoint) -> RequestDescriptor;

    /// Label of the place nearest to `point`, if any.
    fn reverse(&self, point: &GeoPoint) -> Result<Option<String>, ProviderError>;

    fn autocomplete_request(&self, text: &str) -> RequestDescriptor;

    /// Ranked candidates for partial input.
    ///
    /// Implementations return an empty list without calling upstream when
    /// `text` is shorter than [`MIN_AUTOCOMPLETE_CHARS`] characters.
    fn autocomplete(&self, text: &str) -> Result<Vec<Place>, ProviderError>;
}

/// Returns true when `text` is long enough to autocomplete.
pub fn autocomplete_eligible(text: &str) -> bool {
    text.trim().chars().count() >= MIN_AUTOCOMPLETE_CHARS
}

/// openrouteservice (Pelias) geocoding API.
pub struct OrsGeocoding<C: HttpClient> {
    http_client: C,
    base_url: String,
}

impl<C: HttpClient> OrsGeocoding<C> {
    pub fn new(http_client: C, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/geocode/{}", self.base_url, name)
    }

    /// Sends the GET request described by `request`, whose body holds the
    /// query parameters as a flat object of strings.
    fn fetch(&self, request: &RequestDescriptor) -> Result<Vec<Feature>, ProviderError> {
        let params = query_params(&request.body);
        let query: Vec<(&str, String)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        let body = self.http_client.get(&request.url, &query)?;
        let collection: FeatureCollection = parse_json(&body)?;
        Ok(collection.features)
    }
}

fn query_params(body: &Value) -> Vec<(String, String)> {
    body.as_object()
        .map(Map::iter)
        .into_iter()
        .flatten()
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), value)
        })
        .collect()
}

impl<C: HttpClient> GeocodingProvider for OrsGeocoding<C> {
    fn search_request(&self, text: &str) -> RequestDescriptor {
        RequestDescriptor::new(
            self.endpoint("search"),
            json!({"text": text.trim(), "size": "1"}),
        )
    }

    fn search(&self, text: &str) -> Result<Option<Place>, ProviderError> {
        let features = self.fetch(&self.search_request(text))?;
        features.into_iter().next().map(Feature::into_place).transpose()
    }

    fn reverse_request(&self, point: &GeoPoint) -> RequestDescriptor {
        RequestDescriptor::new(
            self.endpoint("reverse"),
            json!({
                "point.lon": point.lon.to_string(),
                "point.lat": point.lat.to_string(),
                "size": "1",
            }),
        )
    }

    fn reverse(&self, point: &GeoPoint) -> Result<Option<String>, ProviderError> {
        let features = self.fetch(&self.reverse_request(point))?;
        Ok(features.into_iter().next().map(|f| f.properties.label))
    }

    fn autocomplete_request(&self, text: &str) -> RequestDescriptor {
        RequestDescriptor::new(self.endpoint("autocomplete"), json!({"text": text.trim()}))
    }

    fn autocomplete(&self, text: &str) -> Result<Vec<Place>, ProviderError> {
        if !autocomplete_eligible(text) {
            return Ok(Vec::new());
        }
        self.fetch(&self.autocomplete_request(text))?
            .into_iter()
            .map(Feature::into_place)
            .collect()
    }
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: PointGeometry,
    properties: FeatureProperties,
}

#[derive(Deserialize)]
struct PointGeometry {
    coordinates: Vec<f64>,
}

#[derive(Deserialize)]
struct FeatureProperties {
    label: String,
}

impl Feature {
    fn into_place(self) -> Result<Place, ProviderError> {
        Ok(Place {
            label: self.properties.label,
            point: position_to_point(&self.geometry.coordinates)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;

    const BASE: &str = "https://ors.test";

    fn feature(label: &str, lon: f64, lat: f64) -> Value {
        json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [lon, lat]},
            "properties": {"label": label, "confidence": 1}
        })
    }

    #[test]
    fn test_search_top_match() {
        let client = MockHttpClient::new().respond(
            "/geocode/search",
            json!({"features": [feature("Hamburg, Germany", 9.99, 53.55)]}),
        );
        let provider = OrsGeocoding::new(client, BASE);

        let place = provider.search("Hamburg").unwrap().unwrap();

        assert_eq!(place.label, "Hamburg, Germany");
        assert_eq!(place.point, GeoPoint::new(53.55, 9.99));
        let request = &provider.http_client.requests()[0];
        assert!(request.query.contains(&("text".to_string(), "Hamburg".to_string())));
        assert!(request.query.contains(&("size".to_string(), "1".to_string())));
    }

    #[test]
    fn test_search_no_match() {
        let client = MockHttpClient::new().respond("/geocode/search", json!({"features": []}));
        let provider = OrsGeocoding::new(client, BASE);
        assert_eq!(provider.search("Atlantis").unwrap(), None);
    }

    #[test]
    fn test_reverse() {
        let client = MockHttpClient::new().respond(
            "/geocode/reverse",
            json!({"features": [feature("Marienplatz, Munich", 11.5755, 48.1374)]}),
        );
        let provider = OrsGeocoding::new(client, BASE);

        let label = provider.reverse(&GeoPoint::new(48.1374, 11.5755)).unwrap();
        assert_eq!(label.as_deref(), Some("Marienplatz, Munich"));

        let query = &provider.http_client.requests()[0].query;
        assert!(query.contains(&("point.lat".to_string(), "48.1374".to_string())));
    }

    #[test]
    fn test_autocomplete_candidates() {
        let client = MockHttpClient::new().respond(
            "/geocode/autocomplete",
            json!({"features": [
                feature("Eilenburg, Germany", 12.63, 51.46),
                feature("Eisenach, Germany", 10.32, 50.98),
            ]}),
        );
        let provider = OrsGeocoding::new(client, BASE);

        let places = provider.autocomplete("Ei").unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[1].label, "Eisenach, Germany");
    }

    #[test]
    fn test_autocomplete_short_text_skips_upstream() {
        let provider = OrsGeocoding::new(MockHttpClient::new(), BASE);

        assert!(provider.autocomplete("E").unwrap().is_empty());
        assert!(provider.autocomplete(" ").unwrap().is_empty());
        assert_eq!(provider.http_client.request_count(), 0);
    }

    #[test]
    fn test_autocomplete_counts_characters_not_bytes() {
        assert!(!autocomplete_eligible("Ü"));
        assert!(autocomplete_eligible("Üb"));
    }

    #[test]
    fn test_malformed_feature() {
        let client = MockHttpClient::new().respond(
            "/geocode/search",
            json!({"features": [{"geometry": {"coordinates": [1.0]}, "properties": {"label": "x"}}]}),
        );
        let provider = OrsGeocoding::new(client, BASE);
        assert!(matches!(
            provider.search("x"),
            Err(ProviderError::UpstreamMalformed(_))
        ));
    }
}
