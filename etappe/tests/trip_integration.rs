//! Integration tests for trip planning over a scripted upstream.
//!
//! These tests drive the public API end to end:
//! - geocoding, routing, segmentation and elevation in one plan
//! - answers served from the disk cache when the upstream is down
//! - distance estimates when no elevation tier answers
//! - the cleanup sweep emptying an aged cache

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use etappe::cache::{disk_usage, CacheStore, Clock, ManualClock};
use etappe::coord::GeoPoint;
use etappe::elevation::{ElevationConfig, ESTIMATED_CLIMB_M_PER_KM};
use etappe::provider::{HttpClient, OrsElevation, OrsGeocoding, OrsRouting, ProviderError};
use etappe::trip::{CacheTtls, TripPlanner, TripRequest, Waypoint};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

const BASE: &str = "https://ors.test";
const LEGS: usize = 40;

#[derive(Default)]
struct Upstream {
    requests: AtomicUsize,
    offline: AtomicBool,
    elevation_offline: AtomicBool,
}

/// Answers like openrouteservice for a straight route along the equator.
#[derive(Clone, Default)]
struct ScriptedClient {
    upstream: Arc<Upstream>,
}

impl ScriptedClient {
    fn requests(&self) -> usize {
        self.upstream.requests.load(Ordering::SeqCst)
    }

    fn go_offline(&self) {
        self.upstream.offline.store(true, Ordering::SeqCst);
    }

    fn drop_elevation(&self) {
        self.upstream.elevation_offline.store(true, Ordering::SeqCst);
    }

    fn check(&self, url: &str) -> Result<(), ProviderError> {
        self.upstream.requests.fetch_add(1, Ordering::SeqCst);
        let elevation_down =
            url.contains("/elevation/") && self.upstream.elevation_offline.load(Ordering::SeqCst);
        if self.upstream.offline.load(Ordering::SeqCst) || elevation_down {
            return Err(ProviderError::UpstreamUnavailable("HTTP 503".into()));
        }
        Ok(())
    }
}

fn to_bytes(value: Value) -> Result<Vec<u8>, ProviderError> {
    serde_json::to_vec(&value).map_err(|e| ProviderError::UpstreamMalformed(e.to_string()))
}

/// Synthetic terrain: height grows with longitude, with a bump every third point.
fn height(lon: f64) -> f64 {
    let step = (lon / 0.05).round();
    200.0 + step * 4.0 + if step as i64 % 3 == 0 { 20.0 } else { 0.0 }
}

impl HttpClient for ScriptedClient {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Vec<u8>, ProviderError> {
        self.check(url)?;

        if url.ends_with("/elevation/point") {
            let geometry = &query[0].1;
            let lon: f64 = geometry
                .split(',')
                .next()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default();
            return to_bytes(json!({"geometry": {"coordinates": [lon, 0.0, height(lon)]}}));
        }
        if url.contains("/geocode/") {
            let text = query
                .iter()
                .find(|(k, _)| *k == "text")
                .map(|(_, v)| v.as_str())
                .unwrap_or("Somewhere");
            let lon = if text == "Libreville" { 0.0 } else { LEGS as f64 * 0.05 };
            return to_bytes(json!({"features": [{
                "geometry": {"coordinates": [lon, 0.0]},
                "properties": {"label": text}
            }]}));
        }
        Err(ProviderError::NotFound(url.to_string()))
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<Vec<u8>, ProviderError> {
        self.check(url)?;

        if url.contains("/v2/directions/") {
            let coordinates: Vec<[f64; 2]> =
                (0..=LEGS).map(|i| [i as f64 * 0.05, 0.0]).collect();
            return to_bytes(json!({"features": [{
                "geometry": {"coordinates": coordinates},
                "properties": {"summary": {"distance": LEGS as f64 * 5566.0}}
            }]}));
        }
        if url.ends_with("/elevation/line") {
            let coordinates: Vec<[f64; 3]> = body["geometry"]["coordinates"]
                .as_array()
                .map(|points| {
                    points
                        .iter()
                        .map(|p| {
                            let lon = p[0].as_f64().unwrap_or_default();
                            let lat = p[1].as_f64().unwrap_or_default();
                            [lon, lat, height(lon)]
                        })
                        .collect()
                })
                .unwrap_or_default();
            return to_bytes(json!({"geometry": {"coordinates": coordinates}}));
        }
        Err(ProviderError::NotFound(url.to_string()))
    }
}

type Planner = TripPlanner<
    OrsRouting<ScriptedClient>,
    OrsElevation<ScriptedClient>,
    OrsGeocoding<ScriptedClient>,
>;

fn planner(client: &ScriptedClient, cache: CacheStore) -> Planner {
    TripPlanner::new(
        OrsRouting::new(client.clone(), BASE, "driving-car"),
        OrsElevation::new(client.clone(), BASE),
        OrsGeocoding::new(client.clone(), BASE),
        cache,
        CacheTtls::default(),
        ElevationConfig::default(),
    )
}

fn named_request() -> TripRequest {
    TripRequest::new(
        Waypoint::Place("Libreville".into()),
        Waypoint::Place("Kismayo".into()),
    )
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_plan_stages_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let client = ScriptedClient::default();
    let planner = planner(&client, CacheStore::open(temp_dir.path()).unwrap());

    let plan = planner.plan_stages(&named_request(), 100.0).unwrap();

    assert_eq!(plan.waypoints.len(), 2);
    assert_eq!(plan.waypoints[0].label, "Libreville");
    assert_eq!(plan.stages.len(), 3);

    let summed: f64 = plan.stages.iter().map(|s| s.stage.distance_km).sum();
    assert!((plan.total_distance_km - summed).abs() < 1e-9);
    assert!((plan.total_distance_km - 222.6).abs() < 1.0);

    for pair in plan.stages.windows(2) {
        assert_eq!(pair[0].stage.end(), pair[1].stage.start());
    }
    for planned in &plan.stages {
        let stats = planned.stage.elevation.as_ref().unwrap();
        assert!(!stats.estimated);
        assert!(planned.profile.len() >= 2);
        assert!(stats.gain_m > 0.0);
        assert!(stats.min_m <= stats.max_m);
        assert_eq!(stats.gradients.total(), planned.profile.len() - 1);
    }
}

#[test]
fn test_cached_plan_survives_upstream_outage() {
    let temp_dir = TempDir::new().unwrap();
    let client = ScriptedClient::default();

    let first = planner(&client, CacheStore::open(temp_dir.path()).unwrap())
        .plan_stages(&named_request(), 100.0)
        .unwrap();
    let requests = client.requests();
    assert!(requests > 0);

    client.go_offline();
    let second = planner(&client, CacheStore::open(temp_dir.path()).unwrap())
        .plan_stages(&named_request(), 100.0)
        .unwrap();

    assert_eq!(client.requests(), requests, "everything served from disk");
    assert_eq!(first.stages.len(), second.stages.len());
    assert_eq!(first.waypoints, second.waypoints);
    for (a, b) in first.stages.iter().zip(&second.stages) {
        assert_eq!(a.profile, b.profile);
        assert!((a.stage.distance_km - b.stage.distance_km).abs() < 1e-9);
    }
}

#[test]
fn test_elevation_outage_falls_back_to_estimate() {
    let temp_dir = TempDir::new().unwrap();
    let client = ScriptedClient::default();
    client.drop_elevation();
    let planner = planner(&client, CacheStore::open(temp_dir.path()).unwrap());

    let plan = planner.plan_stages(&named_request(), 100.0).unwrap();

    for planned in &plan.stages {
        let stats = planned.stage.elevation.as_ref().unwrap();
        assert!(stats.estimated);
        assert!(planned.profile.is_empty());
        let expected = planned.stage.distance_km * ESTIMATED_CLIMB_M_PER_KM;
        assert!((stats.gain_m - expected).abs() < 1e-9);
    }
}

#[test]
fn test_route_with_coordinates_skips_geocoding() {
    let temp_dir = TempDir::new().unwrap();
    let client = ScriptedClient::default();
    let planner = planner(&client, CacheStore::open(temp_dir.path()).unwrap());
    let request: TripRequest = TripRequest::new(
        "0.0,0.0".parse::<Waypoint>().unwrap(),
        Waypoint::Coordinate(GeoPoint::new(0.0, 2.0)),
    );

    let plan = planner.plan_route(&request).unwrap();

    assert_eq!(client.requests(), 1);
    assert_eq!(plan.points.len(), LEGS + 1);
}

#[test]
fn test_cleanup_sweep_empties_aged_cache() {
    let temp_dir = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::starting_now());
    let cache = CacheStore::new(temp_dir.path(), clock.clone()).unwrap();
    let client = ScriptedClient::default();

    planner(&client, cache.clone())
        .plan_stages(&named_request(), 100.0)
        .unwrap();
    assert!(disk_usage(temp_dir.path()).unwrap().files > 0);

    let lifetime = Duration::from_secs(30 * 24 * 3600);
    let sweeper = cache.sweeper(lifetime);
    assert!(sweeper.is_due(), "no marker yet");
    let first = sweeper.sweep_if_due().unwrap().unwrap();
    assert_eq!(first.deleted, 0);
    assert!(!sweeper.is_due());

    clock.advance(lifetime + Duration::from_secs(60));
    assert!(sweeper.is_due());
    let report = sweeper.sweep_if_due().unwrap().unwrap();

    assert!(report.deleted > 0);
    assert_eq!(report.failed, 0);
    assert_eq!(disk_usage(temp_dir.path()).unwrap().files, 0);
    assert!(clock.now() > std::time::SystemTime::now());
}
