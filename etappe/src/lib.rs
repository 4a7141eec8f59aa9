//! Etappe - route planning with stages, elevation and an on-disk cache
//!
//! The library resolves places through a geocoding provider, fetches a route,
//! splits it into stages of roughly equal driving distance and annotates each
//! stage with elevation statistics. Every upstream answer passes through a
//! content-addressed disk cache with per-category freshness.
//!
//! # Example
//!
//! ```no_run
//! use etappe::cache::CacheStore;
//! use etappe::provider::{OrsElevation, OrsGeocoding, OrsRouting, ReqwestClient};
//! use etappe::trip::{TripPlanner, TripRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let base = "https://api.openrouteservice.org";
//! let client = ReqwestClient::new()?;
//! let planner = TripPlanner::new(
//!     OrsRouting::new(client.clone(), base, "driving-car"),
//!     OrsElevation::new(client.clone(), base),
//!     OrsGeocoding::new(client, base),
//!     CacheStore::open("/tmp/etappe-cache")?,
//!     Default::default(),
//!     Default::default(),
//! );
//! let request = TripRequest::new("Berlin".parse()?, "Munich".parse()?);
//! let plan = planner.plan_stages(&request, 300.0)?;
//! println!("{} stages", plan.stages.len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod coord;
pub mod elevation;
pub mod logging;
pub mod polyline;
pub mod provider;
pub mod segment;
pub mod trip;

/// Version of the etappe library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
