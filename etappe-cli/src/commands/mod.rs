//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`trip`] - Route and stage planning
//! - [`geocode`] - Place lookup, reverse lookup and suggestions
//! - [`cache`] - Cache management (stats, cleanup, clear)
//! - [`config`] - Configuration management (init, show, path)

pub mod cache;
pub mod config;
pub mod geocode;
pub mod trip;
