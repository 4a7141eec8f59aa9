//! Content-addressed disk cache for upstream provider calls.
//!
//! Each entry lives at `root/<category>/<sha256>.json`, where the digest is
//! computed over the canonical JSON of the request URL and body. Entries are
//! used while younger than the caller's TTL and removed by the cleanup sweep
//! once older than the configured lifetime.

mod cleanup;
mod clock;
mod key;
mod path;
mod stats;
mod store;
mod types;
mod usage;

pub use cleanup::{CleanupSweeper, SweepReport};
pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{canonical_json, RequestDescriptor};
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use store::CacheStore;
pub use types::{CacheError, Category};
pub use usage::{clear, disk_usage, CategoryUsage, DiskUsage};

// Re-export path utilities for convenience
pub use path::{category_directory, entry_path, marker_path, CLEANUP_MARKER};
