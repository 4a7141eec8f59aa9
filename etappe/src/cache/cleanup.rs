//! Lifetime-based garbage collection of cache entries.
//!
//! A sweep walks the whole cache tree and deletes every file whose
//! modification time is older than the configured lifetime. Stray temporary
//! files from interrupted writes age out the same way. The time of the last
//! completed sweep is kept in a marker file at the cache root so that
//! [`CleanupSweeper::sweep_if_due`] runs at most once per lifetime window.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::clock::{age, Clock};
use super::path::{is_temp_file, marker_path, write_atomic, CLEANUP_MARKER};
use super::types::CacheError;

/// Result of a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Files examined
    pub scanned: usize,
    /// Files removed because they outlived the lifetime
    pub deleted: usize,
    /// Expired files that could not be removed
    pub failed: usize,
    /// Files still within the lifetime
    pub skipped: usize,
}

/// Deletes cache files older than a fixed lifetime.
#[derive(Debug, Clone)]
pub struct CleanupSweeper {
    root: PathBuf,
    lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl CleanupSweeper {
    /// Creates a sweeper for the tree under `root`.
    pub fn new(root: impl Into<PathBuf>, lifetime: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            lifetime,
            clock,
        }
    }

    /// Maximum file age kept by a sweep.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Time of the last completed sweep, if one was recorded.
    pub fn last_sweep(&self) -> Option<SystemTime> {
        let content = fs::read_to_string(marker_path(&self.root)).ok()?;
        let secs: u64 = content.trim().parse().ok()?;
        Some(UNIX_EPOCH + Duration::from_secs(secs))
    }

    /// Returns true when no sweep has completed within the last lifetime.
    ///
    /// A missing or unreadable marker makes a sweep due.
    pub fn is_due(&self) -> bool {
        match self.last_sweep() {
            Some(last) => age(self.clock.now(), last) >= self.lifetime,
            None => true,
        }
    }

    /// Runs a sweep only if one is due.
    ///
    /// Returns `Ok(None)` when the last sweep is still recent.
    pub fn sweep_if_due(&self) -> Result<Option<SweepReport>, CacheError> {
        if !self.is_due() {
            debug!(root = %self.root.display(), "Cache cleanup not due");
            return Ok(None);
        }
        self.sweep().map(Some)
    }

    /// Deletes every file older than the lifetime and records the sweep.
    ///
    /// Individual deletion failures are counted in the report and do not
    /// stop the sweep. Only a failure to write the marker is an error.
    pub fn sweep(&self) -> Result<SweepReport, CacheError> {
        let start = Instant::now();
        let now = self.clock.now();

        let mut files = Vec::new();
        collect_files_recursive(&self.root, &mut files);

        let mut report = SweepReport::default();
        for (path, mtime) in files {
            report.scanned += 1;

            if age(now, mtime) <= self.lifetime {
                report.skipped += 1;
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    report.deleted += 1;
                    if is_temp_file(&path) {
                        debug!(path = %path.display(), "Removed stray temporary file");
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    debug!(
                        path = %path.display(),
                        error = %e,
                        "Failed to delete expired cache file"
                    );
                }
            }
        }

        cleanup_empty_dirs(&self.root);
        self.write_marker(now)?;

        if report.failed > 0 {
            warn!(
                failed = report.failed,
                "Some expired cache files could not be deleted"
            );
        }
        info!(
            root = %self.root.display(),
            scanned = report.scanned,
            deleted = report.deleted,
            failed = report.failed,
            duration_ms = start.elapsed().as_millis() as u64,
            "Cache cleanup complete"
        );

        Ok(report)
    }

    fn write_marker(&self, now: SystemTime) -> Result<(), CacheError> {
        let secs = now
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        write_atomic(&marker_path(&self.root), secs.to_string().as_bytes())
    }
}

/// Recursively collect files with their mtime, skipping the cleanup marker.
fn collect_files_recursive(dir: &Path, files: &mut Vec<(PathBuf, SystemTime)>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(
                dir = %dir.display(),
                error = %e,
                "Failed to read directory during cleanup scan"
            );
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if entry.file_name() == CLEANUP_MARKER {
            continue;
        } else if let Ok(metadata) = entry.metadata() {
            let mtime = metadata.modified().unwrap_or(UNIX_EPOCH);
            files.push((path, mtime));
        }
    }
}

/// Remove directories left empty by a sweep. The root itself is kept.
fn cleanup_empty_dirs(dir: &Path) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            cleanup_empty_dirs(&path);
            // Fails harmlessly when not empty
            let _ = fs::remove_dir(&path);
        }
    }
}
