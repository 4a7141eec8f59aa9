//! Cache management CLI commands.

use std::path::Path;
use std::time::UNIX_EPOCH;

use clap::Subcommand;
use etappe::cache::{clear, disk_usage, DiskUsage, SweepReport};
use serde::Serialize;

use crate::error::CliError;
use crate::output::{format_bytes, Output};
use crate::runner::CliRunner;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Show cache size per category and when it was last cleaned
    Stats,
    /// Remove entries older than [cache] lifetime_days now
    Cleanup,
    /// Remove every cached entry
    Clear,
}

#[derive(Serialize)]
struct StatsView<'a> {
    directory: &'a Path,
    lifetime_days: u64,
    last_cleanup_unix: Option<u64>,
    usage: DiskUsage,
}

#[derive(Serialize)]
struct CleanupView<'a> {
    directory: &'a Path,
    #[serde(flatten)]
    report: SweepReport,
}

/// Run a cache subcommand.
///
/// The opportunistic startup sweep is skipped so `stats` reports the cache
/// as found and `cleanup` does the sweeping itself.
pub fn run(config_path: Option<&Path>, out: &Output, action: CacheAction) -> Result<(), CliError> {
    let runner = CliRunner::without_sweep(config_path)?;
    let cache_dir = runner.cache().root();
    let lifetime_days = runner.config().cache.lifetime_days;
    let sweeper = runner.cache().sweeper(runner.config().cache.lifetime());

    match action {
        CacheAction::Stats => {
            let view = StatsView {
                directory: cache_dir,
                lifetime_days,
                last_cleanup_unix: sweeper
                    .last_sweep()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_secs()),
                usage: disk_usage(cache_dir)?,
            };
            out.emit(&view, || stats_text(&view))
        }
        CacheAction::Cleanup => {
            let report = sweeper.sweep()?;
            let view = CleanupView {
                directory: cache_dir,
                report,
            };
            out.emit(&view, || {
                format!(
                    "Cleaned cache at: {}\n  Scanned {} files, deleted {}, kept {}, failed {}",
                    cache_dir.display(),
                    report.scanned,
                    report.deleted,
                    report.skipped,
                    report.failed
                )
            })
        }
        CacheAction::Clear => {
            let deleted = clear(cache_dir)?;
            out.emit(&serde_json::json!({ "directory": cache_dir, "deleted": deleted }), || {
                format!(
                    "Cleared cache at: {}\n  Deleted {} files",
                    cache_dir.display(),
                    deleted
                )
            })
        }
    }
}

fn stats_text(view: &StatsView<'_>) -> String {
    let mut lines = vec![
        format!("Cache: {}", view.directory.display()),
        format!("  Files: {}", view.usage.files),
        format!("  Size:  {}", format_bytes(view.usage.bytes)),
    ];
    for category in &view.usage.categories {
        lines.push(format!(
            "    {:<16} {:>6} files  {}",
            category.name,
            category.files,
            format_bytes(category.bytes)
        ));
    }
    lines.push(match view.last_cleanup_unix {
        Some(secs) => format!(
            "  Last cleanup: {} (unix), lifetime {} days",
            secs, view.lifetime_days
        ),
        None => format!("  Last cleanup: never, lifetime {} days", view.lifetime_days),
    });
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use etappe::cache::CategoryUsage;

    #[test]
    fn test_stats_text_lists_categories() {
        let view = StatsView {
            directory: Path::new("/tmp/etappe"),
            lifetime_days: 30,
            last_cleanup_unix: None,
            usage: DiskUsage {
                files: 3,
                bytes: 3072,
                categories: vec![
                    CategoryUsage {
                        name: "geocode".into(),
                        files: 1,
                        bytes: 1024,
                    },
                    CategoryUsage {
                        name: "route".into(),
                        files: 2,
                        bytes: 2048,
                    },
                ],
            },
        };

        let text = stats_text(&view);
        assert!(text.contains("Files: 3"));
        assert!(text.contains("Size:  3.0 KB"));
        assert!(text.contains("route"));
        assert!(text.contains("Last cleanup: never, lifetime 30 days"));
    }
}
