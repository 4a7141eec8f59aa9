//! On-disk layout of the cache store.
//!
//! ```text
//! <root>/<category>/<sha256-hex>.json
//! <root>/.last_cleanup
//! ```
//!
//! Temporary files used for atomic writes live next to their final path,
//! are dot-prefixed and end in `.tmp`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::types::{CacheError, Category};

/// File name of the cleanup marker at the cache root.
pub const CLEANUP_MARKER: &str = ".last_cleanup";

/// Extension of finished cache entries.
pub const ENTRY_EXTENSION: &str = "json";

/// Extension of in-progress writes.
pub const TEMP_EXTENSION: &str = "tmp";

/// Distinguishes temporary files written concurrently by this process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Directory holding all entries of a category.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use etappe::cache::{category_directory, Category};
///
/// let dir = category_directory(&PathBuf::from("/cache"), Category::ROUTE);
/// assert_eq!(dir, PathBuf::from("/cache/route"));
/// ```
pub fn category_directory(root: &Path, category: Category) -> PathBuf {
    root.join(category.as_str())
}

/// Path of the entry stored under `key` in `category`.
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use etappe::cache::{entry_path, Category};
///
/// let path = entry_path(&PathBuf::from("/cache"), Category::GEOCODE, "ab12");
/// assert_eq!(path, PathBuf::from("/cache/geocode/ab12.json"));
/// ```
pub fn entry_path(root: &Path, category: Category, key: &str) -> PathBuf {
    category_directory(root, category).join(format!("{}.{}", key, ENTRY_EXTENSION))
}

/// Path of the cleanup marker file.
pub fn marker_path(root: &Path) -> PathBuf {
    root.join(CLEANUP_MARKER)
}

/// Returns true for files left behind by an interrupted atomic write.
pub(crate) fn is_temp_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'));
    hidden && path.extension().is_some_and(|ext| ext == TEMP_EXTENSION)
}

/// Writes `data` to `path` so that readers see either the old file or the
/// complete new one, never a partial write.
///
/// The data goes to a uniquely named sibling first and is then renamed over
/// the destination. Parent directories are created as needed.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<(), CacheError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|source| CacheError::PathIo {
        path: parent.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("entry");
    let temp_path = parent.join(format!(
        ".{}.{}.{}.{}",
        file_name,
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed),
        TEMP_EXTENSION
    ));

    let result = fs::File::create(&temp_path)
        .and_then(|mut file| {
            file.write_all(data)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&temp_path, path));

    if let Err(source) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(CacheError::PathIo {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entry_path_layout() {
        let root = PathBuf::from("/home/user/.cache/etappe");
        let path = entry_path(&root, Category::ELEVATION_LINE, "deadbeef");

        assert_eq!(
            path,
            PathBuf::from("/home/user/.cache/etappe/elevation_line/deadbeef.json")
        );
    }

    #[test]
    fn test_marker_path() {
        assert_eq!(
            marker_path(Path::new("/cache")),
            PathBuf::from("/cache/.last_cleanup")
        );
    }

    #[test]
    fn test_is_temp_file() {
        assert!(is_temp_file(Path::new("/c/route/.abc.json.12.0.tmp")));
        assert!(!is_temp_file(Path::new("/c/route/abc.json")));
        assert!(!is_temp_file(Path::new("/c/route/abc.tmp")));
    }

    #[test]
    fn test_write_atomic_creates_parents_and_leaves_no_temp() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("route").join("k.json");

        write_atomic(&path, b"{\"a\":1}").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"{\"a\":1}");
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| is_temp_file(&e.path()))
            .collect();
        assert!(leftovers.is_empty(), "Temp files should not remain");
    }

    #[test]
    fn test_write_atomic_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("k.json");

        write_atomic(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new");
    }
}
