//! Administrative helpers over a cache root.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::types::CacheError;

/// File and byte counts of one category directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryUsage {
    pub name: String,
    pub files: u64,
    pub bytes: u64,
}

/// Disk usage of a whole cache tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiskUsage {
    pub files: u64,
    pub bytes: u64,
    /// Per-category breakdown, sorted by name
    pub categories: Vec<CategoryUsage>,
}

/// Counts files and bytes under `root`, grouped by category directory.
///
/// A missing root reports zero usage. Files directly under the root, such as
/// the cleanup marker, are not counted.
pub fn disk_usage(root: &Path) -> Result<DiskUsage, CacheError> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(DiskUsage::default()),
        Err(source) => {
            return Err(CacheError::PathIo {
                path: root.to_path_buf(),
                source,
            })
        }
    };

    let mut usage = DiskUsage::default();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let (files, bytes) = directory_totals(&path)?;
        usage.files += files;
        usage.bytes += bytes;
        usage.categories.push(CategoryUsage {
            name: entry.file_name().to_string_lossy().into_owned(),
            files,
            bytes,
        });
    }
    usage.categories.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(usage)
}

/// Deletes every entry and the cleanup marker below `root`.
///
/// The root directory itself is kept. Returns the number of files removed.
pub fn clear(root: &Path) -> Result<u64, CacheError> {
    let before = disk_usage(root)?;

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(CacheError::PathIo {
                path: root.to_path_buf(),
                source,
            })
        }
    };

    for entry in entries {
        let path = entry?.path();
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|source| CacheError::PathIo { path, source })?;
    }

    info!(
        root = %root.display(),
        files = before.files,
        bytes = before.bytes,
        "Cache cleared"
    );
    Ok(before.files)
}

fn directory_totals(dir: &Path) -> Result<(u64, u64), CacheError> {
    let mut files = 0;
    let mut bytes = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            let (f, b) = directory_totals(&entry.path())?;
            files += f;
            bytes += b;
        } else {
            files += 1;
            bytes += metadata.len();
        }
    }

    Ok((files, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::path::marker_path;
    use tempfile::TempDir;

    fn populate(root: &Path) {
        fs::create_dir_all(root.join("route")).unwrap();
        fs::create_dir_all(root.join("geocode")).unwrap();
        fs::write(root.join("route/a.json"), vec![0u8; 100]).unwrap();
        fs::write(root.join("route/b.json"), vec![0u8; 50]).unwrap();
        fs::write(root.join("geocode/c.json"), vec![0u8; 10]).unwrap();
        fs::write(marker_path(root), b"1700000000").unwrap();
    }

    #[test]
    fn test_disk_usage_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let usage = disk_usage(&temp_dir.path().join("absent")).unwrap();
        assert_eq!(usage, DiskUsage::default());
    }

    #[test]
    fn test_disk_usage_by_category() {
        let temp_dir = TempDir::new().unwrap();
        populate(temp_dir.path());

        let usage = disk_usage(temp_dir.path()).unwrap();

        assert_eq!(usage.files, 3);
        assert_eq!(usage.bytes, 160);
        assert_eq!(usage.categories.len(), 2);
        assert_eq!(usage.categories[0].name, "geocode");
        assert_eq!(usage.categories[0].bytes, 10);
        assert_eq!(usage.categories[1].name, "route");
        assert_eq!(usage.categories[1].files, 2);
    }

    #[test]
    fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        populate(temp_dir.path());

        let removed = clear(temp_dir.path()).unwrap();

        assert_eq!(removed, 3);
        assert!(temp_dir.path().exists());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_clear_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(clear(&temp_dir.path().join("absent")).unwrap(), 0);
    }
}
