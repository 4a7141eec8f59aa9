//! Core types for the cache store.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Cache-related errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during cache operations
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error on a specific cache path
    #[error("Cache I/O error on {}: {}", .path.display(), .source)]
    PathIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entry could not be serialized
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Directory-level namespace for cache entries.
///
/// Categories separate entries of different kinds (route geometry,
/// elevation samples, geocoding results) on disk so they can carry
/// different lifetimes. Names are validated at compile time when used in a
/// `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category(&'static str);

impl Category {
    /// Routing provider responses.
    pub const ROUTE: Category = Category::new("route");
    /// Line-shaped elevation queries.
    pub const ELEVATION_LINE: Category = Category::new("elevation_line");
    /// Point-shaped elevation queries.
    pub const ELEVATION_POINT: Category = Category::new("elevation_point");
    /// Forward geocoding lookups.
    pub const GEOCODE: Category = Category::new("geocode");
    /// Reverse geocoding lookups.
    pub const REVERSE: Category = Category::new("reverse");
    /// Autocomplete suggestions.
    pub const AUTOCOMPLETE: Category = Category::new("autocomplete");

    /// Creates a category.
    ///
    /// # Panics
    ///
    /// Panics unless `name` is non-empty and made only of ASCII lowercase
    /// letters, digits, `_` and `-`.
    pub const fn new(name: &'static str) -> Self {
        let bytes = name.as_bytes();
        assert!(!bytes.is_empty(), "category name must not be empty");

        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            assert!(
                b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-',
                "category name may only contain [a-z0-9_-]"
            );
            i += 1;
        }

        Self(name)
    }

    /// Category name, also its directory name.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_categories_are_distinct() {
        let all = [
            Category::ROUTE,
            Category::ELEVATION_LINE,
            Category::ELEVATION_POINT,
            Category::GEOCODE,
            Category::REVERSE,
            Category::AUTOCOMPLETE,
        ];
        let names: std::collections::HashSet<_> = all.iter().map(|c| c.as_str()).collect();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::new("tiles-v2").to_string(), "tiles-v2");
    }

    #[test]
    #[should_panic(expected = "may only contain")]
    fn test_category_rejects_path_separator() {
        let _ = Category::new("../escape");
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_category_rejects_empty() {
        let _ = Category::new("");
    }
}
