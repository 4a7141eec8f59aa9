//! Content-addressed cache keys.
//!
//! A key is the SHA-256 digest of the canonical JSON form of
//! `{"body": ..., "url": ...}`. Object keys are sorted at every nesting
//! level, so two bodies that differ only in field order share a key.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt::Write;

/// The upstream request an entry memoizes.
///
/// `body` holds the POST body or the query parameters of a GET. Secrets such
/// as API keys are sent as headers and never appear here.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// Request URL without query string
    pub url: String,
    /// Request body or query parameters
    pub body: Value,
}

impl RequestDescriptor {
    /// Creates a descriptor.
    pub fn new(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            body,
        }
    }

    /// Returns the 64-character lowercase hex storage key.
    pub fn cache_key(&self) -> String {
        let envelope = serde_json::json!({
            "url": self.url,
            "body": self.body,
        });

        let mut hasher = Sha256::new();
        hasher.update(canonical_json(&envelope).as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Serializes `value` with object keys sorted lexicographically.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, child)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_scalar(&Value::String(key.clone()), out);
                out.push(':');
                write_canonical(child, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => write_scalar(scalar, out),
    }
}

fn write_scalar(value: &Value, out: &mut String) {
    // Display for Value is infallible compact JSON
    let _ = write!(out, "{}", value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_is_sha256_hex() {
        let key = RequestDescriptor::new("https://example.com/route", json!({})).cache_key();

        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_key_ignores_field_order() {
        let a: Value =
            serde_json::from_str(r#"{"coordinates":[[8.5,47.3],[11.5,48.1]],"units":"km","options":{"b":1,"a":2}}"#)
                .unwrap();
        let b: Value =
            serde_json::from_str(r#"{"options":{"a":2,"b":1},"units":"km","coordinates":[[8.5,47.3],[11.5,48.1]]}"#)
                .unwrap();

        let url = "https://api.example.com/v2/directions/driving-car";
        assert_eq!(
            RequestDescriptor::new(url, a).cache_key(),
            RequestDescriptor::new(url, b).cache_key()
        );
    }

    #[test]
    fn test_key_depends_on_url() {
        let body = json!({"text": "Hamburg"});
        let a = RequestDescriptor::new("https://a.example/search", body.clone());
        let b = RequestDescriptor::new("https://b.example/search", body);

        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_key_depends_on_array_order() {
        let url = "https://example.com/elevation";
        let a = RequestDescriptor::new(url, json!({"points": [[1, 2], [3, 4]]}));
        let b = RequestDescriptor::new(url, json!({"points": [[3, 4], [1, 2]]}));

        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_canonical_json_sorts_nested_keys() {
        let value = json!({"z": {"y": 1, "x": [ {"b": true, "a": null} ]}, "a": "s"});
        assert_eq!(
            canonical_json(&value),
            r#"{"a":"s","z":{"x":[{"a":null,"b":true}],"y":1}}"#
        );
    }

    #[test]
    fn test_canonical_json_escapes_strings() {
        let value = json!({"q\"uote": "line\nbreak"});
        assert_eq!(canonical_json(&value), r#"{"q\"uote":"line\nbreak"}"#);
    }
}
