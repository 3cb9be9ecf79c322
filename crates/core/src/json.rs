//! Optional nested lookup over JSON trees.
//!
//! Submissions arrive as untyped `serde_json::Value`; analytics and
//! normalization both need to reach into nested objects whose shape is not
//! guaranteed. Absent keys and non-object intermediates yield `None`,
//! never an error.

use serde_json::Value;

/// Walks `path` through nested objects.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

/// Like [`lookup`], but only yields string leaves.
pub fn lookup_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    lookup(value, path)?.as_str()
}

/// Like [`lookup`], returning an owned copy of the leaf value.
pub fn lookup_owned(value: &Value, path: &[&str]) -> Option<Value> {
    lookup(value, path).cloned()
}
