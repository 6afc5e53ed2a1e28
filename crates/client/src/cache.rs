//! In-memory cache of decoded GET responses.
//!
//! Keys are the request path relative to the api root plus its query string,
//! e.g. `receipts?from=2025-01-01`. The first path segment names the
//! resource a key belongs to.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde_json::Value;

/// Resources whose responses are computed from every other resource.
const DERIVED: [&str; 3] = ["dashboard", "reports", "funds"];

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<String, Value>>,
}

pub(crate) fn resource(key: &str) -> &str {
    let end = key.find(['/', '?']).unwrap_or(key.len());
    &key[..end]
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().get(key).cloned()
    }

    pub fn insert(&self, key: impl Into<String>, value: Value) {
        self.entries.lock().insert(key.into(), value);
    }

    /// Drops every entry of the resource `path` belongs to, plus the derived
    /// views.
    pub fn invalidate(&self, path: &str) {
        let target = resource(path);
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| {
            let resource = resource(key);
            resource != target && !DERIVED.contains(&resource)
        });
        tracing::debug!(
            resource = target,
            dropped = before - entries.len(),
            "invalidated cached queries"
        );
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
