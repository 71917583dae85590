//! Read-mostly cache of last-known-remote resource state.
//!
//! Entries are JSON snapshots keyed by resource kind and scope. Invalidation
//! is reserved to the orchestrator (which owns the cache); everything else
//! only reads or stores fetched results.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// CacheKey
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Apps { org: String },
    AppDetail { name: String },
    Machines { app: String },
    MachineDetail { app: String, id: String },
    Volumes { app: String },
    Secrets { app: String },
}

// ---------------------------------------------------------------------------
// ResourceCache
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ResourceCache {
    entries: HashMap<CacheKey, Value>,
}

impl ResourceCache {
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn put<T: Serialize>(&mut self, key: CacheKey, value: &T) {
        if let Ok(snapshot) = serde_json::to_value(value) {
            self.entries.insert(key, snapshot);
        }
    }

    pub fn remove(&mut self, key: &CacheKey) {
        self.entries.remove(key);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // -- invalidation (orchestrator only) -----------------------------------

    /// Drop the app's detail entry, every org-level app list, and all of the
    /// app's nested resource entries.
    pub fn invalidate_app(&mut self, name: &str) {
        self.entries.retain(|key, _| match key {
            CacheKey::Apps { .. } => false,
            CacheKey::AppDetail { name: n } => n != name,
            CacheKey::Machines { app }
            | CacheKey::MachineDetail { app, .. }
            | CacheKey::Volumes { app }
            | CacheKey::Secrets { app } => app != name,
        });
    }

    pub fn invalidate_machines(&mut self, app: &str) {
        self.entries.retain(|key, _| match key {
            CacheKey::Machines { app: a } | CacheKey::MachineDetail { app: a, .. } => a != app,
            _ => true,
        });
    }

    pub fn invalidate_volumes(&mut self, app: &str) {
        self.entries.retain(|key, _| !matches!(key, CacheKey::Volumes { app: a } if a == app));
    }

    pub fn invalidate_secrets(&mut self, app: &str) {
        self.entries.retain(|key, _| !matches!(key, CacheKey::Secrets { app: a } if a == app));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
