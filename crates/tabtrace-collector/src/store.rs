use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::RwLock;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::filter::sanitize;
use crate::storage::StorageBackend;
use tabtrace_types::{ActivityEvent, CollectionPreferences};
use tabtrace_engine::aggregate::UNKNOWN_DOMAIN;

/// Append-only persisted event log under a single storage key.
///
/// The store owns the write path end to end: the global collection gate,
/// the preference filter, and the serialized read-modify-write of the
/// stored array. `append` and `remove_where` are the only mutators and
/// take the same lock, so no concurrent read-modify-write on the log is
/// possible. Previously stored events are never rewritten.
///
/// Growth is unbounded on purpose: retention is user-triggered deletion
/// only (`remove_where` / `remove_domain` / `clear`).
pub struct EventStore<B: StorageBackend> {
    backend: B,
    storage_key: String,
    prefs: RwLock<CollectionPreferences>,
    log_lock: Mutex<()>,
}

impl<B: StorageBackend> EventStore<B> {
    pub fn new(backend: B, storage_key: impl Into<String>, prefs: CollectionPreferences) -> Self {
        Self {
            backend,
            storage_key: storage_key.into(),
            prefs: RwLock::new(prefs),
            log_lock: Mutex::new(()),
        }
    }

    /// Snapshot of the injected preference state.
    pub fn preferences(&self) -> CollectionPreferences {
        self.prefs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the preference state. Called by the embedder when the
    /// persisted preferences document changes; already-stored events are
    /// not retroactively re-filtered.
    pub fn update_preferences(&self, new_prefs: CollectionPreferences) {
        log::info!(
            "collection preferences updated (global: {})",
            new_prefs.global
        );
        *self
            .prefs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = new_prefs;
    }

    /// Sanitize and persist one event. No-op when the global gate is off
    /// or when nothing informative survives filtering. Returns whether
    /// the event was stored.
    pub async fn append(&self, event: &ActivityEvent) -> Result<bool> {
        let prefs = self.preferences();
        if !prefs.global {
            return Ok(false);
        }

        let Some(sanitized) = sanitize(event, &prefs) else {
            log::debug!("event at ts {} dropped by preference filter", event.ts);
            return Ok(false);
        };

        let _guard = self.log_lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.push(serde_json::to_value(&sanitized)?);
        self.write_entries(entries).await?;
        Ok(true)
    }

    /// All stored events in arrival order. Entries that no longer decode
    /// (foreign writes, older schemas) are skipped with a warning rather
    /// than failing the whole read.
    pub async fn get_all(&self) -> Result<Vec<ActivityEvent>> {
        let entries = self.read_entries().await?;
        let mut events = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_value::<ActivityEvent>(entry) {
                Ok(event) => events.push(event),
                Err(err) => log::warn!("skipping undecodable log entry: {err}"),
            }
        }
        Ok(events)
    }

    /// Remove every stored event matching the predicate. Returns the
    /// number removed. Entries that do not decode are left in place.
    pub async fn remove_where<F>(&self, predicate: F) -> Result<usize>
    where
        F: Fn(&ActivityEvent) -> bool,
    {
        let _guard = self.log_lock.lock().await;
        let entries = self.read_entries().await?;
        let before = entries.len();

        let kept: Vec<Value> = entries
            .into_iter()
            .filter(|entry| {
                match serde_json::from_value::<ActivityEvent>(entry.clone()) {
                    Ok(event) => !predicate(&event),
                    Err(_) => true,
                }
            })
            .collect();

        let removed = before - kept.len();
        if removed > 0 {
            self.write_entries(kept).await?;
        }
        Ok(removed)
    }

    /// Delete all events for one domain; events without a parsable domain
    /// live under the "unknown" key.
    pub async fn remove_domain(&self, domain: &str) -> Result<usize> {
        self.remove_where(|event| event.domain.as_deref().unwrap_or(UNKNOWN_DOMAIN) == domain)
            .await
    }

    /// Drop the entire log.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.log_lock.lock().await;
        self.write_entries(Vec::new()).await
    }

    async fn read_entries(&self) -> Result<Vec<Value>> {
        match self.backend.read(&self.storage_key).await? {
            None => Ok(Vec::new()),
            Some(Value::Array(entries)) => Ok(entries),
            Some(other) => Err(Error::Storage(format!(
                "log document under {:?} is not an array: {}",
                self.storage_key,
                other
            ))),
        }
    }

    async fn write_entries(&self, entries: Vec<Value>) -> Result<()> {
        self.backend
            .write(&self.storage_key, &Value::Array(entries))
            .await
    }
}

/// Per-domain event counts over a log snapshot; backs the deletion UI's
/// domain inventory.
pub fn domain_counts(events: &[ActivityEvent]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for event in events {
        let domain = event.domain.as_deref().unwrap_or(UNKNOWN_DOMAIN);
        *counts.entry(domain.to_string()).or_insert(0) += 1;
    }
    counts
}
