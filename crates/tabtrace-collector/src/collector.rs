use anyhow::{Context, Result};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::classify::classify_url;
use crate::config::CollectorConfig;
use crate::session::SessionTracker;
use crate::storage::StorageBackend;
use crate::store::EventStore;
use crate::util::{extract_domain, hash_string_hex};
use tabtrace_engine::{
    AggregateConfig, AggregateResult, ExportedDataset, aggregate, build_export,
};
use tabtrace_types::{ActivityEvent, ClientMeta, CollectionPreferences, EventPayload};

/// Top-level navigation notification from the browser hook.
#[derive(Debug, Clone)]
pub struct NavigationDetails {
    pub tab_id: i64,
    pub url: String,
    /// 0 for the top-level frame; anything else is ignored
    pub frame_id: u32,
    /// Tab title if already known (may lag until load completes)
    pub title: Option<String>,
    /// Coarse transition qualifiers; stored joined, never a referrer URL
    pub transition_qualifiers: Vec<String>,
}

/// Where a page-instrumentation message came from.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub tab_id: Option<i64>,
    pub url: String,
    /// Client metadata sampled by the page instrumentation
    pub meta: Option<ClientMeta>,
}

/// The collection service: receives browser signals, stamps them with
/// session identity and privacy-reduced URL data, and hands them to the
/// event store.
///
/// Single logical writer: the session registry sits behind one lock so
/// same-tab events apply in arrival order, and the store serializes log
/// writes underneath. The aggregation path only ever reads.
pub struct Collector<B: StorageBackend> {
    store: EventStore<B>,
    sessions: Mutex<SessionTracker>,
    config: CollectorConfig,
    /// OS family reported by the embedding platform, attached to client
    /// metadata when the metadata category is enabled
    platform_os: Option<String>,
}

impl<B: StorageBackend> Collector<B> {
    pub fn new(backend: B, config: CollectorConfig, prefs: CollectionPreferences) -> Self {
        let store = EventStore::new(backend, config.storage_key.clone(), prefs);
        Self {
            store,
            sessions: Mutex::new(SessionTracker::new()),
            config,
            platform_os: None,
        }
    }

    pub fn with_platform_os(mut self, os: impl Into<String>) -> Self {
        self.platform_os = Some(os.into());
        self
    }

    pub fn store(&self) -> &EventStore<B> {
        &self.store
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn update_preferences(&self, prefs: CollectionPreferences) {
        self.store.update_preferences(prefs);
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.active_count()
    }

    /// Handle a committed navigation. Creates or refreshes the tab's
    /// session and records a `navigation` event. Subframe navigations are
    /// ignored. Returns whether an event was stored.
    pub async fn on_navigation_committed(
        &self,
        details: &NavigationDetails,
        now: i64,
    ) -> Result<bool> {
        if details.frame_id != 0 {
            return Ok(false);
        }

        let prefs = self.store.preferences();
        let domain = extract_domain(&details.url);

        let session_id = {
            let mut sessions = self.sessions.lock().await;
            sessions
                .begin_or_touch(details.tab_id, now)
                .session_id
                .clone()
        };

        let mut event = ActivityEvent::new(now, EventPayload::Navigation);
        event.tab_id = Some(details.tab_id);
        event.domain = domain.clone();
        if prefs.enabled.titles {
            event.title = details.title.clone().filter(|t| !t.is_empty());
        }
        if prefs.enabled.urls {
            event.url_hash = Some(hash_string_hex(&details.url));
        }
        if prefs.enabled.referrers && !details.transition_qualifiers.is_empty() {
            event.referrer = Some(details.transition_qualifiers.join(","));
        }
        if prefs.enabled.sessions {
            event.session_id = Some(session_id);
        }
        if prefs.enabled.categories {
            event.category = Some(classify_url(&details.url, domain.as_deref()).to_string());
        }

        self.store
            .append(&event)
            .await
            .context("failed to append navigation event")
    }

    /// Record a `load` event once the page finishes loading.
    pub async fn on_navigation_completed(&self, tab_id: i64, url: &str, now: i64) -> Result<bool> {
        let prefs = self.store.preferences();

        let mut event = ActivityEvent::new(now, EventPayload::Load);
        event.tab_id = Some(tab_id);
        event.domain = extract_domain(url);
        if prefs.enabled.urls {
            event.url_hash = Some(hash_string_hex(url));
        }

        self.store
            .append(&event)
            .await
            .context("failed to append load event")
    }

    /// Record a `title` event for a late title change. Skipped entirely
    /// when title collection is off.
    pub async fn on_title_changed(
        &self,
        tab_id: i64,
        url: &str,
        title: &str,
        now: i64,
    ) -> Result<bool> {
        let prefs = self.store.preferences();
        if !prefs.enabled.titles {
            return Ok(false);
        }

        let mut event = ActivityEvent::new(now, EventPayload::Title);
        event.tab_id = Some(tab_id);
        event.domain = extract_domain(url);
        event.title = Some(title.to_string());
        if prefs.enabled.urls {
            event.url_hash = Some(hash_string_hex(url));
        }

        self.store
            .append(&event)
            .await
            .context("failed to append title event")
    }

    /// Finalize the tab's session and record its `session_end` event.
    pub async fn on_tab_removed(&self, tab_id: i64, now: i64) -> Result<bool> {
        let ended = {
            let mut sessions = self.sessions.lock().await;
            sessions.end(tab_id, now)
        };

        match ended {
            Some(event) => self
                .store
                .append(&event)
                .await
                .context("failed to append session_end event"),
            None => Ok(false),
        }
    }

    /// Handle a raw page-instrumentation message (dwell, interaction,
    /// keyword sample). Malformed payloads are dropped silently; the
    /// envelope is stamped here, so the page never controls timestamps,
    /// session identity, or URL hashes.
    pub async fn on_page_event(&self, raw: &Value, ctx: &PageContext, now: i64) -> Result<bool> {
        let Some(payload) = EventPayload::from_raw(raw) else {
            log::warn!("dropping malformed page event from tab {:?}", ctx.tab_id);
            return Ok(false);
        };

        let prefs = self.store.preferences();

        let mut event = ActivityEvent::new(now, payload);
        event.tab_id = ctx.tab_id;
        event.domain = extract_domain(&ctx.url);
        if prefs.enabled.urls {
            event.url_hash = Some(hash_string_hex(&ctx.url));
        }
        if prefs.enabled.sessions
            && let Some(tab_id) = ctx.tab_id
        {
            let sessions = self.sessions.lock().await;
            event.session_id = sessions.get(tab_id).map(|s| s.session_id.clone());
        }
        if prefs.enabled.metadata {
            let mut meta = ctx.meta.clone().unwrap_or_default();
            if meta.os.is_none() {
                meta.os = self.platform_os.clone();
            }
            if !meta.is_empty() {
                event.meta = Some(meta);
            }
        }

        self.store
            .append(&event)
            .await
            .context("failed to append page event")
    }

    /// Aggregate the current log into per-domain statistics. The optional
    /// override narrows or widens the keyword cutoff for this request
    /// only.
    pub async fn aggregated(&self, top_keywords: Option<usize>) -> Result<AggregateResult> {
        let events = self.store.get_all().await.context("failed to read log")?;
        let config = AggregateConfig {
            top_keywords: top_keywords.unwrap_or(self.config.top_keywords),
        };
        Ok(aggregate(&events, &config))
    }

    /// Aggregate and wrap into the export envelope handed to the
    /// downstream transport.
    pub async fn export_dataset(&self, top_keywords: Option<usize>) -> Result<ExportedDataset> {
        let events = self.store.get_all().await.context("failed to read log")?;
        let config = AggregateConfig {
            top_keywords: top_keywords.unwrap_or(self.config.top_keywords),
        };
        let result = aggregate(&events, &config);
        Ok(build_export(result, events.len()))
    }
}
