use tabtrace_types::{
    ActivityEvent, CollectionPreferences, DwellPayload, EventPayload, KeywordsPayload,
    SessionEndPayload,
};

/// Apply per-category preferences to a single event.
///
/// Pure function: no clock, no storage, no global state. The caller (the
/// event store) enforces the `global` gate before invoking this; the
/// filter only handles per-category removal.
///
/// Category semantics:
/// - `urls` off strips `url_hash`
/// - `titles` off strips `title`
/// - `timeOnPage` off strips `duration_ms` (dwell and session_end)
/// - `interactions` off rejects interaction events outright - the whole
///   signal is category-gated, not just a field
/// - `keywords` off empties the keyword list
/// - `categories` / `sessions` / `metadata` off strip the matching
///   envelope field
///
/// The referrer is gated at construction time by the collector, not here.
///
/// Returns None when nothing informative beyond `ts`/`tab_id` survives;
/// such husks are never stored. Idempotent: re-filtering a filtered event
/// under the same preferences is a no-op.
pub fn sanitize(event: &ActivityEvent, prefs: &CollectionPreferences) -> Option<ActivityEvent> {
    let enabled = &prefs.enabled;

    let payload = match &event.payload {
        EventPayload::Interaction(_) if !enabled.interactions => return None,
        EventPayload::Dwell(dwell) => EventPayload::Dwell(DwellPayload {
            duration_ms: if enabled.time_on_page {
                dwell.duration_ms
            } else {
                None
            },
        }),
        EventPayload::SessionEnd(end) => EventPayload::SessionEnd(SessionEndPayload {
            duration_ms: if enabled.time_on_page {
                end.duration_ms
            } else {
                None
            },
        }),
        EventPayload::Keywords(kw) => EventPayload::Keywords(KeywordsPayload {
            keywords: if enabled.keywords {
                kw.keywords.clone()
            } else {
                Vec::new()
            },
        }),
        other => other.clone(),
    };

    let filtered = ActivityEvent {
        ts: event.ts,
        tab_id: event.tab_id,
        domain: event.domain.clone(),
        title: enabled.titles.then(|| event.title.clone()).flatten(),
        url_hash: enabled.urls.then(|| event.url_hash.clone()).flatten(),
        referrer: event.referrer.clone(),
        session_id: enabled.sessions.then(|| event.session_id.clone()).flatten(),
        category: enabled.categories.then(|| event.category.clone()).flatten(),
        meta: enabled.metadata.then(|| event.meta.clone()).flatten(),
        payload,
    };

    filtered.has_informative_content().then_some(filtered)
}
