use std::sync::Arc;
use tabtrace_collector::{EventStore, FsBackend, MemoryBackend, domain_counts};
use tabtrace_types::{
    ActivityEvent, CollectionPreferences, DwellPayload, EventPayload, KeywordsPayload,
};

fn nav_event(domain: &str, ts: i64) -> ActivityEvent {
    let mut event = ActivityEvent::new(ts, EventPayload::Navigation);
    event.domain = Some(domain.to_string());
    event
}

fn memory_store(prefs: CollectionPreferences) -> EventStore<MemoryBackend> {
    EventStore::new(MemoryBackend::new(), "activity_events_v1", prefs)
}

#[tokio::test]
async fn test_append_and_read_back_in_order() {
    let store = memory_store(CollectionPreferences::default());

    for i in 0..5 {
        assert!(store.append(&nav_event("a.com", i)).await.unwrap());
    }

    let events = store.get_all().await.unwrap();
    let timestamps: Vec<i64> = events.iter().map(|e| e.ts).collect();
    assert_eq!(timestamps, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_global_gate_suppresses_append() {
    let mut prefs = CollectionPreferences::default();
    prefs.global = false;
    let store = memory_store(prefs);

    assert!(!store.append(&nav_event("a.com", 1)).await.unwrap());
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_filtered_out_event_is_not_stored() {
    let mut prefs = CollectionPreferences::default();
    prefs.enabled.keywords = false;
    let store = memory_store(prefs);

    let mut event = ActivityEvent::new(
        1,
        EventPayload::Keywords(KeywordsPayload {
            keywords: vec!["rust".to_string()],
        }),
    );
    event.tab_id = Some(3);

    assert!(!store.append(&event).await.unwrap());
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_preferences_applies_to_later_appends() {
    let store = memory_store(CollectionPreferences::default());
    assert!(store.append(&nav_event("a.com", 1)).await.unwrap());

    let mut off = CollectionPreferences::default();
    off.global = false;
    store.update_preferences(off);
    assert!(!store.append(&nav_event("a.com", 2)).await.unwrap());

    // earlier events are untouched
    assert_eq!(store.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_remove_domain_and_clear() {
    let store = memory_store(CollectionPreferences::default());
    store.append(&nav_event("a.com", 1)).await.unwrap();
    store.append(&nav_event("b.com", 2)).await.unwrap();
    store.append(&nav_event("a.com", 3)).await.unwrap();

    let removed = store.remove_domain("a.com").await.unwrap();
    assert_eq!(removed, 2);

    let events = store.get_all().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].domain.as_deref(), Some("b.com"));

    store.clear().await.unwrap();
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_domain_unknown_bucket() {
    let store = memory_store(CollectionPreferences::default());

    let mut event = ActivityEvent::new(
        1,
        EventPayload::Dwell(DwellPayload {
            duration_ms: Some(100),
        }),
    );
    event.tab_id = Some(1);
    store.append(&event).await.unwrap();
    store.append(&nav_event("a.com", 2)).await.unwrap();

    assert_eq!(store.remove_domain("unknown").await.unwrap(), 1);
    assert_eq!(store.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_domain_counts() {
    let store = memory_store(CollectionPreferences::default());
    store.append(&nav_event("a.com", 1)).await.unwrap();
    store.append(&nav_event("a.com", 2)).await.unwrap();
    store.append(&nav_event("b.com", 3)).await.unwrap();

    let counts = domain_counts(&store.get_all().await.unwrap());
    assert_eq!(counts["a.com"], 2);
    assert_eq!(counts["b.com"], 1);
}

#[tokio::test]
async fn test_concurrent_appends_all_land() {
    let store = Arc::new(memory_store(CollectionPreferences::default()));

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.append(&nav_event("a.com", i)).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    // the single-writer lock means no append can overwrite another's
    // read-modify-write
    assert_eq!(store.get_all().await.unwrap().len(), 20);
}

#[tokio::test]
async fn test_fs_backend_persists_across_store_instances() {
    let dir = tempfile::TempDir::new().unwrap();

    {
        let store = EventStore::new(
            FsBackend::new(dir.path()),
            "activity_events_v1",
            CollectionPreferences::default(),
        );
        store.append(&nav_event("a.com", 1)).await.unwrap();
    }

    let store = EventStore::new(
        FsBackend::new(dir.path()),
        "activity_events_v1",
        CollectionPreferences::default(),
    );
    let events = store.get_all().await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].domain.as_deref(), Some("a.com"));
}
