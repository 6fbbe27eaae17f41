use std::collections::HashMap;
use tabtrace_types::{ActivityEvent, EventPayload, SessionEndPayload};

/// One continuous period a tab is tracked. Transient in-memory state: a
/// process restart loses open sessions silently, which is acceptable -
/// only the `session_end` event would have been emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Deterministic id in the form "{tabId}-{startTs}"
    pub session_id: String,
    pub start_ts: i64,
    pub last_active_ts: i64,
    /// Informational cumulative active time; not required to be exact
    pub total_time_ms: u64,
}

/// Registry of live sessions keyed by tab id.
///
/// Exclusively owns session lifecycle for the process lifetime. Operations
/// on different tabs never interfere; callers must apply operations on the
/// same tab in arrival order (the collector serializes this behind one
/// lock).
#[derive(Debug, Default)]
pub struct SessionTracker {
    sessions: HashMap<i64, Session>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// NoSession -> Active on the first top-level navigation for a tab;
    /// Active -> Active (refresh `last_active_ts`) on subsequent ones.
    /// A navigation for a previously removed tab id starts a fresh
    /// session - browsers reuse tab ids and may deliver events out of
    /// order, so this is not an error.
    pub fn begin_or_touch(&mut self, tab_id: i64, now: i64) -> &Session {
        self.sessions
            .entry(tab_id)
            .and_modify(|session| {
                let idle = now.saturating_sub(session.last_active_ts);
                if idle > 0 {
                    session.total_time_ms += idle as u64;
                }
                session.last_active_ts = now;
            })
            .or_insert_with(|| {
                log::debug!("session started for tab {tab_id}");
                Session {
                    session_id: format!("{tab_id}-{now}"),
                    start_ts: now,
                    last_active_ts: now,
                    total_time_ms: 0,
                }
            })
    }

    pub fn get(&self, tab_id: i64) -> Option<&Session> {
        self.sessions.get(&tab_id)
    }

    /// Active -> terminal on tab close. Removes the registry entry and
    /// returns the `session_end` event carrying the full elapsed
    /// duration. Unknown tab ids yield None without error.
    pub fn end(&mut self, tab_id: i64, now: i64) -> Option<ActivityEvent> {
        let session = self.sessions.remove(&tab_id)?;
        log::debug!("session {} ended for tab {tab_id}", session.session_id);

        let mut event = ActivityEvent::new(
            now,
            EventPayload::SessionEnd(SessionEndPayload {
                duration_ms: Some((now - session.start_ts).max(0) as u64),
            }),
        );
        event.tab_id = Some(tab_id);
        event.session_id = Some(session.session_id);
        Some(event)
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }
}
