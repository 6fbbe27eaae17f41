use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::payload::EventPayload;
use crate::meta::ClientMeta;

// NOTE: Schema Design Goals
//
// 1. Fidelity: field names and the `type` tag match the persisted log
//    document, so a stored array round-trips byte-compatible with what the
//    collector wrote.
//
// 2. Privacy by construction: there is no field for a raw URL. Only the
//    one-way `url_hash` and the bare hostname (`domain`) exist in the
//    schema, so nothing downstream can accidentally persist a full URL.
//
// 3. Tagged union over duck-typing: each signal kind carries only its own
//    fields. The preference filter is a pattern match over the tag instead
//    of ad-hoc key deletion, and impossible field combinations (a scroll
//    percent on a navigation) cannot be represented.

/// One observed browsing signal.
///
/// The envelope holds fields shared across signal kinds; all of them are
/// optional because each is independently removable by the preference
/// filter. `ts` and `tab_id` alone never justify storing an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Wall-clock timestamp, milliseconds since the Unix epoch
    pub ts: i64,

    /// Opaque identifier of the originating browser tab
    #[serde(rename = "tabId", default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<i64>,

    /// Hostname of the visited page, or absent when unparsable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Page title at the time of the signal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// SHA-256 hex digest of the full URL; the raw URL is never stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_hash: Option<String>,

    /// Coarse referrer information (transition qualifiers, not a URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,

    /// Session identifier in the form "{tabId}-{startTs}"
    #[serde(rename = "sessionId", default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Coarse page category from the fixed taxonomy, or "other"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Coarse client metadata (language, screen, OS)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ClientMeta>,

    #[serde(flatten)]
    pub payload: EventPayload,
}

impl ActivityEvent {
    /// Bare event with an empty envelope. The collector fills in whichever
    /// envelope fields the active preferences allow.
    pub fn new(ts: i64, payload: EventPayload) -> Self {
        Self {
            ts,
            tab_id: None,
            domain: None,
            title: None,
            url_hash: None,
            referrer: None,
            session_id: None,
            category: None,
            meta: None,
            payload,
        }
    }

    /// Permissive decode of a full inbound raw event.
    ///
    /// Requires a numeric `ts` and a known `type`; everything else is
    /// optional, and recognized fields of the wrong JSON type are dropped
    /// rather than failing the whole event. Returns None for malformed
    /// shapes, which the caller discards silently.
    pub fn from_raw(raw: &Value) -> Option<ActivityEvent> {
        let obj = raw.as_object()?;
        let ts = obj.get("ts")?.as_i64()?;
        let payload = EventPayload::from_raw(raw)?;

        let string_field = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

        Some(ActivityEvent {
            ts,
            tab_id: obj.get("tabId").and_then(Value::as_i64),
            domain: string_field("domain"),
            title: string_field("title"),
            url_hash: string_field("url_hash"),
            referrer: string_field("referrer"),
            session_id: string_field("sessionId"),
            category: string_field("category"),
            meta: obj
                .get("meta")
                .and_then(|m| serde_json::from_value(m.clone()).ok()),
            payload,
        })
    }

    /// Whether anything informative remains beyond `ts`/`tab_id` and the
    /// bare type tag. Events failing this after filtering are dropped.
    pub fn has_informative_content(&self) -> bool {
        self.domain.is_some()
            || self.title.is_some()
            || self.url_hash.is_some()
            || self.referrer.is_some()
            || self.session_id.is_some()
            || self.category.is_some()
            || self.meta.is_some()
            || self.payload.has_content()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::payload::DwellPayload;
    use serde_json::json;

    #[test]
    fn test_serialization_round_trip() {
        let mut event = ActivityEvent::new(
            1_700_000_000_000,
            EventPayload::Dwell(DwellPayload {
                duration_ms: Some(1500),
            }),
        );
        event.tab_id = Some(7);
        event.domain = Some("example.org".to_string());
        event.session_id = Some("7-1699999990000".to_string());

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "dwell");
        assert_eq!(json["tabId"], 7);
        assert_eq!(json["sessionId"], "7-1699999990000");
        assert!(json.get("title").is_none());

        let back: ActivityEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_from_raw_requires_ts_and_type() {
        assert!(ActivityEvent::from_raw(&json!({"type": "navigation"})).is_none());
        assert!(ActivityEvent::from_raw(&json!({"ts": 1000})).is_none());
        assert!(ActivityEvent::from_raw(&json!({"ts": "1000", "type": "navigation"})).is_none());
    }

    #[test]
    fn test_from_raw_drops_ill_typed_fields() {
        let event = ActivityEvent::from_raw(&json!({
            "type": "navigation",
            "ts": 1000,
            "tabId": "five",
            "domain": "example.org",
            "title": 42
        }))
        .unwrap();

        assert_eq!(event.tab_id, None);
        assert_eq!(event.title, None);
        assert_eq!(event.domain.as_deref(), Some("example.org"));
    }

    #[test]
    fn test_informative_content() {
        let bare = ActivityEvent::new(1, EventPayload::Navigation);
        assert!(!bare.has_informative_content());

        let mut with_domain = bare.clone();
        with_domain.domain = Some("example.org".to_string());
        assert!(with_domain.has_informative_content());

        let mut with_tab = bare;
        with_tab.tab_id = Some(3);
        assert!(!with_tab.has_informative_content());
    }
}
