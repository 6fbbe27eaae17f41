use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event payload variants, one per observed signal kind.
///
/// The tag and all field names match the persisted log document, so the
/// stored JSON array deserializes directly into typed events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum EventPayload {
    /// Top-level navigation committed in a tab
    Navigation,

    /// Page finished loading
    Load,

    /// Tab title changed after load
    Title,

    /// Continuous page-visibility measurement
    Dwell(DwellPayload),

    /// Click or scroll-depth signal from page instrumentation
    Interaction(InteractionPayload),

    /// Keyword sample extracted from visible page text
    Keywords(KeywordsPayload),

    /// Emitted once when a tracked tab closes
    SessionEnd(SessionEndPayload),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DwellPayload {
    /// Visible time in milliseconds. Absent when the timeOnPage category
    /// has been filtered out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionPayload {
    #[serde(rename = "interactionType")]
    pub interaction_type: InteractionType,

    /// Coarse DOM descriptor, only present on clicks. Never carries text
    /// content or anything from editable elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<ClickDescriptor>,

    /// Running maximum scroll depth, 0-100. Only present on scrolls.
    #[serde(
        rename = "maxScrollPercent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_scroll_percent: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    Click,
    Scroll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickDescriptor {
    /// Element tag name (e.g. "BUTTON")
    pub tag: String,

    /// Up to the first few class names of the clicked element
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordsPayload {
    /// Ordered by descending frequency, bounded by the configured top-K.
    /// Empties out (and the event is then dropped) when the keywords
    /// category is disabled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEndPayload {
    /// Full elapsed session duration in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl EventPayload {
    /// Permissive decode of an inbound raw payload.
    ///
    /// Raw events arrive as arbitrary JSON from browser hooks and page
    /// instrumentation. Only the `type` tag must be present and known;
    /// recognized fields with the wrong JSON type are treated as absent.
    /// Returns None for shapes that carry no decodable signal at all.
    pub fn from_raw(raw: &Value) -> Option<EventPayload> {
        let obj = raw.as_object()?;
        let kind = obj.get("type")?.as_str()?;

        match kind {
            "navigation" => Some(EventPayload::Navigation),
            "load" => Some(EventPayload::Load),
            "title" => Some(EventPayload::Title),
            "dwell" => Some(EventPayload::Dwell(DwellPayload {
                duration_ms: obj.get("duration_ms").and_then(Value::as_u64),
            })),
            "interaction" => {
                let interaction_type = match obj.get("interactionType").and_then(Value::as_str) {
                    Some("click") => InteractionType::Click,
                    Some("scroll") => InteractionType::Scroll,
                    // An interaction without a recognizable kind carries
                    // no signal worth storing.
                    _ => return None,
                };
                Some(EventPayload::Interaction(InteractionPayload {
                    interaction_type,
                    descriptor: obj
                        .get("descriptor")
                        .and_then(|d| serde_json::from_value(d.clone()).ok()),
                    max_scroll_percent: obj
                        .get("maxScrollPercent")
                        .and_then(Value::as_u64)
                        .map(|p| p.min(100) as u8),
                }))
            }
            "keywords" => {
                let keywords = obj
                    .get("keywords")
                    .and_then(Value::as_array)
                    .map(|arr| {
                        arr.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                Some(EventPayload::Keywords(KeywordsPayload { keywords }))
            }
            "session_end" => Some(EventPayload::SessionEnd(SessionEndPayload {
                duration_ms: obj.get("duration_ms").and_then(Value::as_u64),
            })),
            _ => None,
        }
    }

    /// Whether the payload itself carries information beyond its tag.
    pub fn has_content(&self) -> bool {
        match self {
            EventPayload::Navigation | EventPayload::Load | EventPayload::Title => false,
            EventPayload::Dwell(d) => d.duration_ms.is_some(),
            EventPayload::Interaction(_) => true,
            EventPayload::Keywords(k) => !k.keywords.is_empty(),
            EventPayload::SessionEnd(s) => s.duration_ms.is_some(),
        }
    }
}
