use serde::{Deserialize, Serialize};

/// User-controlled collection preferences.
///
/// Loaded from the persisted preferences document at collector startup and
/// replaced wholesale whenever the embedder signals a change. The pipeline
/// never reads this from ambient global state; it is injected into the
/// event store and passed explicitly to the preference filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPreferences {
    /// Master switch. When false, nothing is appended regardless of the
    /// per-category toggles.
    #[serde(default = "default_true")]
    pub global: bool,

    #[serde(default)]
    pub enabled: CategoryToggles,
}

/// Per-category collection toggles.
///
/// Field names mirror the persisted JSON document (camelCase keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryToggles {
    #[serde(default = "default_true")]
    pub urls: bool,
    #[serde(default = "default_true")]
    pub titles: bool,
    #[serde(default = "default_true")]
    pub time_on_page: bool,
    #[serde(default = "default_true")]
    pub interactions: bool,
    #[serde(default = "default_true")]
    pub referrers: bool,
    #[serde(default = "default_true")]
    pub sessions: bool,
    #[serde(default = "default_true")]
    pub categories: bool,
    #[serde(default = "default_true")]
    pub metadata: bool,
    #[serde(default = "default_true")]
    pub keywords: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CategoryToggles {
    fn default() -> Self {
        Self {
            urls: true,
            titles: true,
            time_on_page: true,
            interactions: true,
            referrers: true,
            sessions: true,
            categories: true,
            metadata: true,
            keywords: true,
        }
    }
}

impl Default for CollectionPreferences {
    fn default() -> Self {
        Self {
            global: true,
            enabled: CategoryToggles::default(),
        }
    }
}

impl CollectionPreferences {
    /// Everything off except the master switch. Useful as a starting point
    /// for opt-in configurations.
    pub fn none_enabled() -> Self {
        Self {
            global: true,
            enabled: CategoryToggles {
                urls: false,
                titles: false,
                time_on_page: false,
                interactions: false,
                referrers: false,
                sessions: false,
                categories: false,
                metadata: false,
                keywords: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_all_enabled() {
        let prefs = CollectionPreferences::default();
        assert!(prefs.global);
        assert!(prefs.enabled.urls);
        assert!(prefs.enabled.time_on_page);
        assert!(prefs.enabled.keywords);
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        // A stored document may predate newer categories; missing keys
        // default to enabled.
        let prefs: CollectionPreferences =
            serde_json::from_str(r#"{"global": false, "enabled": {"urls": false}}"#).unwrap();
        assert!(!prefs.global);
        assert!(!prefs.enabled.urls);
        assert!(prefs.enabled.titles);
        assert!(prefs.enabled.metadata);
    }

    #[test]
    fn test_camel_case_keys_round_trip() {
        let prefs = CollectionPreferences::default();
        let json = serde_json::to_value(&prefs).unwrap();
        assert_eq!(json["enabled"]["timeOnPage"], serde_json::json!(true));

        let back: CollectionPreferences = serde_json::from_value(json).unwrap();
        assert_eq!(back, prefs);
    }
}
