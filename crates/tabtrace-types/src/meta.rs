use serde::{Deserialize, Serialize};

/// Coarse client metadata attached to page-sourced events.
///
/// Deliberately low-entropy: language tag, screen dimensions, and an OS
/// family string. Nothing here identifies a device on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<ScreenSize>,

    /// OS family as reported by the embedding platform (e.g. "mac", "linux")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ClientMeta {
    pub fn is_empty(&self) -> bool {
        self.language.is_none() && self.screen.is_none() && self.os.is_none()
    }
}
