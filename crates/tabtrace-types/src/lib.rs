pub mod event;
pub mod meta;
pub mod prefs;

pub use event::*;
pub use meta::{ClientMeta, ScreenSize};
pub use prefs::{CategoryToggles, CollectionPreferences};
