// Collector module - everything between raw browser signals and the
// persisted event log: preference filtering, per-tab session tracking,
// keyword extraction, and the append-only store with its storage backends.

pub mod classify;
pub mod collector;
pub mod config;
pub mod error;
pub mod filter;
pub mod keywords;
pub mod session;
pub mod storage;
pub mod store;
pub mod util;

pub use classify::classify_url;
pub use collector::{Collector, NavigationDetails, PageContext};
pub use config::CollectorConfig;
pub use error::{Error, Result};
pub use filter::sanitize;
pub use keywords::extract_top_keywords;
pub use session::{Session, SessionTracker};
pub use storage::{FsBackend, MemoryBackend, StorageBackend};
pub use store::{EventStore, domain_counts};
