mod fs;
mod memory;

pub use fs::FsBackend;
pub use memory::MemoryBackend;

use crate::error::Result;
use serde_json::Value;

/// Persisted JSON-document storage, addressed by a logical key.
///
/// Every call is a suspension point: between issuing a read/write and its
/// completion, unrelated collector work may interleave. The event store
/// layers its own mutual exclusion on top, so backends only need each
/// individual read or write to be atomic - no partial documents may ever
/// be observable.
pub trait StorageBackend {
    /// Fetch the document under `key`, or None if never written.
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<Value>>> + Send;

    /// Replace the document under `key`.
    fn write(&self, key: &str, doc: &Value) -> impl Future<Output = Result<()>> + Send;
}
