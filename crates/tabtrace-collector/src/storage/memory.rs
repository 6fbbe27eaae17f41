use crate::error::Result;
use crate::storage::StorageBackend;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-process backend for tests and ephemeral collectors.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    docs: Mutex<HashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    async fn read(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.docs.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &str, doc: &Value) -> Result<()> {
        self.docs.lock().await.insert(key.to_string(), doc.clone());
        Ok(())
    }
}
