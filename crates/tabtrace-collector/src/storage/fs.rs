use crate::error::{Error, Result};
use crate::storage::StorageBackend;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// One JSON file per logical key inside a base directory.
///
/// Writes go through a temp file followed by a rename so a crashed write
/// never leaves a truncated document behind.
#[derive(Debug, Clone)]
pub struct FsBackend {
    base_dir: PathBuf,
}

impl FsBackend {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn doc_path(&self, key: &str) -> Result<PathBuf> {
        // Keys are well-known storage identifiers, not user input; reject
        // anything that would escape the base directory.
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(Error::Storage(format!("invalid storage key: {key:?}")));
        }
        Ok(self.base_dir.join(format!("{key}.json")))
    }
}

impl StorageBackend for FsBackend {
    async fn read(&self, key: &str) -> Result<Option<Value>> {
        let path = self.doc_path(key)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn write(&self, key: &str, doc: &Value) -> Result<()> {
        let path = self.doc_path(key)?;
        tokio::fs::create_dir_all(&self.base_dir).await?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec(doc)?).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

impl AsRef<Path> for FsBackend {
    fn as_ref(&self) -> &Path {
        &self.base_dir
    }
}
