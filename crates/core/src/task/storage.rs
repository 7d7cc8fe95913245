//! Task persistence
//!
//! The whole collection lives under one storage key as a single JSON array.
//! Every save rewrites the full array.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::Task;
use crate::{Error, Result};

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "taskflow-tasks";

/// Generate a task identifier
///
/// Unique enough for a single local collection; not a security token.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Backend holding the serialized task collection
#[async_trait]
pub trait TaskStorage: Send + Sync {
    /// Load the full collection in stored order; an absent key is empty
    async fn load_all(&self) -> Result<Vec<Task>>;

    /// Overwrite the stored collection
    async fn save_all(&self, tasks: &[Task]) -> Result<()>;
}

#[async_trait]
impl<S: TaskStorage + ?Sized> TaskStorage for Arc<S> {
    async fn load_all(&self) -> Result<Vec<Task>> {
        (**self).load_all().await
    }

    async fn save_all(&self, tasks: &[Task]) -> Result<()> {
        (**self).save_all(tasks).await
    }
}

fn decode(content: &str) -> Result<Vec<Task>> {
    Ok(serde_json::from_str(content)?)
}

fn encode(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// File-based storage: one JSON file per storage key
pub struct FileTaskStorage {
    path: PathBuf,
}

impl FileTaskStorage {
    /// Store the collection at `<data_dir>/<storage_key>.json`
    ///
    /// The file is created on first write.
    pub fn new(data_dir: impl AsRef<Path>, storage_key: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", storage_key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TaskStorage for FileTaskStorage {
    async fn load_all(&self) -> Result<Vec<Task>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        decode(&content)
    }

    async fn save_all(&self, tasks: &[Task]) -> Result<()> {
        let content = encode(tasks)?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

/// In-memory storage holding the raw serialized blob
///
/// Keeps the serialized form rather than the tasks so that corrupt content
/// and size limits behave like a real key-value backend.
#[derive(Default)]
pub struct MemoryTaskStorage {
    blob: RwLock<Option<String>>,
    quota: Option<usize>,
}

impl MemoryTaskStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes whose serialized size exceeds `bytes`
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Seed the key with raw content, valid or not
    pub fn with_raw(self, raw: impl Into<String>) -> Self {
        Self {
            blob: RwLock::new(Some(raw.into())),
            quota: self.quota,
        }
    }

    /// Current raw content of the key
    pub async fn raw(&self) -> Option<String> {
        self.blob.read().await.clone()
    }
}

#[async_trait]
impl TaskStorage for MemoryTaskStorage {
    async fn load_all(&self) -> Result<Vec<Task>> {
        match self.blob.read().await.as_deref() {
            Some(content) => decode(content),
            None => Ok(Vec::new()),
        }
    }

    async fn save_all(&self, tasks: &[Task]) -> Result<()> {
        let content = encode(tasks)?;
        if let Some(quota) = self.quota {
            if content.len() > quota {
                return Err(Error::Storage(format!(
                    "quota exceeded: {} bytes > {} bytes",
                    content.len(),
                    quota
                )));
            }
        }
        *self.blob.write().await = Some(content);
        Ok(())
    }
}
