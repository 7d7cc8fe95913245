//! Task repository operations
//!
//! Every mutation reads the full collection, applies one change and writes
//! the full collection back.

use std::time::Duration;
use tokio::sync::Mutex;

use super::model::{NewTask, Task, TaskPatch};
use super::storage::{generate_id, FileTaskStorage, TaskStorage};
use crate::config::{LatencyProfile, StoreConfig};
use crate::{Error, Result};

/// CRUD operations over a [`TaskStorage`]
pub struct TaskService<S> {
    storage: S,
    latency: LatencyProfile,
    recover_corrupt: bool,
    /// Held across each read-modify-write
    write_lock: Mutex<()>,
}

impl TaskService<FileTaskStorage> {
    /// Open a file-backed service from configuration
    pub fn open(config: &StoreConfig) -> Self {
        let storage = FileTaskStorage::new(&config.data_dir, &config.storage_key);
        tracing::info!("Using task store: {:?}", storage.path());
        Self::new(storage)
            .with_latency(config.latency)
            .with_recover_corrupt(config.recover_corrupt)
    }
}

impl<S: TaskStorage> TaskService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            latency: LatencyProfile::none(),
            recover_corrupt: false,
            write_lock: Mutex::new(()),
        }
    }

    /// Set the per-operation artificial delay
    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    /// Treat an unparseable store as empty (logged) instead of failing
    pub fn with_recover_corrupt(mut self, recover_corrupt: bool) -> Self {
        self.recover_corrupt = recover_corrupt;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    async fn pause(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    async fn load(&self) -> Result<Vec<Task>> {
        match self.storage.load_all().await {
            Err(e) if self.recover_corrupt && e.is_corrupt_store() => {
                tracing::warn!("Discarding unreadable task store: {}", e);
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Get all tasks in stored order
    pub async fn get_all(&self) -> Result<Vec<Task>> {
        Self::pause(self.latency.get_all).await;
        self.load().await
    }

    /// Get a task by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Task>> {
        Self::pause(self.latency.get_by_id).await;
        let tasks = self.load().await?;
        Ok(tasks.into_iter().find(|t| t.id == id))
    }

    /// Create a task from `data`
    ///
    /// Trims title and description and fills defaults. No validation is
    /// performed here.
    pub async fn create(&self, data: NewTask) -> Result<Task> {
        Self::pause(self.latency.create).await;
        let _guard = self.write_lock.lock().await;

        let mut tasks = self.load().await?;
        let mut task = data.into_task();
        while tasks.iter().any(|t| t.id == task.id) {
            task.id = generate_id();
        }

        tasks.push(task.clone());
        self.storage.save_all(&tasks).await?;
        tracing::debug!(task_id = %task.id, "Created task");
        Ok(task)
    }

    /// Merge `patch` over an existing task
    ///
    /// The id is never changed, whatever the patch carries.
    pub async fn update(&self, id: &str, patch: TaskPatch) -> Result<Task> {
        Self::pause(self.latency.update).await;
        let _guard = self.write_lock.lock().await;

        let mut tasks = self.load().await?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

        patch.merge_into(task);
        task.id = id.to_string();
        task.touch();
        let updated = task.clone();

        self.storage.save_all(&tasks).await?;
        tracing::debug!(task_id = %id, "Updated task");
        Ok(updated)
    }

    /// Delete a task, returning the removed record
    pub async fn delete(&self, id: &str) -> Result<Task> {
        Self::pause(self.latency.delete).await;
        let _guard = self.write_lock.lock().await;

        let mut tasks = self.load().await?;
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        let removed = tasks.remove(index);

        self.storage.save_all(&tasks).await?;
        tracing::debug!(task_id = %id, "Deleted task");
        Ok(removed)
    }

    /// Flip the completed flag
    pub async fn toggle_complete(&self, id: &str) -> Result<Task> {
        Self::pause(self.latency.toggle).await;
        let _guard = self.write_lock.lock().await;

        let mut tasks = self.load().await?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

        task.completed = !task.completed;
        task.touch();
        let updated = task.clone();

        self.storage.save_all(&tasks).await?;
        tracing::debug!(task_id = %id, completed = updated.completed, "Toggled task");
        Ok(updated)
    }
}
