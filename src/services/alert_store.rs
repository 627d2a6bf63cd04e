use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::Alert;
use crate::services::storage;

/// Mutable collection of active alerts. `load_all` preserves insertion order
/// and `save_all` is an atomic full replace; the engine's correctness depends
/// on both.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Alert>, StoreError>;
    async fn save_all(&self, alerts: &[Alert]) -> Result<(), StoreError>;
    async fn append(&self, alert: Alert) -> Result<(), StoreError>;

    /// Removes by `id` only. Returns false when no alert carries that id.
    async fn remove_by_id(&self, id: &str) -> Result<bool, StoreError>;
}

/// JSON file-backed store (`alerts.json`). The mutex serializes the
/// load-mutate-save sequences of `append`/`remove_by_id` against each other
/// and against `save_all`.
pub struct JsonFileAlertStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileAlertStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl AlertStore for JsonFileAlertStore {
    async fn load_all(&self) -> Result<Vec<Alert>, StoreError> {
        Ok(storage::read_json(&self.path).await?.unwrap_or_default())
    }

    async fn save_all(&self, alerts: &[Alert]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        storage::write_json_atomic(&self.path, &alerts).await
    }

    async fn append(&self, alert: Alert) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut alerts: Vec<Alert> = storage::read_json(&self.path).await?.unwrap_or_default();
        alerts.push(alert);
        storage::write_json_atomic(&self.path, &alerts).await
    }

    async fn remove_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut alerts: Vec<Alert> = storage::read_json(&self.path).await?.unwrap_or_default();
        let before = alerts.len();
        alerts.retain(|a| a.id != id);
        if alerts.len() == before {
            return Ok(false);
        }
        storage::write_json_atomic(&self.path, &alerts).await?;
        Ok(true)
    }
}
