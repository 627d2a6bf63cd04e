use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::error::{DirectoryError, MessagingError, StoreError};
use crate::models::alert::normalize_handle;
use crate::services::storage;
use crate::services::telegram::Messaging;

/// Handle -> destination map backed by a JSON file (`telegram_users.json`).
/// `None` means the handle is registered but not yet reachable.
///
/// Rules:
/// - a handle, once present, is never removed here;
/// - a destination, once set, is never replaced (first-seen wins);
/// - filling in the destination of an unresolved entry is allowed, that is
///   how `register`-then-`refresh` becomes deliverable.
pub struct UserDirectory {
    path: PathBuf,
    messaging: Arc<dyn Messaging>,
    entries: RwLock<BTreeMap<String, Option<i64>>>,
    refresh_lock: Mutex<()>,
}

impl UserDirectory {
    pub async fn open(
        path: impl Into<PathBuf>,
        messaging: Arc<dyn Messaging>,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        let entries: BTreeMap<String, Option<i64>> =
            storage::read_json(&path).await?.unwrap_or_default();

        Ok(Self {
            path,
            messaging,
            entries: RwLock::new(entries),
            refresh_lock: Mutex::new(()),
        })
    }

    /// Pull the provider's inbound-message log and absorb any sender we have
    /// not seen yet. Serialized against itself; re-running with no new
    /// senders is a no-op. Returns how many entries were added or resolved.
    pub async fn refresh(&self) -> Result<usize, MessagingError> {
        let _guard = self.refresh_lock.lock().await;

        let senders = self.messaging.list_inbound_senders().await?;

        let mut changed = 0;
        {
            let mut entries = self.entries.write().await;
            for s in senders {
                let current = entries.get(&s.handle).copied();
                match current {
                    Some(Some(_)) => {} // already resolved, first-seen wins
                    Some(None) => {
                        entries.insert(s.handle.clone(), Some(s.chat_id));
                        changed += 1;
                        tracing::info!(handle = %s.handle, chat_id = s.chat_id, "directory entry resolved");
                    }
                    None => {
                        entries.insert(s.handle.clone(), Some(s.chat_id));
                        changed += 1;
                        tracing::info!(handle = %s.handle, chat_id = s.chat_id, "directory entry added");
                    }
                }
            }

            if changed > 0 {
                if let Err(e) = storage::write_json_atomic(&self.path, &*entries).await {
                    tracing::error!(error = %e, "failed to persist user directory");
                }
            }
        }

        Ok(changed)
    }

    pub async fn resolve(&self, handle: &str) -> Option<i64> {
        self.entries.read().await.get(handle).copied().flatten()
    }

    /// Add a handle with no destination yet; refresh fills it in once the
    /// user messages the bot.
    pub async fn register(&self, handle: &str) -> Result<(), DirectoryError> {
        let handle =
            normalize_handle(handle).ok_or_else(|| DirectoryError::InvalidHandle(handle.into()))?;

        let mut entries = self.entries.write().await;
        if entries.contains_key(&handle) {
            return Err(DirectoryError::AlreadyRegistered);
        }
        entries.insert(handle, None);
        storage::write_json_atomic(&self.path, &*entries).await?;
        Ok(())
    }

    pub async fn list(&self) -> Vec<String> {
        self.entries.read().await.keys().cloned().collect()
    }
}
