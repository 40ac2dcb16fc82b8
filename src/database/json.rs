//! JSON file record store
//!
//! The whole store is one JSON document. Writes go to a temporary file in the
//! same directory, are fsynced, then renamed over the original, so a reader
//! sees either the old document or the new one.

use std::path::{Path, PathBuf};
use std::time::Instant;
use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::models::{BookingRecord, NewBooking, UserRecord};
use crate::utils::errors::{TravelBuddyError, Result};
use crate::utils::logging::log_store_operation;
use super::store::{RecordStore, StoreDocument};

pub struct JsonRecordStore {
    path: PathBuf,
    /// Held across every read-modify-write
    write_lock: Mutex<()>,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document; a missing or blank file is an empty store
    async fn read_document(&self) -> Result<StoreDocument> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Record store file missing, starting empty");
                return Ok(StoreDocument::default());
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to read record store");
                return Err(TravelBuddyError::PersistFailed(format!("read failed: {}", e)));
            }
        };

        if content.trim().is_empty() {
            return Ok(StoreDocument::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "Record store is not valid JSON");
            TravelBuddyError::PersistFailed(format!("decode failed: {}", e))
        })
    }

    async fn write_document(&self, document: &StoreDocument) -> Result<()> {
        self.write_atomically(document)
            .await
            .map_err(|e| {
                error!(path = %self.path.display(), error = %e, "Failed to write record store");
                TravelBuddyError::PersistFailed(format!("write failed: {}", e))
            })
    }

    async fn write_atomically(&self, document: &StoreDocument) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_vec_pretty(document)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let tmp_path = self.temp_path();
        let mut tmp_file = fs::File::create(&tmp_path).await?;
        tmp_file.write_all(&body).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e);
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "records.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn get_user(&self, id: i64) -> Result<Option<UserRecord>> {
        let document = self.read_document().await?;
        Ok(document.find_user(id).cloned())
    }

    async fn put_user(&self, user: UserRecord) -> Result<()> {
        let started = Instant::now();
        let user_id = user.id;
        let _guard = self.write_lock.lock().await;

        let mut document = self.read_document().await?;
        document.upsert_user(user);
        let result = self.write_document(&document).await;

        log_store_operation("put_user", user_id, started.elapsed().as_millis() as u64, result.is_ok());
        result
    }

    async fn append_booking(&self, user_id: i64, booking: NewBooking) -> Result<BookingRecord> {
        let started = Instant::now();
        let _guard = self.write_lock.lock().await;

        let result = async {
            let mut document = self.read_document().await?;
            let record = document.append_booking(user_id, booking)?;
            self.write_document(&document).await?;
            Ok(record)
        }
        .await;

        log_store_operation("append_booking", user_id, started.elapsed().as_millis() as u64, result.is_ok());
        result
    }
}

impl std::fmt::Debug for JsonRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRecordStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
