//! In-memory record store

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{BookingRecord, NewBooking, UserRecord};
use crate::utils::errors::Result;
use super::store::{RecordStore, StoreDocument};

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    document: RwLock<StoreDocument>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            document: RwLock::new(StoreDocument {
                users,
                ..StoreDocument::default()
            }),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get_user(&self, id: i64) -> Result<Option<UserRecord>> {
        Ok(self.document.read().await.find_user(id).cloned())
    }

    async fn put_user(&self, user: UserRecord) -> Result<()> {
        self.document.write().await.upsert_user(user);
        Ok(())
    }

    async fn append_booking(&self, user_id: i64, booking: NewBooking) -> Result<BookingRecord> {
        self.document.write().await.append_booking(user_id, booking)
    }
}
