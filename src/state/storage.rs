//! Session storage implementation
//!
//! This module handles persistence of trip sessions, either in Redis
//! (serialized JSON with a TTL) or in process memory.

use std::collections::HashMap;
use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, warn, error};

use crate::config::RedisConfig;
use crate::utils::errors::Result;
use super::context::TripSession;

/// Keyed store of trip sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session; expired sessions read as absent
    async fn load(&self, session_id: &str) -> Result<Option<TripSession>>;

    async fn save(&self, session: &TripSession) -> Result<()>;

    async fn delete(&self, session_id: &str) -> Result<()>;

    /// Read one slot of a session
    async fn get(&self, session_id: &str, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self
            .load(session_id)
            .await?
            .and_then(|session| session.get_value(key).cloned()))
    }

    /// Write one slot of a session, creating the session if needed
    async fn set(&self, session_id: &str, key: &str, value: serde_json::Value) -> Result<()> {
        let mut session = self
            .load(session_id)
            .await?
            .unwrap_or_else(|| TripSession::new(session_id));
        session.set_data(key, value)?;
        self.save(&session).await
    }

    /// Check the backend is reachable
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Redis-based session storage
#[derive(Clone)]
pub struct RedisSessionStore {
    /// Redis connection manager
    connection_manager: redis::aio::ConnectionManager,
    /// Redis configuration
    config: RedisConfig,
}

impl RedisSessionStore {
    /// Create a new Redis session store
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Get the Redis key for a session
    fn session_key(&self, session_id: &str) -> String {
        format!("{}session:{}", self.config.prefix, session_id)
    }

    fn ttl_for(&self, session: &TripSession) -> u64 {
        if let Some(expires_at) = session.expires_at {
            let duration = expires_at - chrono::Utc::now();
            std::cmp::max(duration.num_seconds(), 60) as u64 // Minimum 60 seconds
        } else {
            self.config.ttl_seconds
        }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<TripSession>> {
        let key = self.session_key(session_id);
        debug!(session_id = %session_id, key = %key, "Loading session from Redis");

        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = match conn.get::<&str, Option<String>>(&key).await {
            Ok(data) => data,
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to get session from Redis");
                return Err(e.into());
            }
        };

        let Some(data) = serialized else {
            debug!(session_id = %session_id, "No session found in Redis");
            return Ok(None);
        };

        let session: TripSession = match serde_json::from_str(&data) {
            Ok(session) => session,
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to deserialize session");
                return Err(e.into());
            }
        };

        if session.is_expired() {
            warn!(session_id = %session_id, expires_at = ?session.expires_at, "Session has expired, removing");
            self.delete(session_id).await?;
            return Ok(None);
        }

        debug!(session_id = %session_id, stage = %session.stage(), "Session loaded successfully");
        Ok(Some(session))
    }

    async fn save(&self, session: &TripSession) -> Result<()> {
        let key = self.session_key(&session.session_id);
        let serialized = serde_json::to_string(session)?;
        let ttl_seconds = self.ttl_for(session);

        let mut conn = self.connection_manager.clone();
        match conn.set_ex::<_, _, ()>(&key, serialized, ttl_seconds).await {
            Ok(_) => {
                debug!(session_id = %session.session_id, ttl_seconds = ttl_seconds, "Session saved to Redis");
                Ok(())
            }
            Err(e) => {
                error!(session_id = %session.session_id, error = %e, "Failed to save session to Redis");
                Err(e.into())
            }
        }
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let key = self.session_key(session_id);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;
        debug!(session_id = %session_id, deleted = deleted, "Deleted session");

        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        let mut conn = self.connection_manager.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// In-process session storage
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, TripSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<TripSession>> {
        let expired = {
            let sessions = self.sessions.read().await;
            match sessions.get(session_id) {
                Some(session) if !session.is_expired() => return Ok(Some(session.clone())),
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            debug!(session_id = %session_id, "Session has expired, removing");
            self.sessions.write().await.remove(session_id);
        }
        Ok(None)
    }

    async fn save(&self, session: &TripSession) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}
