use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::TrainingSession;

/// Idle lifetime used when none is configured.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(3600);

struct SessionEntry {
    session: Arc<Mutex<TrainingSession>>,
    last_touched: Instant,
}

/// In-memory registry of live sessions.
///
/// The map lock is only held to insert, look up or remove. Each session has its
/// own mutex, held for a whole operation, so one trainee's requests run one at
/// a time while different trainees never wait on each other.
///
/// A session not looked up for `idle_ttl` is gone: `get` treats it as unknown,
/// and `create` or the sweeper task drops it from the map.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| now.duration_since(entry.last_touched) < self.idle_ttl);
        sessions.insert(
            id,
            SessionEntry {
                session: Arc::new(Mutex::new(TrainingSession::new())),
                last_touched: now,
            },
        );
        id
    }

    /// Looks a session up and marks it as used.
    pub async fn get(&self, id: Uuid) -> Result<Arc<Mutex<TrainingSession>>, AppError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let expired = match sessions.get_mut(&id) {
            Some(entry) if now.duration_since(entry.last_touched) < self.idle_ttl => {
                entry.last_touched = now;
                return Ok(Arc::clone(&entry.session));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            sessions.remove(&id);
            info!("Session {id} expired after idle timeout");
        }
        Err(AppError::NotFound(format!("Session {id} not found")))
    }

    /// Ends a session. Its history goes with it.
    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Drops every idle session. Returns how many were dropped.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_touched) < self.idle_ttl);
        before - sessions.len()
    }

    /// Runs `evict_idle` every `period` for the life of the process.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(period);
            loop {
                tick.tick().await;
                let evicted = store.evict_idle().await;
                if evicted > 0 {
                    info!(evicted, "Evicted idle sessions");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
