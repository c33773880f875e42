use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::time::interval;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::{DisplayMode, Session};

/// In-memory session registry. Clones share the same map.
///
/// Each request reads or mutates only its own session; writes are serialized
/// by the map's write lock. Sessions live until deleted or evicted for idleness.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, display_mode: DisplayMode) -> Session {
        let session = Session::new(display_mode);
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        info!("Session {} created", session.id);
        session
    }

    /// Snapshot of the session's current state. Counts as activity.
    pub async fn get(&self, id: Uuid) -> Result<Session, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        session.touch();
        Ok(session.clone())
    }

    /// Applies `f` to the session under the write lock and returns its output.
    pub async fn update<F, T>(&self, id: Uuid, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Session) -> T,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        session.touch();
        Ok(f(session))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.sessions.write().await.remove(&id);
        removed.ok_or_else(|| session_not_found(id))?;
        info!("Session {id} deleted");
        Ok(())
    }

    /// Drops every session whose last activity is older than `cutoff`.
    /// Returns how many were removed.
    pub async fn purge_idle_before(&self, cutoff: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_active >= cutoff);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Periodically evicts sessions idle for longer than `ttl`.
pub fn spawn_idle_sweeper(
    store: SessionStore,
    ttl: Duration,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            tracing::error!("Session idle TTL is out of range; sweeper not started");
            return;
        };
        let mut ticker = interval(every);
        loop {
            ticker.tick().await;
            let evicted = store.purge_idle_before(Utc::now() - ttl).await;
            if evicted > 0 {
                info!("Evicted {evicted} idle session(s)");
            }
        }
    })
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
