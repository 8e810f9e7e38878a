use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::info;
use uuid::Uuid;

use crate::lifecycle::registry::{Registry, RegistrySettings};

/// A session's registry. The mutex is held for a whole interaction, so interactions within
/// one session never interleave.
pub type SharedRegistry = Arc<Mutex<Registry>>;

struct Session {
    registry: SharedRegistry,
    last_seen: Instant,
}

/// Owns one registry per reviewer session.
///
/// A registry lives until its session ends or sits idle for longer than `idle_ttl`. Idle
/// sessions are swept whenever a session is created or looked up.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    settings: RegistrySettings,
    idle_ttl: Duration,
}

impl SessionStore {
    pub fn new(settings: RegistrySettings, idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            settings,
            idle_ttl,
        }
    }

    fn sweep(&self, sessions: &mut HashMap<Uuid, Session>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.last_seen) <= self.idle_ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            info!(
                "Expired {expired} idle session(s) after {}s, {} active",
                self.idle_ttl.as_secs(),
                sessions.len()
            );
        }
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions, now);
        sessions.insert(
            id,
            Session {
                registry: Arc::new(Mutex::new(Registry::new(self.settings))),
                last_seen: now,
            },
        );
        info!("Session {id} started ({} active)", sessions.len());
        id
    }

    /// Looks up a live session and marks it as seen.
    pub async fn get(&self, id: Uuid) -> Option<SharedRegistry> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        self.sweep(&mut sessions, now);
        let session = sessions.get_mut(&id)?;
        session.last_seen = now;
        Some(session.registry.clone())
    }

    /// Drops the session and its records. Returns false for unknown sessions.
    pub async fn end(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!("Session {id} ended");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Payload;

    const TTL: Duration = Duration::from_secs(60);

    fn store() -> SessionStore {
        SessionStore::new(RegistrySettings::default(), TTL)
    }

    #[tokio::test]
    async fn test_sessions_have_independent_registries() {
        let store = store();
        let a = store.create().await;
        let b = store.create().await;

        let reg_a = store.get(a).await.unwrap();
        reg_a
            .lock()
            .await
            .register("cv.pdf", Payload::Empty, None)
            .unwrap();

        let reg_b = store.get(b).await.unwrap();
        assert!(reg_b.lock().await.list().is_empty());
        assert!(reg_b.lock().await.admit("cv.pdf").is_ok());
        assert_eq!(reg_a.lock().await.list().len(), 1);
    }

    #[tokio::test]
    async fn test_end_session_drops_registry() {
        let store = store();
        let id = store.create().await;
        assert!(store.end(id).await);
        assert!(store.get(id).await.is_none());
        assert!(!store.end(id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_expire() {
        let store = store();
        let idle = store.create().await;
        let active = store.create().await;

        tokio::time::advance(Duration::from_secs(45)).await;
        assert!(store.get(active).await.is_some());

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(store.get(idle).await.is_none());
        assert!(store.get(active).await.is_some());
        assert!(!store.end(idle).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_creating_a_session_sweeps_abandoned_ones() {
        let store = store();
        let abandoned = store.create().await;

        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        store.create().await;
        assert!(store.sessions.read().await.get(&abandoned).is_none());
        assert_eq!(store.sessions.read().await.len(), 1);
    }
}
