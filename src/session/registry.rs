//! Thread-safe directory of live sessions.
//!
//! The global lock is held only long enough to look up, insert, or remove
//! a session handle; the per-session `Mutex` is what actually serializes
//! ingest/flush/snapshot calls against one session's pipeline and renderer.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::waitk::WaitKConfig;

use super::{Session, SessionId};

/// Row shown by `/api/session/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub chunk_count: usize,
    pub updates_emitted: usize,
    pub current_wait_k: usize,
}

/// Registry of live sessions, keyed by `SessionId`.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a new session and register it, returning its id.
    pub fn create(&self, wait_k_config: WaitKConfig) -> SessionId {
        let session = Session::new(wait_k_config);
        let id = session.id().clone();
        let mut sessions = self.sessions.write();
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
        id
    }

    /// Fetch a handle to a session without holding the global lock beyond
    /// the lookup itself. Callers lock the returned handle for as long as
    /// they need exclusive access to that one session.
    pub fn get(&self, id: &SessionId) -> Option<Arc<Mutex<Session>>> {
        let sessions = self.sessions.read();
        sessions.get(id).cloned()
    }

    /// Drop a session from the registry. Returns `true` if it existed.
    pub fn remove(&self, id: &SessionId) -> bool {
        let mut sessions = self.sessions.write();
        sessions.remove(id).is_some()
    }

    /// Snapshot summary rows for every live session.
    pub fn list(&self) -> Vec<SessionInfo> {
        let sessions = self.sessions.read();
        sessions
            .values()
            .map(|handle| {
                let session = handle.lock();
                SessionInfo {
                    session_id: session.id().clone(),
                    chunk_count: session.chunk_count(),
                    updates_emitted: session.updates_emitted(),
                    current_wait_k: session.current_wait_k(),
                }
            })
            .collect()
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
