//! Session store.
//!
//! Holds at most one session per actor.  The in-memory implementation can
//! snapshot itself to `sessions.json` under the configured state path so a
//! restart resumes every actor at the step they were on.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use rc_domain::error::Result;
use rc_domain::event::ActorId;
use rc_domain::snapshot;

use crate::session::ActorSession;

/// Storage seam for actor sessions.
pub trait SessionStore: Send + Sync {
    fn get(&self, actor_id: ActorId) -> Option<ActorSession>;

    /// Insert or replace the actor's session.
    fn put(&self, session: ActorSession);

    fn delete(&self, actor_id: ActorId) -> Option<ActorSession>;

    /// Drop every session, returning how many were removed.
    fn clear(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Persist current state, if the store is backed by a file.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// In-memory store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<ActorId, ActorSession>>,
    snapshot_path: Option<PathBuf>,
}

impl MemorySessionStore {
    /// A store that lives only as long as the process.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load or create the store at `state_path/sessions.json`.
    pub fn open(state_path: &Path) -> Result<Self> {
        let snapshot_path = state_path.join("sessions.json");
        let entries: Vec<ActorSession> = snapshot::load(&snapshot_path)?;
        let sessions: HashMap<_, _> = entries.into_iter().map(|s| (s.actor_id, s)).collect();

        tracing::info!(
            sessions = sessions.len(),
            path = %snapshot_path.display(),
            "session store loaded"
        );

        Ok(Self {
            sessions: RwLock::new(sessions),
            snapshot_path: Some(snapshot_path),
        })
    }

    /// List all sessions.
    pub fn list(&self) -> Vec<ActorSession> {
        self.sessions.read().values().cloned().collect()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, actor_id: ActorId) -> Option<ActorSession> {
        self.sessions.read().get(&actor_id).cloned()
    }

    fn put(&self, session: ActorSession) {
        self.sessions.write().insert(session.actor_id, session);
    }

    fn delete(&self, actor_id: ActorId) -> Option<ActorSession> {
        self.sessions.write().remove(&actor_id)
    }

    fn clear(&self) -> usize {
        let mut sessions = self.sessions.write();
        let n = sessions.len();
        sessions.clear();
        n
    }

    fn len(&self) -> usize {
        self.sessions.read().len()
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let mut entries = self.list();
        entries.sort_by_key(|s| s.actor_id);
        snapshot::store(path, &entries)
    }
}
