use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::selection::ScheduleSelection;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for in-progress wizard runs. Every method is atomic with respect
/// to the other methods for the same session.
pub trait SessionStore: Send + Sync {
    fn insert(&self, id: SessionId, selection: ScheduleSelection) -> Result<(), StoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<ScheduleSelection>, StoreError>;
    /// Runs `change` on the stored selection while holding the store lock.
    /// Returns `None` when the session does not exist.
    fn update<R, F>(&self, id: &SessionId, change: F) -> Result<Option<R>, StoreError>
    where
        F: FnOnce(&mut ScheduleSelection) -> R;
    /// Removes and returns the session, so only one caller can claim it.
    fn take(&self, id: &SessionId) -> Result<Option<ScheduleSelection>, StoreError>;
    fn discard(&self, id: &SessionId) -> Result<bool, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug)]
struct StoredSession {
    selection: ScheduleSelection,
    last_touched: Instant,
}

impl StoredSession {
    fn new(selection: ScheduleSelection) -> Self {
        Self {
            selection,
            last_touched: Instant::now(),
        }
    }

    fn is_idle(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_touched) >= idle_timeout
    }
}

/// Process-local session store; sessions vanish on restart. Sessions idle
/// for longer than the timeout are treated as gone and swept on insert.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, StoredSession>>>,
    idle_timeout: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

impl InMemorySessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, StoredSession>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Unavailable("session mutex poisoned".to_string()))
    }

    /// Looks up a live session, dropping it first if it has gone idle.
    fn live<'a>(
        &self,
        guard: &'a mut HashMap<SessionId, StoredSession>,
        id: &SessionId,
    ) -> Option<&'a mut StoredSession> {
        let now = Instant::now();
        if guard
            .get(id)
            .is_some_and(|stored| stored.is_idle(now, self.idle_timeout))
        {
            guard.remove(id);
            debug!(session_id = %id, "idle schedule session expired");
            return None;
        }

        let stored = guard.get_mut(id)?;
        stored.last_touched = now;
        Some(stored)
    }
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, id: SessionId, selection: ScheduleSelection) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let now = Instant::now();
        let before = guard.len();
        guard.retain(|_, stored| !stored.is_idle(now, self.idle_timeout));
        if guard.len() < before {
            debug!(expired = before - guard.len(), "swept idle schedule sessions");
        }

        if guard.contains_key(&id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(id, StoredSession::new(selection));
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<ScheduleSelection>, StoreError> {
        let mut guard = self.lock()?;
        Ok(self.live(&mut guard, id).map(|stored| stored.selection.clone()))
    }

    fn update<R, F>(&self, id: &SessionId, change: F) -> Result<Option<R>, StoreError>
    where
        F: FnOnce(&mut ScheduleSelection) -> R,
    {
        let mut guard = self.lock()?;
        Ok(self
            .live(&mut guard, id)
            .map(|stored| change(&mut stored.selection)))
    }

    fn take(&self, id: &SessionId) -> Result<Option<ScheduleSelection>, StoreError> {
        let mut guard = self.lock()?;
        if self.live(&mut guard, id).is_none() {
            return Ok(None);
        }
        Ok(guard.remove(id).map(|stored| stored.selection))
    }

    fn discard(&self, id: &SessionId) -> Result<bool, StoreError> {
        let mut guard = self.lock()?;
        if self.live(&mut guard, id).is_none() {
            return Ok(false);
        }
        Ok(guard.remove(id).is_some())
    }
}
