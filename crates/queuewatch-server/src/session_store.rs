use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use uuid::Uuid;

use queuewatch_core::alerts::AlertThresholds;
use queuewatch_report::{ReportFetcher, ViewerHandle, spawn_viewer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Session limit reached ({0}), try again later")]
    AtCapacity(usize),
}

/// One registered viewer and the task that keeps its snapshot fresh.
struct SessionEntry {
    viewer: ViewerHandle,
    task: JoinHandle<()>,
    last_activity: Instant,
}

impl Drop for SessionEntry {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Manages all viewer sessions and their refresh loops.
pub struct SessionStore {
    sessions: HashMap<String, SessionEntry>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            max_sessions,
        }
    }

    /// Register a new viewer and start its refresh loop. Returns the session
    /// id to hand back as a cookie.
    pub fn create(
        &mut self,
        fetcher: ReportFetcher,
        thresholds: AlertThresholds,
    ) -> Result<(String, ViewerHandle), SessionError> {
        if self.sessions.len() >= self.max_sessions {
            tracing::warn!(max = self.max_sessions, "Rejecting new session, limit reached");
            return Err(SessionError::AtCapacity(self.max_sessions));
        }

        let id = Uuid::new_v4().to_string();
        let interval = fetcher.poll_interval();
        let (viewer, task) = spawn_viewer(fetcher, interval, thresholds);
        self.sessions.insert(
            id.clone(),
            SessionEntry {
                viewer: viewer.clone(),
                task,
                last_activity: Instant::now(),
            },
        );
        tracing::info!(session = %id, active = self.sessions.len(), "Created viewer session");
        Ok((id, viewer))
    }

    /// Look up a session and mark it active.
    pub fn get(&mut self, id: &str) -> Option<ViewerHandle> {
        let entry = self.sessions.get_mut(id)?;
        entry.last_activity = Instant::now();
        Some(entry.viewer.clone())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Remove sessions idle for longer than `max_idle`, and any whose refresh
    /// loop has already stopped. Dropping an entry aborts its task.
    pub fn cleanup_idle_sessions(&mut self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, entry| {
            now.duration_since(entry.last_activity) < max_idle && !entry.task.is_finished()
        });
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }
}
