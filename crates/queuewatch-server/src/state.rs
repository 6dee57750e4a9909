use std::sync::Arc;
use tokio::sync::RwLock;

use queuewatch_report::{FetchError, ReportFetcher};

use crate::config::ServerConfig;
use crate::session_store::SessionStore;

pub type SharedSessionStore = Arc<RwLock<SessionStore>>;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SharedSessionStore,
    /// Shared HTTP client; each session's loop gets a cheap clone.
    pub fetcher: ReportFetcher,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, FetchError> {
        let fetcher = ReportFetcher::new(config.report.clone())?;
        Ok(Self {
            sessions: Arc::new(RwLock::new(SessionStore::new(config.limits.max_sessions))),
            fetcher,
            config: Arc::new(config),
        })
    }
}
