//! Shared application state.
//!
//! `CoreState` owns every live wizard session and the server settings.
//! It is wrapped in `Arc` at startup and handed to the axum router.
//! The registry sits behind an `RwLock` (lookups far outnumber
//! create/close); each session has its own `Mutex`, so edits on one
//! report never wait on another.
//!
//! A browser that goes away never says so; sessions left untouched for
//! `session_idle_timeout` are evicted by a periodic sweep.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock, TryLockError};
use std::time::Duration;

use uuid::Uuid;

use crate::config::ServerConfig;
use crate::session::ReportSession;

pub type SharedSession = Arc<Mutex<ReportSession>>;

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
    pub config: ServerConfig,
}

impl CoreState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn exports_dir(&self) -> &PathBuf {
        &self.config.exports_dir
    }

    pub fn export_concurrency(&self) -> usize {
        self.config.export_concurrency
    }

    // ── Session registry ────────────────────────────────────

    /// Open a new session over the seeded report. The session id doubles
    /// as the report id.
    pub fn create_session(&self) -> Result<Uuid, CoreError> {
        let id = Uuid::new_v4();
        let session = ReportSession::new(id.to_string());
        self.sessions
            .write()
            .map_err(|_| CoreError::LockPoisoned)?
            .insert(id, Arc::new(Mutex::new(session)));
        tracing::info!(report_id = %id, "Report session created");
        Ok(id)
    }

    /// Handle to a session, for callers that must release the lock
    /// across an await.
    pub fn session(&self, id: Uuid) -> Result<SharedSession, CoreError> {
        self.sessions
            .read()
            .map_err(|_| CoreError::LockPoisoned)?
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::SessionNotFound(id.to_string()))
    }

    /// Run `f` with exclusive access to the session. Counts as activity.
    pub fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ReportSession) -> R,
    ) -> Result<R, CoreError> {
        let session = self.session(id)?;
        let mut guard = session.lock().map_err(|_| CoreError::LockPoisoned)?;
        guard.touch();
        Ok(f(&mut guard))
    }

    pub fn close_session(&self, id: Uuid) -> Result<(), CoreError> {
        let removed = self
            .sessions
            .write()
            .map_err(|_| CoreError::LockPoisoned)?
            .remove(&id);
        match removed {
            Some(_) => {
                tracing::info!(report_id = %id, "Report session closed");
                Ok(())
            }
            None => Err(CoreError::SessionNotFound(id.to_string())),
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Drop every session idle for at least `max_idle`. Sessions that are
    /// locked or exporting are kept. Returns how many were dropped.
    pub fn evict_idle(&self, max_idle: Duration) -> Result<usize, CoreError> {
        let mut sessions = self.sessions.write().map_err(|_| CoreError::LockPoisoned)?;
        let before = sessions.len();
        sessions.retain(|id, session| {
            let idle = match session.try_lock() {
                Ok(guard) => guard.is_idle(max_idle),
                Err(TryLockError::WouldBlock) => false,
                Err(TryLockError::Poisoned(_)) => true,
            };
            if idle {
                tracing::info!(report_id = %id, "Idle report session evicted");
            }
            !idle
        });
        Ok(before - sessions.len())
    }

    /// Evict idle sessions every `period`, for as long as the task runs.
    pub fn spawn_idle_sweep(self: &Arc<Self>, period: Duration) -> tokio::task::JoinHandle<()> {
        let core = Arc::clone(self);
        let max_idle = core.config.session_idle_timeout;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = core.evict_idle(max_idle) {
                    tracing::error!(error = %e, "Session sweep failed");
                }
            }
        })
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("No report session with id {0}")]
    SessionNotFound(String),
    #[error("Internal lock error")]
    LockPoisoned,
}
