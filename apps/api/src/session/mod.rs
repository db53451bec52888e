//! Session Controller state: one explicit context object per interview
//! session, held in memory only.
//!
//! Each session sits behind its own async mutex. Handlers keep it locked for the
//! whole action, so one session never runs two turns at once while separate
//! sessions stay independent.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::coaching::synthesizer::CoachedAnswer;
use crate::errors::AppError;
use crate::models::profile::CandidateProfile;

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub profile: CandidateProfile,
    /// Current question. Replaced every turn.
    pub question: Option<String>,
    /// Last shaped answer. Overwritten every turn.
    pub answer: Option<CoachedAnswer>,
}

impl Session {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            profile: CandidateProfile::default(),
            question: None,
            answer: None,
        }
    }

    /// Clears profile, question and answer. The session itself stays open.
    pub fn reset(&mut self) {
        self.profile = CandidateProfile::default();
        self.question = None;
        self.answer = None;
    }

    /// Replaces the whole profile. A stale answer grounded in the old profile is dropped.
    pub fn load_profile(&mut self, profile: CandidateProfile) {
        self.profile = profile;
        self.answer = None;
    }

    /// Starts a new turn.
    pub fn set_question(&mut self, question: String) {
        self.question = Some(question);
        self.answer = None;
    }

    pub fn question_text(&self) -> &str {
        self.question.as_deref().unwrap_or_default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            started_at: self.started_at,
            profile: ProfileStatus::of(&self.profile),
            question: self.question.clone(),
            answer: self.answer.clone(),
        }
    }
}

/// What the client sees of a profile: readiness and sizes, not the documents.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileStatus {
    pub ready: bool,
    pub missing: Vec<&'static str>,
    pub company: String,
    pub resume_chars: usize,
    pub job_description_chars: usize,
}

impl ProfileStatus {
    fn of(profile: &CandidateProfile) -> Self {
        let missing = profile.missing_fields();
        Self {
            ready: profile.is_complete(),
            missing,
            company: profile.company.clone(),
            resume_chars: profile.resume.chars().count(),
            job_description_chars: profile.job_description.chars().count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub profile: ProfileStatus,
    pub question: Option<String>,
    pub answer: Option<CoachedAnswer>,
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Idle time after which a session is dropped when no TTL is configured.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// How often the background sweep looks for idle sessions.
pub const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

struct StoredSession {
    handle: SessionHandle,
    last_active: Instant,
}

/// In-memory registry of open sessions. Sessions untouched for longer than
/// `idle_ttl` are removed by [`SessionStore::evict_idle`].
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub async fn create(&self) -> SessionHandle {
        let session = Session::new();
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(
            id,
            StoredSession {
                handle: Arc::clone(&handle),
                last_active: Instant::now(),
            },
        );
        info!("Session {id} started");
        handle
    }

    /// Looks up a session and marks it as active.
    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        stored.last_active = Instant::now();
        Ok(Arc::clone(&stored.handle))
    }

    /// Ends a session: it is unregistered, then its data is wiped.
    pub async fn end(&self, id: Uuid) -> Result<(), AppError> {
        let stored = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        stored.handle.lock().await.reset();
        info!("Session {id} ended");
        Ok(())
    }

    /// Removes and wipes every session idle for longer than the TTL. A session
    /// locked by an in-flight action is left for a later sweep.
    pub async fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let evicted: Vec<(Uuid, SessionHandle)> = {
            let mut sessions = self.sessions.write().await;
            let expired: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, stored)| now.duration_since(stored.last_active) > self.idle_ttl)
                .filter(|(_, stored)| stored.handle.try_lock().is_ok())
                .map(|(id, _)| *id)
                .collect();
            expired
                .into_iter()
                .filter_map(|id| sessions.remove(&id).map(|stored| (id, stored.handle)))
                .collect()
        };

        for (id, handle) in &evicted {
            handle.lock().await.reset();
            info!("Session {id} evicted after {}s idle", self.idle_ttl.as_secs());
        }
        evicted.len()
    }

    /// Runs [`SessionStore::evict_idle`] every `every` until the runtime shuts down.
    pub fn spawn_eviction(&self, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle().await;
                if evicted > 0 {
                    debug!("Eviction sweep removed {evicted} idle session(s)");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
