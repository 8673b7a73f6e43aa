// src/api/state.rs
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::backend::HttpBackend;
use crate::config::AppConfig;
use crate::controller::PredictionController;

/// One displayed page and the controller that owns its state.
pub struct PageSession {
    pub controller: PredictionController,
    last_seen: DateTime<Utc>,
}

impl PageSession {
    fn new(controller: PredictionController) -> Self {
        Self {
            controller,
            last_seen: Utc::now(),
        }
    }
}

pub type SharedSession = Arc<Mutex<PageSession>>;

/// Page sessions keyed by cookie id. Idle sessions are evicted whenever a
/// session is looked up or started.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: i64::try_from(ttl_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
        }
    }

    /// Looks up a live session and marks it as seen.
    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.evict_expired().await;
        let session = self.sessions.read().await.get(id).cloned()?;
        session.lock().await.last_seen = Utc::now();
        Some(session)
    }

    pub async fn insert(&self, controller: PredictionController) -> (Uuid, SharedSession) {
        self.evict_expired().await;
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(PageSession::new(controller)));
        self.sessions.write().await.insert(id, session.clone());
        log::debug!("Started page session {}", id);
        (id, session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn evict_expired(&self) {
        let Some(cutoff) = Utc::now().checked_sub_signed(self.ttl) else {
            return;
        };
        let mut sessions = self.sessions.write().await;
        // Sessions held by a handler or waiting on a prediction are in use.
        sessions.retain(|id, session| match session.try_lock() {
            Ok(page) if page.last_seen < cutoff && !page.controller.is_submitting() => {
                log::debug!("Evicting idle page session {}", id);
                false
            }
            _ => true,
        });
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: HttpBackend,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let backend = HttpBackend::new(Client::new(), config.api_base.clone());
        let sessions = SessionStore::new(config.session_ttl_secs);
        Self {
            config: Arc::new(config),
            backend,
            sessions,
        }
    }

    /// A controller for a newly displayed page, before its options are loaded.
    pub fn new_controller(&self) -> PredictionController {
        PredictionController::new(self.config.fallback_options.clone())
    }
}
