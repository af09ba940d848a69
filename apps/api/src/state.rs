use std::sync::Arc;

use tokio::sync::Mutex;

use crate::analysis::provider::AnalysisProvider;
use crate::dashboard::reducer::{reduce, DashboardEvent, DashboardState};
use crate::store::StateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable model backend. Default: GeminiAnalysisProvider.
    pub provider: Arc<dyn AnalysisProvider>,
    /// Where the last result and theme survive restarts.
    pub store: Arc<dyn StateStore>,
    /// The single dashboard session. Never held across a provider call.
    pub session: Arc<Mutex<DashboardState>>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn AnalysisProvider>,
        store: Arc<dyn StateStore>,
        initial: DashboardState,
    ) -> Self {
        Self {
            provider,
            store,
            session: Arc::new(Mutex::new(initial)),
        }
    }

    /// Applies one event under the session lock and returns the new state.
    pub async fn dispatch(&self, event: DashboardEvent) -> DashboardState {
        let mut session = self.session.lock().await;
        *session = reduce(std::mem::take(&mut *session), event);
        session.clone()
    }

    /// Applies `event` only if `allowed` holds for the current state, checked under the
    /// same lock. Returns `None` and leaves the session untouched otherwise.
    pub async fn apply_if<F>(&self, event: DashboardEvent, allowed: F) -> Option<DashboardState>
    where
        F: FnOnce(&DashboardState) -> bool,
    {
        let mut session = self.session.lock().await;
        if !allowed(&session) {
            return None;
        }
        *session = reduce(std::mem::take(&mut *session), event);
        Some(session.clone())
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.session.lock().await.clone()
    }
}
