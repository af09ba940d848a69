// Dashboard session: explicit state, pure reducer, read-only views.

pub mod handlers;
pub mod reducer;
pub mod view;

use tracing::info;

use crate::store::{load_cached, StateStore};
use reducer::{reduce, DashboardEvent, DashboardState};

/// Rebuilds the session a previous run left behind. Never fails: anything unreadable
/// has already been logged by the store and is skipped.
pub async fn restore_session(store: &dyn StateStore) -> DashboardState {
    let (result, theme) = load_cached(store).await;
    if result.is_some() {
        info!("Restored cached analysis result");
    }
    reduce(
        DashboardState::default(),
        DashboardEvent::Restored { result, theme },
    )
}
