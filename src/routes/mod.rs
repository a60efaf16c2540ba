use axum::Router;

use crate::{CommandDispatcher, Config, StoreClient};

mod commands;
mod dashboard;
mod health;

// ---

/// Shared handles every route works with.
///
/// Built once in `main.rs`; axum clones it per request, which only bumps the
/// reference counts inside the HTTP clients.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: StoreClient,
    pub dispatcher: CommandDispatcher,
    pub config: Config,
}

pub fn router(state: AppState) -> Router {
    // ---
    Router::new()
        .merge(dashboard::router())
        .merge(commands::router())
        .merge(health::router::<AppState>())
        .with_state(state)
}
