//! Read side of the dashboard: latest reading with status, and history.
//!
//! Every request runs its own fetch-and-derive pass against the store; nothing
//! is cached between requests.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, info};

use super::AppState;
use crate::poll::{self, HistoryView, LatestView};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/latest", get(latest))
        .route("/api/history", get(history))
}

/// Query parameters for the history endpoint
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Overrides the configured history cap for this request.
    limit: Option<usize>,
}

async fn latest(State(state): State<AppState>) -> Json<LatestView> {
    // ---
    debug!("GET /api/latest");
    let view = poll::latest_view(&state.store, &state.config).await;
    info!("GET /api/latest - status {}", view.status.label);
    Json(view)
}

async fn history(
    Query(params): Query<HistoryQuery>,
    State(state): State<AppState>,
) -> Json<HistoryView> {
    // ---
    let limit = params.limit.unwrap_or(state.config.history_limit);
    debug!("GET /api/history - limit {}", limit);

    let view = poll::history_view(&state.store, &state.config, limit).await;
    info!("GET /api/history - returning {} points", view.points.len());
    Json(view)
}
