//! Write side of the dashboard: device commands relayed to the gateway.
//!
//! Handlers answer `200` with the [`DispatchOutcome`] when the gateway
//! accepted the command and `502` with the same body when it did not.

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::AppState;
use crate::{Command, DispatchOutcome, Rgb};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/commands", post(command))
        .route("/api/commands/color", post(color))
        .route("/api/commands/led-off", post(led_off))
}

/// Command as accepted on the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandRequest {
    SetColor(Rgb),
    SetNightMode(bool),
    /// Must be `true`; there is nothing to send for `false`.
    ForceSend(bool),
}

impl TryFrom<CommandRequest> for Command {
    type Error = &'static str;

    fn try_from(request: CommandRequest) -> Result<Self, Self::Error> {
        match request {
            CommandRequest::SetColor(rgb) => Ok(Command::SetColor(rgb)),
            CommandRequest::SetNightMode(on) => Ok(Command::SetNightMode(on)),
            CommandRequest::ForceSend(true) => Ok(Command::ForceSend),
            CommandRequest::ForceSend(false) => Err("forceSend must be true"),
        }
    }
}

/// Body of `POST /api/commands/color`
#[derive(Debug, Deserialize)]
pub struct ColorRequest {
    hex: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn rejected(status: StatusCode, error: String) -> axum::response::Response {
    // ---
    warn!("Command rejected: {}", error);
    (status, Json(ErrorBody { error })).into_response()
}

async fn relay(state: &AppState, command: Command) -> axum::response::Response {
    // ---
    let outcome: DispatchOutcome = state.dispatcher.dispatch(&command).await;
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    (status, Json(outcome)).into_response()
}

async fn command(
    State(state): State<AppState>,
    Json(request): Json<CommandRequest>,
) -> impl IntoResponse {
    // ---
    match Command::try_from(request) {
        Ok(command) => relay(&state, command).await,
        Err(e) => rejected(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    }
}

async fn color(
    State(state): State<AppState>,
    Json(request): Json<ColorRequest>,
) -> impl IntoResponse {
    // ---
    match Rgb::from_hex(&request.hex) {
        Ok(rgb) => relay(&state, Command::SetColor(rgb)).await,
        Err(e) => rejected(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

async fn led_off(State(state): State<AppState>) -> impl IntoResponse {
    relay(&state, Command::led_off()).await
}
