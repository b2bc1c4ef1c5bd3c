//! Game API routes
//!
//! Local move requests, inbound protocol tokens and resets.

use super::ApiError;
use crate::state::ServerState;
use axum::{extract::State, Json};
use glinski_core::{InboundEffect, Position};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Move request
#[derive(Deserialize)]
pub struct MoveRequest {
    pub from: Position,
    pub to: Position,
}

/// Propose a move for the local player
pub async fn request_move(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<Value>, ApiError> {
    state.session.request_move(req.from, req.to)?;
    let board = state.session.snapshot();

    Ok(Json(json!({
        "success": true,
        "pending": board.is_pending(),
        "turn": board.turn(),
        "active": board.is_active(),
    })))
}

/// Inbound token request
#[derive(Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

/// Feed a protocol token as if the relay had sent it
pub async fn feed_token(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<InboundEffect>, ApiError> {
    let effect = state.session.handle_inbound(&req.token)?;
    Ok(Json(effect))
}

/// Back to the starting layout
pub async fn reset_game(State(state): State<Arc<ServerState>>) -> Json<Value> {
    state.session.reset();
    Json(json!({ "success": true }))
}
