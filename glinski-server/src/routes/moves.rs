//! Legal destination queries

use super::ApiError;
use crate::state::ServerState;
use axum::{
    extract::{Path, State},
    Json,
};
use glinski_core::Position;
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct DestinationsResponse {
    pub from: Position,
    pub destinations: Vec<Position>,
}

/// Destinations for the piece on `pos` (algebraic, e.g. `f5`)
pub async fn get_destinations(
    State(state): State<Arc<ServerState>>,
    Path(pos): Path<String>,
) -> Result<Json<DestinationsResponse>, ApiError> {
    let from: Position = pos
        .parse()
        .map_err(|e| ApiError::BadPosition(format!("bad position '{}': {}", pos, e)))?;

    let mut destinations = state.session.destinations(from)?;
    destinations.sort();

    Ok(Json(DestinationsResponse { from, destinations }))
}
