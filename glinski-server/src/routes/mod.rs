//! HTTP route handlers

pub mod board;
pub mod game;
pub mod moves;
pub mod status;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use glinski_core::EngineError;
use serde_json::json;

/// Handler failure, rendered as `{ "error": "..." }`
pub enum ApiError {
    Engine(EngineError),
    BadPosition(String),
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError::Engine(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Engine(
                EngineError::Busy
                | EngineError::GameOver
                | EngineError::NotYourTurn
                | EngineError::WrongColor
                | EngineError::NoRollbackAvailable,
            ) => StatusCode::CONFLICT,
            ApiError::Engine(_) | ApiError::BadPosition(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Engine(e) => e.to_string(),
            ApiError::BadPosition(msg) => msg.clone(),
        };
        tracing::warn!(%status, "{}", message);
        (status, Json(json!({ "error": message }))).into_response()
    }
}
