//! Glinski Server - HTTP API and peer link
//!
//! This crate provides the surfaces around the engine:
//! - REST API for the board renderer (geometry, occupancy, destinations)
//! - Move requests from the local player
//! - TCP link to the relay server that carries protocol tokens
//! - Static file serving for the visualizer

pub mod peer;
mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use glinski_core::{GameSession, JoinTarget, MoveConfig, NullSink};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Notify;
use tower_http::services::ServeDir;

pub use state::ServerState;

/// Relay connection settings
#[derive(Clone, Debug)]
pub struct PeerConfig {
    /// `host:port` of the relay
    pub addr: String,
    pub game: JoinTarget,
}

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    /// Play through a relay; `None` for local play
    pub peer: Option<PeerConfig>,
    pub moves: MoveConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            static_dir: "glinski/visualizer".to_string(),
            peer: None,
            moves: MoveConfig::default(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Board geometry and occupancy
        .route("/api/board", get(routes::board::get_board))
        .route("/api/snapshot", get(routes::board::get_snapshot))
        // Move queries
        .route("/api/moves/:pos", get(routes::moves::get_destinations))
        // Game API
        .route("/api/move", post(routes::game::request_move))
        .route("/api/token", post(routes::game::feed_token))
        .route("/api/reset", post(routes::game::reset_game))
        // Shared state
        .with_state(state)
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server, and the peer link when one is configured
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let shutdown = Arc::new(Notify::new());

    let (state, peer_task) = match &config.peer {
        Some(peer_config) => {
            let (sink, outbound) = peer::channel_sink();
            let session = Arc::new(GameSession::new(config.moves, Box::new(sink)));
            let task = tokio::spawn(peer::run_peer(
                peer_config.clone(),
                session.clone(),
                outbound,
                shutdown.clone(),
            ));
            let state = ServerState::new(session, Some(peer_config.addr.clone()));
            (state, Some(task))
        }
        None => {
            let session = Arc::new(GameSession::new(config.moves, Box::new(NullSink)));
            (ServerState::new(session, None), None)
        }
    };
    let router = create_router(&config, Arc::new(state));

    tracing::info!("Glinski Server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);
    if config.moves.unrestricted {
        tracing::warn!("Unrestricted moves enabled: rules are not enforced");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    if let Some(task) = peer_task {
        task.await??;
    }

    Ok(())
}

async fn shutdown_signal(shutdown: Arc<Notify>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Shutting down");
            shutdown.notify_one();
        }
        Err(e) => {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
