//! Server state management
//!
//! One game per server; handlers and the peer link share its session.

use glinski_core::{GameSession, MoveConfig, NullSink};
use std::sync::Arc;

/// Server-wide shared state
pub struct ServerState {
    pub session: Arc<GameSession>,
    /// Relay address, when playing through one
    pub peer: Option<String>,
}

impl ServerState {
    pub fn new(session: Arc<GameSession>, peer: Option<String>) -> Self {
        Self { session, peer }
    }

    /// Local play: no relay, outbound tokens dropped
    pub fn offline(moves: MoveConfig) -> Self {
        Self::new(Arc::new(GameSession::new(moves, Box::new(NullSink))), None)
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::offline(MoveConfig::default())
    }
}
