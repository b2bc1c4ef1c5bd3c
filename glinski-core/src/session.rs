//! A game behind a lock, wired to an outbound token sink
//!
//! The network receive loop and the renderer run concurrently; both go
//! through [`GameSession`]. Every transition happens under the write lock and
//! readers only ever see whole-move states.

use crate::apply;
use crate::board::Position;
use crate::error::{EngineError, Result};
use crate::movegen::{self, MoveConfig};
use crate::pieces::Color;
use crate::protocol::{Inbound, Outbound};
use crate::snapshot;
use crate::state::{BoardState, LastMove};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Where outbound tokens go (usually the peer link)
pub trait TokenSink: Send + Sync {
    fn send(&self, token: Outbound);
}

impl<T: TokenSink + ?Sized> TokenSink for Arc<T> {
    fn send(&self, token: Outbound) {
        (**self).send(token);
    }
}

/// Drops every token; for offline play
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TokenSink for NullSink {
    fn send(&self, token: Outbound) {
        tracing::debug!(%token, "no peer, token dropped");
    }
}

/// Keeps every token in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<Outbound>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens sent so far, oldest first
    pub fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl TokenSink for RecordingSink {
    fn send(&self, token: Outbound) {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(token);
    }
}

/// What an inbound token did to the game
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum InboundEffect {
    RemoteMove { from: Position, to: Position },
    Confirmed,
    RolledBack { undone: LastMove, reason: String },
    Loaded { pieces: usize },
    ColorAssigned { color: Color },
    Started,
    Ended { result: String },
    /// Recognized but nothing to do (e.g. `accepted` with no pending move)
    Ignored,
}

pub struct GameSession {
    state: RwLock<BoardState>,
    config: MoveConfig,
    sink: Box<dyn TokenSink>,
}

impl GameSession {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard starting layout
    pub fn new(config: MoveConfig, sink: Box<dyn TokenSink>) -> Self {
        Self::with_state(BoardState::new(), config, sink)
    }

    pub fn with_state(state: BoardState, config: MoveConfig, sink: Box<dyn TokenSink>) -> Self {
        Self {
            state: RwLock::new(state),
            config,
            sink,
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn config(&self) -> MoveConfig {
        self.config
    }

    /// A consistent copy of the board
    pub fn snapshot(&self) -> BoardState {
        self.read().clone()
    }

    /// Legal destinations for the piece on `pos`
    pub fn destinations(&self, pos: Position) -> Result<Vec<Position>> {
        movegen::legal_destinations(&self.read(), pos, self.config)
    }

    /// Board in snapshot text form
    pub fn dump(&self) -> String {
        snapshot::dump(&self.read())
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// A local player's move: check it, apply it, tell the peer
    pub fn request_move(&self, from: Position, to: Position) -> Result<()> {
        let token = {
            let mut state = self.write();
            apply::check_proposal(&state, from, to)?;

            let destinations = movegen::legal_destinations(&state, from, self.config)?;
            if !destinations.contains(&to) {
                tracing::warn!(%from, %to, "illegal move requested");
                return Err(EngineError::IllegalMove { from, to });
            }

            apply::propose_move(&mut state, from, to)?
        };

        self.sink.send(token);
        Ok(())
    }

    /// Act on one token from the peer
    pub fn handle_inbound(&self, text: &str) -> Result<InboundEffect> {
        let token = Inbound::parse(text).inspect_err(|_| {
            tracing::warn!(token = text, "unrecognized token");
        })?;
        tracing::debug!(?token, "inbound token");

        let mut state = self.write();
        let effect = match token {
            Inbound::Move { from, to } => {
                apply::apply_remote_move(&mut state, from, to)?;
                InboundEffect::RemoteMove { from, to }
            }
            Inbound::Accepted => {
                if apply::commit_confirmed(&mut state) {
                    InboundEffect::Confirmed
                } else {
                    InboundEffect::Ignored
                }
            }
            Inbound::Rejected(reason) => {
                let undone = apply::rollback(&mut state)?;
                tracing::warn!(%reason, "peer refused move");
                InboundEffect::RolledBack { undone, reason }
            }
            Inbound::Load(body) => {
                let pieces = snapshot::load(&mut state, &body)?;
                InboundEffect::Loaded { pieces }
            }
            Inbound::AssignColor(color) => {
                state.set_assigned_color(color);
                tracing::info!(?color, "color assigned");
                InboundEffect::ColorAssigned { color }
            }
            Inbound::GameStarted => {
                state.set_active(true);
                tracing::info!("game started");
                InboundEffect::Started
            }
            Inbound::GameEnded(text) => {
                state.set_active(false);
                tracing::info!(result = %text, "game ended");
                InboundEffect::Ended { result: text }
            }
        };

        Ok(effect)
    }

    /// Back to the starting layout; the assigned color survives
    pub fn reset(&self) {
        let mut state = self.write();
        let assigned = state.assigned_color();

        *state = BoardState::new();
        if let Some(color) = assigned {
            state.set_assigned_color(color);
        }
        tracing::info!("board reset");
    }

    fn read(&self) -> RwLockReadGuard<'_, BoardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BoardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn session() -> (GameSession, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let session = GameSession::new(MoveConfig::default(), Box::new(sink.clone()));
        (session, sink)
    }

    #[test]
    fn test_request_move_sends_token() {
        let (session, sink) = session();
        session.request_move(pos("f5"), pos("f6")).unwrap();

        assert_eq!(sink.sent(), vec![Outbound::Move { from: pos("f5"), to: pos("f6") }]);
        assert!(session.snapshot().is_pending());
    }

    #[test]
    fn test_illegal_request_sends_nothing() {
        let (session, sink) = session();
        assert_eq!(
            session.request_move(pos("f5"), pos("f8")),
            Err(EngineError::IllegalMove { from: pos("f5"), to: pos("f8") })
        );
        assert!(sink.sent().is_empty());
        assert_eq!(session.snapshot(), BoardState::new());
    }

    #[test]
    fn test_unrestricted_allows_any_target() {
        let session = GameSession::new(MoveConfig::UNRESTRICTED, Box::new(NullSink));
        session.request_move(pos("f5"), pos("f8")).unwrap();
        assert!(session.snapshot().pieces(Color::White).contains(&pos("f8")));
    }

    #[test]
    fn test_reply_round_trip() {
        let (session, _) = session();
        session.request_move(pos("f5"), pos("f6")).unwrap();
        assert_eq!(session.handle_inbound("accepted"), Ok(InboundEffect::Confirmed));
        assert_eq!(session.handle_inbound("accepted"), Ok(InboundEffect::Ignored));

        assert_eq!(
            session.handle_inbound("move a1 a2"),
            Err(EngineError::InvalidQuery(pos("a1")))
        );
        assert_eq!(
            session.handle_inbound("move f7 e6"),
            Ok(InboundEffect::RemoteMove { from: pos("f7"), to: pos("e6") })
        );
        assert_eq!(session.snapshot().turn(), Color::White);
    }

    #[test]
    fn test_blocked_rolls_back() {
        let (session, _) = session();
        session.request_move(pos("f5"), pos("f6")).unwrap();

        let effect = session.handle_inbound("blocked").unwrap();
        assert!(matches!(effect, InboundEffect::RolledBack { .. }));
        assert_eq!(session.snapshot(), BoardState::new());
        assert_eq!(session.handle_inbound("error"), Err(EngineError::NoRollbackAvailable));
    }

    #[test]
    fn test_session_tokens() {
        let (session, _) = session();
        assert_eq!(session.handle_inbound("Color: B"), Ok(InboundEffect::ColorAssigned { color: Color::Black }));
        assert_eq!(
            session.handle_inbound("Win: White"),
            Ok(InboundEffect::Ended { result: "Win: White".into() })
        );
        assert!(!session.snapshot().is_active());
        assert_eq!(session.handle_inbound("Game started"), Ok(InboundEffect::Started));
        assert!(session.snapshot().is_active());
        assert!(matches!(session.handle_inbound("bogus"), Err(EngineError::UnknownToken(_))));

        assert_eq!(session.handle_inbound("load\nWK f6\nBK f10"), Ok(InboundEffect::Loaded { pieces: 2 }));
        session.reset();
        let state = session.snapshot();
        assert_eq!(state.occupied().count(), 36);
        assert_eq!(state.assigned_color(), Some(Color::Black));
    }
}
