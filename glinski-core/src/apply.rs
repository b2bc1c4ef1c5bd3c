//! Move application: propose, confirm, roll back, mirror remote moves
//!
//! A local move is applied to the board immediately and stays *pending*
//! until the peer answers. Acceptance just clears the flag; rejection undoes
//! the move from the recorded [`LastMove`].

use crate::board::Position;
use crate::error::{EngineError, Result};
use crate::pieces::Piece;
use crate::protocol::Outbound;
use crate::state::{BoardState, LastMove};

/// Apply a local move and return the token to send to the peer
pub fn propose_move(state: &mut BoardState, from: Position, to: Position) -> Result<Outbound> {
    check_proposal(state, from, to)?;

    commit(state, from, to)?;
    state.pending_move = true;

    tracing::info!(%from, %to, "proposed move");
    Ok(Outbound::Move { from, to })
}

/// Reject a local move before touching the board
pub(crate) fn check_proposal(state: &BoardState, from: Position, to: Position) -> Result<Piece> {
    if state.pending_move {
        return Err(EngineError::Busy);
    }
    if !state.active {
        return Err(EngineError::GameOver);
    }

    let piece = state.piece_at(from).ok_or(EngineError::InvalidQuery(from))?;
    if !to.is_valid() || to == from {
        return Err(EngineError::InvalidQuery(to));
    }

    // Before the handshake either side may be moved locally
    if state.assigned_color.is_some_and(|color| color != piece.color) {
        return Err(EngineError::WrongColor);
    }
    if piece.color != state.turn {
        return Err(EngineError::NotYourTurn);
    }

    Ok(piece)
}

/// The peer accepted the pending move. Returns false if nothing was pending.
pub fn commit_confirmed(state: &mut BoardState) -> bool {
    let was_pending = state.pending_move;
    state.pending_move = false;
    if was_pending {
        tracing::info!("move confirmed");
    }
    was_pending
}

/// The peer rejected the pending move: put everything back
pub fn rollback(state: &mut BoardState) -> Result<LastMove> {
    if !state.pending_move {
        return Err(EngineError::NoRollbackAvailable);
    }
    let last = state.last_move.take().ok_or(EngineError::NoRollbackAvailable)?;

    let moved = state
        .take(last.to)
        .ok_or(EngineError::InvalidQuery(last.to))?;
    state.put(last.from, moved);

    if let Some(captured) = last.captured {
        state.put(last.to, captured);
        if captured.is_king() {
            state.active = true;
        }
    }

    state.turn = state.assigned_color.unwrap_or(moved.color);
    state.pending_move = false;

    tracing::info!(from = %last.from, to = %last.to, "rolled back move");
    Ok(last)
}

/// Mirror a move the peer made; the peer is trusted on legality.
///
/// Fails with `Busy` while our own move awaits its answer and with
/// `GameOver` once a king has been captured.
pub fn apply_remote_move(state: &mut BoardState, from: Position, to: Position) -> Result<()> {
    if !state.active {
        return Err(EngineError::GameOver);
    }
    // The relay only forwards the opponent's move after answering ours
    if state.pending_move {
        return Err(EngineError::Busy);
    }
    if state.piece_at(from).is_none() {
        return Err(EngineError::InvalidQuery(from));
    }
    if !to.is_valid() || to == from {
        return Err(EngineError::InvalidQuery(to));
    }

    commit(state, from, to)?;
    tracing::info!(%from, %to, "applied remote move");
    Ok(())
}

/// Shared bookkeeping: record the undo, move the piece, flip the turn
fn commit(state: &mut BoardState, from: Position, to: Position) -> Result<()> {
    let moving = state.take(from).ok_or(EngineError::InvalidQuery(from))?;
    let captured = state.take(to);

    state.last_move = Some(LastMove { from, to, captured });
    state.put(to, moving);

    if captured.is_some_and(|p| p.is_king()) {
        state.active = false;
        tracing::info!(winner = ?moving.color, "king captured");
    }

    state.turn = state.turn.opponent();
    Ok(())
}
