//! Engine error types

use crate::board::Position;

/// Recoverable engine errors, surfaced to the UI/network layer
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("nothing to query at {0}")]
    InvalidQuery(Position),

    #[error("a move is already awaiting confirmation")]
    Busy,

    #[error("it is not this player's turn")]
    NotYourTurn,

    #[error("piece does not belong to this player")]
    WrongColor,

    #[error("game is over")]
    GameOver,

    #[error("no move to roll back")]
    NoRollbackAvailable,

    #[error("illegal move {from} -> {to}")]
    IllegalMove { from: Position, to: Position },

    #[error("malformed snapshot line '{line}': {reason}")]
    MalformedLine { line: String, reason: String },

    #[error("unrecognized token '{0}'")]
    UnknownToken(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
