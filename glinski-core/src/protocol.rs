//! Text tokens exchanged with the relay server
//!
//! Outbound: `move <from> <to>`, `join <game>`, `leave`.
//! Inbound tokens are classified by [`Inbound::parse`].

use crate::board::Position;
use crate::error::{EngineError, Result};
use crate::pieces::Color;
use std::fmt;

/// Game to join on connect
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JoinTarget {
    /// First game with a free seat
    #[default]
    Auto,
    Game(u32),
}

impl fmt::Display for JoinTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinTarget::Auto => write!(f, "auto"),
            JoinTarget::Game(id) => write!(f, "{}", id),
        }
    }
}

impl std::str::FromStr for JoinTarget {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "auto" {
            Ok(JoinTarget::Auto)
        } else {
            s.parse().map(JoinTarget::Game)
        }
    }
}

/// Tokens this engine sends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outbound {
    Move { from: Position, to: Position },
    Join(JoinTarget),
    Leave,
}

impl fmt::Display for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outbound::Move { from, to } => write!(f, "move {} {}", from, to),
            Outbound::Join(target) => write!(f, "join {}", target),
            Outbound::Leave => write!(f, "leave"),
        }
    }
}

/// Tokens this engine understands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inbound {
    /// The opponent moved
    Move { from: Position, to: Position },
    /// Our pending move was accepted
    Accepted,
    /// Our pending move was refused (`blocked` or `error...`)
    Rejected(String),
    GameStarted,
    AssignColor(Color),
    /// Full board snapshot (lines after the `load` header)
    Load(String),
    /// Game decided by the relay (`Win...`)
    GameEnded(String),
}

impl Inbound {
    /// Classify a token. `load` is checked first since its body may contain
    /// anything; `Win` last since it matches anywhere in the text. A color
    /// assignment read together with `Game started` counts as the start only.
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim_end_matches(['\r', '\n']);

        if token.starts_with("load") {
            let body = token.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
            return Ok(Inbound::Load(body.to_string()));
        }

        if token.starts_with("move") {
            return parse_move(token);
        }

        if token == "accepted" {
            return Ok(Inbound::Accepted);
        }

        if token == "blocked" || token.starts_with("error") {
            return Ok(Inbound::Rejected(token.to_string()));
        }

        // Before `Color`: the relay may send the color and the start back to
        // back, and a single read then carries both
        if token.ends_with("Game started") {
            return Ok(Inbound::GameStarted);
        }

        if token.starts_with("Color") {
            return match token.chars().last().and_then(Color::from_letter) {
                Some(color) => Ok(Inbound::AssignColor(color)),
                None => Err(EngineError::UnknownToken(token.to_string())),
            };
        }

        if token.contains("Win") {
            return Ok(Inbound::GameEnded(token.to_string()));
        }

        Err(EngineError::UnknownToken(token.to_string()))
    }
}

fn parse_move(token: &str) -> Result<Inbound> {
    let unknown = || EngineError::UnknownToken(token.to_string());
    let mut parts = token.split_whitespace();

    if parts.next() != Some("move") {
        return Err(unknown());
    }
    let from: Position = parts.next().ok_or_else(unknown)?.parse().map_err(|_| unknown())?;
    let to: Position = parts.next().ok_or_else(unknown)?.parse().map_err(|_| unknown())?;
    if parts.next().is_some() {
        return Err(unknown());
    }

    Ok(Inbound::Move { from, to })
}
