//! Domain-level error type shared by every engine module.
//!
//! Game logic never returns a bare `String` error: every failure is one of
//! the kinds below, matching the taxonomy the engine's error policy is built
//! around (see `crate::error` for the transport-facing wrapper and recovery
//! policy).

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::domain::game::Phase;

/// Which of the six error kinds a `DomainError` belongs to.
///
/// The recovery policy attached to each kind lives in `crate::error`; this
/// module only classifies failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown player for a socket; player not seated at the table/game.
    Identity,
    /// Not the table creator; attempt to mutate a started game's config.
    Authorization,
    /// Not your turn, passed seat bidding, follow-suit violation, wrong
    /// phase, bid below minimum or not a multiple of 5.
    Legality,
    /// Table full, seat occupied, table already exists, game already
    /// started.
    State,
    /// Wrong password, spectating a private or game-less table, already in
    /// another active game.
    Precondition,
    /// Card-count mismatch or any other broken invariant. Fatal to the game.
    Invariant,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "IDENTITY",
            Self::Authorization => "AUTHORIZATION",
            Self::Legality => "LEGALITY",
            Self::State => "STATE",
            Self::Precondition => "PRECONDITION",
            Self::Invariant => "INVARIANT",
        }
    }

    /// Invariant violations are fatal to the one game; everything else
    /// recovers locally.
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Invariant)
    }
}

/// A single domain-level failure, carrying enough context to build both a
/// log line and an outbound `error` event without re-deriving either.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    pub kind: ErrorKind,
    pub message: String,
    pub game_id: Option<String>,
    pub phase: Option<Phase>,
    pub code: Option<&'static str>,
}

impl DomainError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            game_id: None,
            phase: None,
            code: None,
        }
    }

    pub fn with_game(mut self, game_id: impl Into<String>) -> Self {
        self.game_id = Some(game_id.into());
        self
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn identity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Identity, message)
    }
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }
    pub fn legality(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Legality, message)
    }
    pub fn state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::State, message)
    }
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Precondition, message)
    }
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invariant, message)
    }
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

impl Error for DomainError {}
