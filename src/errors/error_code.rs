//! Stable error codes for the engine's outbound `error` event.
//!
//! Add new codes here; never pass ad-hoc strings as error codes to a
//! dispatched event.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Identity
    UnknownPlayer,
    NotInGame,
    NotInTable,

    // Authorization
    NotTableCreator,
    GameAlreadyStarted,

    // Legality
    NotYourTurn,
    SeatAlreadyPassed,
    BidTooLow,
    BidNotMultipleOfFive,
    WrongPhase,
    CardNotInHand,
    MustFollowSuit,
    InvalidDiscardCount,
    PointCardDiscardNotAllowed,

    // State
    TableFull,
    PositionOccupied,
    TableAlreadyExists,

    // Precondition
    WrongPassword,
    CannotSpectate,
    AlreadyInActiveGame,

    // Invariant
    HandSizeMismatch,

    // System
    Internal,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownPlayer => "UNKNOWN_PLAYER",
            Self::NotInGame => "NOT_IN_GAME",
            Self::NotInTable => "NOT_IN_TABLE",
            Self::NotTableCreator => "NOT_TABLE_CREATOR",
            Self::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            Self::NotYourTurn => "NOT_YOUR_TURN",
            Self::SeatAlreadyPassed => "SEAT_ALREADY_PASSED",
            Self::BidTooLow => "BID_TOO_LOW",
            Self::BidNotMultipleOfFive => "BID_NOT_MULTIPLE_OF_FIVE",
            Self::WrongPhase => "WRONG_PHASE",
            Self::CardNotInHand => "CARD_NOT_IN_HAND",
            Self::MustFollowSuit => "MUST_FOLLOW_SUIT",
            Self::InvalidDiscardCount => "INVALID_DISCARD_COUNT",
            Self::PointCardDiscardNotAllowed => "POINT_CARD_DISCARD_NOT_ALLOWED",
            Self::TableFull => "TABLE_FULL",
            Self::PositionOccupied => "POSITION_OCCUPIED",
            Self::TableAlreadyExists => "TABLE_ALREADY_EXISTS",
            Self::WrongPassword => "WRONG_PASSWORD",
            Self::CannotSpectate => "CANNOT_SPECTATE",
            Self::AlreadyInActiveGame => "ALREADY_IN_ACTIVE_GAME",
            Self::HandSizeMismatch => "HAND_SIZE_MISMATCH",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_screaming_snake_case() {
        assert_eq!(ErrorCode::NotYourTurn.as_str(), "NOT_YOUR_TURN");
        assert_eq!(ErrorCode::MustFollowSuit.as_str(), "MUST_FOLLOW_SUIT");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", ErrorCode::TableFull), ErrorCode::TableFull.as_str());
    }
}
