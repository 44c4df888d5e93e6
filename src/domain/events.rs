//! Engine-level events. Every externally observable transition produces
//! exactly one of these, which both feeds the transcript store and drives
//! the outbound event dispatcher.

use crate::domain::cards::{Card, Suit};
use crate::domain::game::Bid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    GameStart,
    RoundStart { round_no: u32, dealer: u8 },
    BidMade { bid: Bid },
    BidPass { seat: u8 },
    BiddingComplete { to_kitty: bool },
    KittyPick { seat: u8 },
    KittyDiscard { seat: u8, discards: Vec<Card>, trump: Suit },
    CardPlayed { seat: u8, card: Card },
    TrickComplete { winner: u8, points: u32 },
    RoundComplete { team_score_delta: [i32; 2] },
    GameComplete { winning_team: u8 },
    PlayerExit { seat: u8 },
}

impl GameEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::GameStart => "game_start",
            GameEvent::RoundStart { .. } => "round_start",
            GameEvent::BidMade { .. } => "bid_made",
            GameEvent::BidPass { .. } => "bid_pass",
            GameEvent::BiddingComplete { .. } => "bidding_complete",
            GameEvent::KittyPick { .. } => "kitty_pick",
            GameEvent::KittyDiscard { .. } => "kitty_discard",
            GameEvent::CardPlayed { .. } => "card_played",
            GameEvent::TrickComplete { .. } => "trick_complete",
            GameEvent::RoundComplete { .. } => "round_complete",
            GameEvent::GameComplete { .. } => "game_complete",
            GameEvent::PlayerExit { .. } => "player_exit",
        }
    }
}
