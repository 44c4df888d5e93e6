//! Authoritative game state: phases, bids, tricks, rounds.

use std::collections::BTreeSet;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, Suit};
use crate::domain::deck::DeckVariant;
use crate::domain::player::Player;
use crate::domain::rules::SEATS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Waiting,
    Bidding,
    Kitty,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub seat: u8,
    pub points: u16,
    pub suit: Option<Suit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trick {
    pub plays: Vec<(Card, u8)>,
    pub winner: Option<u8>,
    pub points: Option<u32>,
}

impl Trick {
    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|(card, _)| card.suit)
    }

    pub fn is_complete(&self) -> bool {
        self.plays.len() == SEATS
    }
}

/// A finalized round, kept for the in-memory round history and the
/// transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub round_no: u32,
    pub tricks: Vec<Trick>,
    pub contractor_team: u8,
    pub trump: Option<Suit>,
    pub bid: Option<Bid>,
    pub team_score_delta: [i32; 2],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: String,
    pub table_id: String,
    pub seats: [Player; 4],
    pub current_player: u8,
    pub phase: Phase,
    pub current_bid: Option<Bid>,
    pub trump: Option<Suit>,
    pub current_trick: Trick,
    pub last_trick: Option<Trick>,
    pub round_tricks: Vec<Trick>,
    pub round_no: u32,
    pub team_scores: [i32; 2],
    /// Trick points taken so far this round, indexed by team like
    /// `team_scores` (not contractor/opponent).
    pub round_scores: [u32; 2],
    pub dealer: u8,
    pub spectator_ids: Vec<String>,
    pub contractor_team: Option<u8>,
    pub bidding_passes: u8,
    pub passed: BTreeSet<u8>,
    pub turn_started_at: Option<Instant>,
    pub timeout_budget_ms: u64,
    pub deck_variant: DeckVariant,
    pub score_target: i32,
    pub kitty_enabled: bool,
    pub kitty: Vec<Card>,
    pub kitty_discards: Vec<Card>,
    pub kitty_phase_completed: bool,
    pub remaining_deck: Vec<Card>,
    pub completed_rounds: Vec<Round>,
    pub opposing_team_bid: u16,
    pub allow_point_card_discards: bool,
    pub enforce_opposing_team_bid_rule: bool,
}

impl Game {
    pub fn hand_sizes_equal(&self) -> bool {
        let first = self.seats[0].hand.len();
        self.seats.iter().all(|p| p.hand.len() == first)
    }

    pub fn total_card_count(&self) -> usize {
        let hands: usize = self.seats.iter().map(|p| p.hand.len()).sum();
        hands
            + self.current_trick.plays.len()
            + self.kitty.len()
            + self.kitty_discards.len()
            + self.remaining_deck.len()
    }

    pub fn seat(&self, seat: u8) -> &Player {
        &self.seats[seat as usize]
    }

    pub fn seat_mut(&mut self, seat: u8) -> &mut Player {
        &mut self.seats[seat as usize]
    }

    pub fn reset_turn_clock(&mut self) {
        self.turn_started_at = Some(Instant::now());
    }
}
