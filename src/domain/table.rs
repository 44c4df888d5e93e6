//! Table: the pre-game and between-games lobby unit. Holds configuration,
//! the seat roster, spectators, and at most one live game.

use crate::domain::deck::DeckVariant;
use crate::domain::player::Player;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub id: String,
    pub name: String,
    pub max_seats: u8,
    pub seats: Vec<Option<Player>>,
    pub live_game_id: Option<String>,
    pub is_private: bool,
    pub password: Option<String>,
    pub creator_name: String,
    pub timeout_budget_ms: u64,
    pub deck_variant: DeckVariant,
    pub score_target: i32,
    pub kitty_enabled: bool,
    pub allow_point_card_discards: bool,
    pub enforce_opposing_team_bid_rule: bool,
    pub spectators: Vec<String>,
}

impl Table {
    pub fn new(id: impl Into<String>, name: impl Into<String>, creator_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            max_seats: 4,
            seats: vec![None, None, None, None],
            live_game_id: None,
            is_private: false,
            password: None,
            creator_name: creator_name.into(),
            timeout_budget_ms: 30_000,
            deck_variant: DeckVariant::Thirty6,
            score_target: 200,
            kitty_enabled: false,
            allow_point_card_discards: true,
            enforce_opposing_team_bid_rule: false,
            spectators: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.seats.iter().all(Option::is_some)
    }

    pub fn lowest_empty_seat(&self) -> Option<u8> {
        self.seats.iter().position(Option::is_none).map(|i| i as u8)
    }

    pub fn occupied_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn has_live_game(&self) -> bool {
        self.live_game_id.is_some()
    }

    /// Drops every seated human and spectator; callers re-seed bot seats.
    pub fn clear_to_bots_only(&mut self) {
        self.seats = vec![None, None, None, None];
        self.spectators.clear();
        self.live_game_id = None;
    }
}
