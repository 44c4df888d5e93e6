//! Wire-safe projections of `Game`.
//!
//! Two projections exist: `snapshot_for_viewer` hides hands the viewer
//! should not see (outbound events), and `snapshot_full` keeps every hand
//! (transcript entries, which are a replay log). Both convert the
//! semantically-set `passed` field to an ordered sequence by seat position
//! so clients observe stable diffs.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, Suit};
use crate::domain::deck::DeckVariant;
use crate::domain::game::{Bid, Game, Phase, Trick};
use crate::domain::player::BotSkill;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSnapshot {
    pub id: String,
    pub display_name: String,
    pub is_bot: bool,
    pub bot_skill: Option<BotSkill>,
    pub seat: u8,
    pub ready: bool,
    pub hand_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<Card>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub id: String,
    pub table_id: String,
    pub phase: Phase,
    pub current_player: u8,
    pub current_bid: Option<Bid>,
    pub trump: Option<Suit>,
    pub current_trick: Trick,
    pub last_trick: Option<Trick>,
    pub round_no: u32,
    pub team_scores: [i32; 2],
    /// Team-indexed like `team_scores`, not contractor/opponent-indexed.
    pub round_scores: [u32; 2],
    pub dealer: u8,
    pub contractor_team: Option<u8>,
    pub players_who_have_passed: Vec<u8>,
    pub deck_variant: DeckVariant,
    pub score_target: i32,
    pub kitty_enabled: bool,
    pub kitty_size: usize,
    pub kitty_discards: Vec<Card>,
    pub kitty_phase_completed: bool,
    pub opposing_team_bid: u16,
    pub seats: Vec<SeatSnapshot>,
}

fn seat_snapshots(game: &Game, reveal_all: bool, viewer_seat: Option<u8>) -> Vec<SeatSnapshot> {
    game.seats
        .iter()
        .map(|p| {
            let reveal = reveal_all || viewer_seat == Some(p.seat);
            SeatSnapshot {
                id: p.id.clone(),
                display_name: p.display_name.clone(),
                is_bot: p.is_bot,
                bot_skill: p.bot_skill,
                seat: p.seat,
                ready: p.ready,
                hand_size: p.hand.len(),
                hand: reveal.then(|| p.hand.clone()),
            }
        })
        .collect()
}

fn build(game: &Game, reveal_all: bool, viewer_seat: Option<u8>) -> GameSnapshot {
    GameSnapshot {
        id: game.id.clone(),
        table_id: game.table_id.clone(),
        phase: game.phase,
        current_player: game.current_player,
        current_bid: game.current_bid,
        trump: game.trump,
        current_trick: game.current_trick.clone(),
        last_trick: game.last_trick.clone(),
        round_no: game.round_no,
        team_scores: game.team_scores,
        round_scores: game.round_scores,
        dealer: game.dealer,
        contractor_team: game.contractor_team,
        players_who_have_passed: game.passed.iter().copied().collect(),
        deck_variant: game.deck_variant,
        score_target: game.score_target,
        kitty_enabled: game.kitty_enabled,
        kitty_size: game.kitty.len(),
        kitty_discards: game.kitty_discards.clone(),
        kitty_phase_completed: game.kitty_phase_completed,
        opposing_team_bid: game.opposing_team_bid,
        seats: seat_snapshots(game, reveal_all, viewer_seat),
    }
}

/// Outbound snapshot for a specific seat: only that seat's hand is
/// revealed. `viewer_seat = None` is the spectator view (no hands shown).
pub fn snapshot_for_viewer(game: &Game, viewer_seat: Option<u8>) -> GameSnapshot {
    build(game, false, viewer_seat)
}

/// Full snapshot with every hand revealed, used for transcript entries.
pub fn snapshot_full(game: &Game) -> GameSnapshot {
    build(game, true, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::test_game;

    #[test]
    fn viewer_snapshot_hides_other_hands() {
        let game = test_game();
        let snap = snapshot_for_viewer(&game, Some(0));
        assert!(snap.seats[0].hand.is_some());
        assert!(snap.seats[1].hand.is_none());
        assert_eq!(snap.seats[1].hand_size, game.seats[1].hand.len());
    }

    #[test]
    fn spectator_snapshot_hides_all_hands() {
        let game = test_game();
        let snap = snapshot_for_viewer(&game, None);
        assert!(snap.seats.iter().all(|s| s.hand.is_none()));
    }

    #[test]
    fn full_snapshot_reveals_every_hand() {
        let game = test_game();
        let snap = snapshot_full(&game);
        assert!(snap.seats.iter().all(|s| s.hand.is_some()));
    }

    #[test]
    fn passed_set_serializes_as_ordered_sequence() {
        let mut game = test_game();
        game.passed.insert(2);
        game.passed.insert(0);
        game.passed.insert(3);
        let snap = snapshot_for_viewer(&game, None);
        assert_eq!(snap.players_who_have_passed, vec![0, 2, 3]);
    }
}
