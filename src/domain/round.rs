//! Round and game lifecycle: §4.6.
//!
//! Open question resolved here (see DESIGN.md): kitty-discard credit to the
//! defending team is applied unconditionally, even when the
//! enforce-opposing-team-bid-rule clause would otherwise zero out that
//! team's card points, because the spec's literal wording for the discard
//! clause reads "regardless of above clause".

use crate::domain::bidding::reset_round_state;
use crate::domain::events::GameEvent;
use crate::domain::game::{Game, Phase, Round};
use crate::domain::rules::next_seat;
use crate::errors::domain::DomainError;

pub fn finalize_round(game: &mut Game) -> Result<Vec<GameEvent>, DomainError> {
    let contractor_team = game.contractor_team.ok_or_else(|| {
        DomainError::invariant("round finalized with no contractor team").with_game(game.id.clone())
    })?;
    let bid = game
        .current_bid
        .ok_or_else(|| DomainError::invariant("round finalized with no bid").with_game(game.id.clone()))?;
    let opponent_team = 1 - contractor_team;

    let cpts = game.round_scores[contractor_team as usize];
    let opts = game.round_scores[opponent_team as usize];

    let contractor_delta: i32 = if cpts >= bid.points as u32 {
        cpts as i32
    } else {
        -(bid.points as i32)
    };

    let opponent_exempt = game.enforce_opposing_team_bid_rule
        && game.team_scores[opponent_team as usize] >= 100
        && game.opposing_team_bid == 0;
    let mut opponent_delta: i32 = if opponent_exempt { 0 } else { opts as i32 };

    if game.kitty_enabled && !game.kitty_discards.is_empty() {
        let discard_points: u32 = game.kitty_discards.iter().map(|c| c.point_value() as u32).sum();
        opponent_delta += discard_points as i32;
    }

    let mut delta_by_team = [0i32; 2];
    delta_by_team[contractor_team as usize] = contractor_delta;
    delta_by_team[opponent_team as usize] = opponent_delta;

    game.team_scores[0] += delta_by_team[0];
    game.team_scores[1] += delta_by_team[1];

    let completed = Round {
        round_no: game.round_no,
        tricks: std::mem::take(&mut game.round_tricks),
        contractor_team,
        trump: game.trump,
        bid: Some(bid),
        team_score_delta: delta_by_team,
    };
    game.completed_rounds.push(completed);

    let mut events = vec![GameEvent::RoundComplete {
        team_score_delta: delta_by_team,
    }];

    if let Some(winning_team) = check_game_end(game) {
        game.phase = Phase::Finished;
        events.push(GameEvent::GameComplete { winning_team });
    } else {
        let new_dealer = next_seat(game.dealer);
        reset_round_state(game, new_dealer);
        crate::domain::bidding::deal_round(game);
        events.push(GameEvent::RoundStart {
            round_no: game.round_no,
            dealer: game.dealer,
        });
    }

    Ok(events)
}

/// Returns the winning team if either team has reached `|score| >=
/// score_target`. A team that falls to `-score_target` loses; the other
/// team wins.
fn check_game_end(game: &Game) -> Option<u8> {
    for team in 0u8..2 {
        let score = game.team_scores[team as usize];
        if score >= game.score_target {
            return Some(team);
        }
        if score <= -game.score_target {
            return Some(1 - team);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::Suit;
    use crate::domain::fixtures::test_game;
    use crate::domain::game::Bid;

    fn finished_round_game(cpts: u32, opts: u32, bid_points: u16) -> Game {
        let mut game = test_game();
        game.phase = Phase::Playing;
        game.contractor_team = Some(0);
        game.current_bid = Some(Bid {
            seat: 0,
            points: bid_points,
            suit: Some(Suit::Hearts),
        });
        game.round_scores = [cpts, opts];
        for seat in &mut game.seats {
            seat.hand.clear();
        }
        game
    }

    #[test]
    fn contract_made_credits_points() {
        let mut game = finished_round_game(60, 40, 50);
        finalize_round(&mut game).unwrap();
        assert_eq!(game.team_scores[0], 60);
        assert_eq!(game.team_scores[1], 40);
    }

    #[test]
    fn contract_failed_loses_bid_points() {
        let mut game = finished_round_game(30, 70, 50);
        finalize_round(&mut game).unwrap();
        assert_eq!(game.team_scores[0], -50);
        assert_eq!(game.team_scores[1], 70);
    }

    #[test]
    fn opposing_team_bid_rule_zeroes_out_unbid_opponent_at_100() {
        let mut game = finished_round_game(60, 40, 50);
        game.enforce_opposing_team_bid_rule = true;
        game.team_scores[1] = 100;
        game.opposing_team_bid = 0;
        finalize_round(&mut game).unwrap();
        assert_eq!(game.team_scores[1], 100);
    }

    #[test]
    fn game_ends_at_score_target() {
        let mut game = finished_round_game(200, 0, 50);
        game.score_target = 200;
        game.team_scores = [0, 0];
        let events = finalize_round(&mut game).unwrap();
        assert_eq!(game.phase, Phase::Finished);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::GameComplete { winning_team: 0 })));
    }
}
