//! Kitty phase: §4.4. Reachable once per round, only when the table deals
//! a 40-card kitty variant and the kitty still holds cards.

use crate::domain::cards::{Card, Suit};
use crate::domain::events::GameEvent;
use crate::domain::game::{Game, Phase};
use crate::domain::rules::{team_of, KITTY_SIZE};
use crate::errors::domain::DomainError;

fn require_kitty_turn(game: &Game, seat: u8) -> Result<(), DomainError> {
    if game.phase != Phase::Kitty {
        return Err(DomainError::legality("kitty phase is not active")
            .with_game(game.id.clone())
            .with_phase(game.phase));
    }
    if game.current_player != seat {
        return Err(DomainError::legality("not your turn")
            .with_game(game.id.clone())
            .with_phase(game.phase));
    }
    Ok(())
}

/// The bidder takes the kitty into hand. Does not by itself complete the
/// phase; the bidder still owes a discard.
pub fn take_kitty(game: &mut Game, seat: u8) -> Result<Vec<GameEvent>, DomainError> {
    require_kitty_turn(game, seat)?;
    if game.kitty.is_empty() {
        return Err(DomainError::state("kitty already taken")
            .with_game(game.id.clone())
            .with_phase(game.phase));
    }
    let kitty = std::mem::take(&mut game.kitty);
    game.seats[seat as usize].hand.extend(kitty);
    game.seats[seat as usize].hand.sort_by_key(Card::sort_key);
    Ok(vec![GameEvent::KittyPick { seat }])
}

/// The bidder discards exactly 4 cards and confirms trump. Point cards
/// (A, 10, 5) may only be discarded when the table allows it.
pub fn discard_to_kitty(
    game: &mut Game,
    seat: u8,
    discards: Vec<Card>,
    trump: Suit,
) -> Result<Vec<GameEvent>, DomainError> {
    require_kitty_turn(game, seat)?;
    if discards.len() != KITTY_SIZE {
        return Err(DomainError::legality(format!(
            "must discard exactly {KITTY_SIZE} cards"
        ))
        .with_game(game.id.clone())
        .with_phase(game.phase));
    }
    if !game.allow_point_card_discards && discards.iter().any(|c| c.point_value() > 0) {
        return Err(DomainError::legality("point cards cannot be discarded at this table")
            .with_game(game.id.clone())
            .with_phase(game.phase));
    }

    let hand = &mut game.seats[seat as usize].hand;
    for card in &discards {
        let pos = hand
            .iter()
            .position(|c| c == card)
            .ok_or_else(|| DomainError::legality("discard card not in hand").with_game(game.id.clone()))?;
        hand.remove(pos);
    }

    game.kitty_discards = discards.clone();
    game.kitty_phase_completed = true;
    game.trump = Some(trump);
    game.contractor_team = Some(team_of(seat));
    game.phase = Phase::Playing;
    game.current_player = seat;
    game.reset_turn_clock();

    Ok(vec![GameEvent::KittyDiscard { seat, discards, trump }])
}

/// Bot kitty policy: take the kitty, sort by ascending point value, discard
/// the lowest 4 (filtered by the discard policy), keep the bid's trump.
pub fn choose_bot_discards(game: &Game, seat: u8, _bid_suit: Suit) -> Vec<Card> {
    let mut candidates: Vec<Card> = game.seats[seat as usize].hand.clone();
    candidates.sort_by_key(|c| c.point_value());
    if !game.allow_point_card_discards {
        candidates.retain(|c| c.point_value() == 0);
    }
    candidates.into_iter().take(KITTY_SIZE).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::test_game_with_kitty;

    #[test]
    fn take_then_discard_completes_phase() {
        let mut game = test_game_with_kitty();
        game.phase = Phase::Kitty;
        game.current_player = 0;
        take_kitty(&mut game, 0).unwrap();
        assert_eq!(game.seats[0].hand.len(), 13);
        assert!(game.kitty.is_empty());

        let discards = choose_bot_discards(&game, 0, Suit::Hearts);
        assert_eq!(discards.len(), 4);
        discard_to_kitty(&mut game, 0, discards, Suit::Hearts).unwrap();

        assert_eq!(game.phase, Phase::Playing);
        assert_eq!(game.seats[0].hand.len(), 9);
        assert_eq!(game.kitty_discards.len(), 4);
        assert!(game.kitty_phase_completed);
        assert_eq!(game.trump, Some(Suit::Hearts));
    }

    #[test]
    fn wrong_discard_count_rejected() {
        let mut game = test_game_with_kitty();
        game.phase = Phase::Kitty;
        game.current_player = 0;
        take_kitty(&mut game, 0).unwrap();
        let bad: Vec<Card> = game.seats[0].hand.iter().take(3).copied().collect();
        assert!(discard_to_kitty(&mut game, 0, bad, Suit::Hearts).is_err());
    }
}
