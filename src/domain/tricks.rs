//! Trick engine: §4.5.

use crate::domain::cards::{card_beats, hand_has_suit, Card};
use crate::domain::events::GameEvent;
use crate::domain::game::{Game, Phase};
use crate::domain::rules::{next_seat, SEATS};
use crate::errors::domain::DomainError;

/// Cards a seat may legally play right now: every card if no lead suit is
/// established yet or the seat holds none of it, otherwise only lead-suit
/// cards.
pub fn legal_plays(game: &Game, seat: u8) -> Vec<Card> {
    let hand = &game.seats[seat as usize].hand;
    match game.current_trick.lead_suit() {
        None => hand.clone(),
        Some(lead) if hand_has_suit(hand, lead) => {
            hand.iter().copied().filter(|c| c.suit == lead).collect()
        }
        Some(_) => hand.clone(),
    }
}

pub fn play_card(game: &mut Game, seat: u8, card: Card) -> Result<Vec<GameEvent>, DomainError> {
    if game.phase != Phase::Playing {
        return Err(DomainError::legality("trick play is not in progress")
            .with_game(game.id.clone())
            .with_phase(game.phase));
    }
    if game.current_player != seat {
        return Err(DomainError::legality("not your turn")
            .with_game(game.id.clone())
            .with_phase(game.phase));
    }
    let hand = &game.seats[seat as usize].hand;
    if !hand.contains(&card) {
        return Err(DomainError::legality("card not in hand")
            .with_game(game.id.clone())
            .with_phase(game.phase));
    }
    if let Some(lead) = game.current_trick.lead_suit() {
        if card.suit != lead && hand_has_suit(hand, lead) {
            return Err(DomainError::legality("must follow suit")
                .with_game(game.id.clone())
                .with_phase(game.phase));
        }
    }

    let pos = game.seats[seat as usize]
        .hand
        .iter()
        .position(|c| *c == card)
        .expect("checked above");
    game.seats[seat as usize].hand.remove(pos);
    game.current_trick.plays.push((card, seat));

    let mut events = vec![GameEvent::CardPlayed { seat, card }];

    if game.current_trick.is_complete() {
        events.extend(complete_trick(game)?);
    } else {
        game.current_player = next_seat(seat);
        game.reset_turn_clock();
    }
    Ok(events)
}

fn complete_trick(game: &mut Game) -> Result<Vec<GameEvent>, DomainError> {
    let lead = game
        .current_trick
        .lead_suit()
        .expect("a complete trick has a lead card");
    let trump = game.trump.ok_or_else(|| {
        DomainError::invariant("trick completed with no trump set").with_game(game.id.clone())
    })?;

    let mut winner = game.current_trick.plays[0];
    for &(card, seat) in &game.current_trick.plays[1..] {
        if card_beats(card, winner.0, lead, trump) {
            winner = (card, seat);
        }
    }
    let winner_seat = winner.1;
    let points: u32 = game
        .current_trick
        .plays
        .iter()
        .map(|(c, _)| c.point_value() as u32)
        .sum();

    game.current_trick.winner = Some(winner_seat);
    game.current_trick.points = Some(points);

    game.contractor_team.ok_or_else(|| {
        DomainError::invariant("trick completed with no contractor team set").with_game(game.id.clone())
    })?;
    let team = crate::domain::rules::team_of(winner_seat);
    game.round_scores[team as usize] += points;

    let finished_trick = std::mem::take(&mut game.current_trick);
    game.last_trick = Some(finished_trick.clone());
    game.round_tricks.push(finished_trick);

    let mut events = vec![GameEvent::TrickComplete {
        winner: winner_seat,
        points,
    }];

    if game.seats.iter().all(|p| p.hand.is_empty()) {
        events.extend(crate::domain::round::finalize_round(game)?);
    } else {
        game.current_player = winner_seat;
        game.reset_turn_clock();
    }
    Ok(events)
}

/// Invariant check used by property tests: the played card belonged to the
/// acting seat's hand before removal, and followed suit whenever possible.
pub fn assert_follow_suit_respected(
    hand_before: &[Card],
    lead: Option<crate::domain::cards::Suit>,
    played: Card,
) -> bool {
    if !hand_before.contains(&played) {
        return false;
    }
    match lead {
        Some(lead) if hand_has_suit(hand_before, lead) => played.suit == lead,
        _ => true,
    }
}

pub const TRICK_SIZE: usize = SEATS;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::{parse_cards, Suit};
    use crate::domain::fixtures::test_game;

    fn set_up_playing(game: &mut Game, trump: Suit, contractor: u8) {
        game.phase = Phase::Playing;
        game.trump = Some(trump);
        game.contractor_team = Some(crate::domain::rules::team_of(contractor));
        game.current_bid = Some(crate::domain::game::Bid {
            seat: contractor,
            points: 50,
            suit: Some(trump),
        });
        game.current_player = 0;
    }

    #[test]
    fn follow_suit_enforced() {
        let mut game = test_game();
        set_up_playing(&mut game, Suit::Clubs, 0);
        game.seats[0].hand = parse_cards(&["hearts-A"]);
        game.seats[1].hand = parse_cards(&["hearts-5", "spades-10"]);
        play_card(&mut game, 0, parse_cards(&["hearts-A"])[0]).unwrap();

        let illegal = parse_cards(&["spades-10"])[0];
        assert!(play_card(&mut game, 1, illegal).is_err());
        let legal = parse_cards(&["hearts-5"])[0];
        assert!(play_card(&mut game, 1, legal).is_ok());
    }

    #[test]
    fn trump_wins_over_lead_suit() {
        let mut game = test_game();
        set_up_playing(&mut game, Suit::Clubs, 2);
        game.seats[0].hand = parse_cards(&["spades-A"]);
        game.seats[1].hand = parse_cards(&["spades-K"]);
        game.seats[2].hand = parse_cards(&["clubs-5"]);
        game.seats[3].hand = parse_cards(&["spades-10"]);

        play_card(&mut game, 0, parse_cards(&["spades-A"])[0]).unwrap();
        play_card(&mut game, 1, parse_cards(&["spades-K"])[0]).unwrap();
        play_card(&mut game, 2, parse_cards(&["clubs-5"])[0]).unwrap();
        let events = play_card(&mut game, 3, parse_cards(&["spades-10"])[0]).unwrap();

        let winner_event = events
            .iter()
            .find_map(|e| match e {
                GameEvent::TrickComplete { winner, points } => Some((*winner, *points)),
                _ => None,
            })
            .unwrap();
        assert_eq!(winner_event, (2, 25));
    }
}
