//! Bidding state machine: §4.3.

use crate::domain::cards::Suit;
use crate::domain::deck::{build_deck, deal_standard, deal_with_kitty, shuffle};
use crate::domain::events::GameEvent;
use crate::domain::game::{Bid, Game, Phase};
use crate::domain::rules::{are_partners, is_valid_bid_amount, next_seat, team_of, MAX_BID, SEATS};
use crate::errors::domain::DomainError;

fn require_bidding_turn(game: &Game, seat: u8) -> Result<(), DomainError> {
    if game.phase != Phase::Bidding {
        return Err(DomainError::legality("bidding is not in progress")
            .with_game(game.id.clone())
            .with_phase(game.phase));
    }
    if game.current_player != seat {
        return Err(DomainError::legality("not your turn")
            .with_game(game.id.clone())
            .with_phase(game.phase));
    }
    if game.passed.contains(&seat) {
        return Err(DomainError::legality("seat has already passed")
            .with_game(game.id.clone())
            .with_phase(game.phase));
    }
    Ok(())
}

/// Advance `game.current_player` past any seat already in `passed`,
/// capped at one lap to avoid livelock if everyone has passed.
fn advance_past_passed(game: &mut Game) {
    let mut seat = next_seat(game.current_player);
    for _ in 0..SEATS {
        if !game.passed.contains(&seat) {
            game.current_player = seat;
            return;
        }
        seat = next_seat(seat);
    }
    // everyone has passed; leave current_player where the loop left it,
    // the completion check below handles the all-pass case.
    game.current_player = seat;
}

pub fn bid(game: &mut Game, seat: u8, points: u16, suit: Suit) -> Result<Vec<GameEvent>, DomainError> {
    require_bidding_turn(game, seat)?;
    if !is_valid_bid_amount(points) {
        return Err(DomainError::legality(format!("bid {points} is not a valid amount"))
            .with_game(game.id.clone())
            .with_phase(game.phase));
    }
    let current_points = game.current_bid.map(|b| b.points).unwrap_or(0);
    if points <= current_points {
        return Err(DomainError::legality(format!(
            "bid {points} does not exceed current bid {current_points}"
        ))
        .with_game(game.id.clone())
        .with_phase(game.phase));
    }

    let new_bid = Bid {
        seat,
        points,
        suit: Some(suit),
    };
    game.current_bid = Some(new_bid);
    game.bidding_passes = 0;

    if let Some(contractor) = contractor_team_so_far(game) {
        if team_of(seat) != contractor {
            game.opposing_team_bid = game.opposing_team_bid.max(points);
        }
    }

    let mut events = vec![GameEvent::BidMade { bid: new_bid }];
    events.extend(check_bidding_completion(game, points == MAX_BID)?);
    Ok(events)
}

pub fn pass(game: &mut Game, seat: u8) -> Result<Vec<GameEvent>, DomainError> {
    require_bidding_turn(game, seat)?;
    game.passed.insert(seat);
    game.bidding_passes += 1;

    let mut events = vec![GameEvent::BidPass { seat }];
    events.extend(check_bidding_completion(game, false)?);
    Ok(events)
}

/// The contractor-so-far is whoever holds the current bid; used only to
/// classify opposing-team bids before the contractor team is finalized.
fn contractor_team_so_far(game: &Game) -> Option<u8> {
    game.current_bid.map(|b| team_of(b.seat))
}

fn check_bidding_completion(game: &mut Game, bid_is_max: bool) -> Result<Vec<GameEvent>, DomainError> {
    let all_passed = game.passed.len() == SEATS;
    if all_passed {
        return Ok(start_new_round_all_passed(game));
    }

    let complete = bid_is_max
        || (game.passed.len() >= 3 && game.current_bid.is_some())
        || only_remaining_seat_is_bidder(game);

    if !complete {
        advance_past_passed(game);
        game.reset_turn_clock();
        return Ok(Vec::new());
    }

    let bid = game
        .current_bid
        .expect("bidding cannot complete with no bid unless everyone passed");

    let to_kitty = game.kitty_enabled
        && game.deck_variant == crate::domain::deck::DeckVariant::Forty
        && !game.kitty.is_empty()
        && !game.kitty_phase_completed;

    if to_kitty {
        game.phase = Phase::Kitty;
        game.current_player = bid.seat;
    } else {
        game.phase = Phase::Playing;
        game.trump = bid.suit;
        game.contractor_team = Some(team_of(bid.seat));
        game.current_player = bid.seat;
    }
    game.reset_turn_clock();

    Ok(vec![GameEvent::BiddingComplete { to_kitty }])
}

fn only_remaining_seat_is_bidder(game: &Game) -> bool {
    let Some(bid) = game.current_bid else {
        return false;
    };
    let not_passed: Vec<u8> = (0..SEATS as u8).filter(|s| !game.passed.contains(s)).collect();
    not_passed.len() == 1 && not_passed[0] == bid.seat
}

fn start_new_round_all_passed(game: &mut Game) -> Vec<GameEvent> {
    let new_dealer = next_seat(game.dealer);
    reset_round_state(game, new_dealer);
    deal_round(game);
    vec![GameEvent::RoundStart {
        round_no: game.round_no,
        dealer: game.dealer,
    }]
}

/// Clears all per-round state and rotates the dealer. Shared by the
/// all-pass restart and by normal round-to-round progression.
pub fn reset_round_state(game: &mut Game, new_dealer: u8) {
    game.round_no += 1;
    game.dealer = new_dealer;
    game.current_bid = None;
    game.trump = None;
    game.current_trick = Default::default();
    game.last_trick = None;
    game.round_tricks.clear();
    game.kitty_discards.clear();
    game.kitty_phase_completed = false;
    game.contractor_team = None;
    game.opposing_team_bid = 0;
    game.round_scores = [0, 0];
    game.bidding_passes = 0;
    game.passed.clear();
    game.phase = Phase::Bidding;
    game.current_player = next_seat(game.dealer);
    game.reset_turn_clock();
}

/// Builds a fresh shuffled deck and deals it per the table's discipline.
pub fn deal_round(game: &mut Game) {
    let mut deck = build_deck(game.deck_variant);
    shuffle(&mut deck);

    if game.kitty_enabled && game.deck_variant == crate::domain::deck::DeckVariant::Forty {
        let (hands, kitty) = deal_with_kitty(&deck);
        for (seat, hand) in hands.into_iter().enumerate() {
            game.seats[seat].hand = hand;
        }
        game.kitty = kitty;
    } else {
        let hands = deal_standard(&deck);
        for (seat, hand) in hands.into_iter().enumerate() {
            game.seats[seat].hand = hand;
        }
        game.kitty.clear();
    }
    game.remaining_deck.clear();
}

pub fn are_teammates(a: u8, b: u8) -> bool {
    are_partners(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::test_game;

    #[test]
    fn minimum_bid_and_three_passes_completes_bidding() {
        let mut game = test_game();
        bid(&mut game, 0, 50, Suit::Hearts).unwrap();
        pass(&mut game, 1).unwrap();
        pass(&mut game, 2).unwrap();
        let events = pass(&mut game, 3).unwrap();
        assert_eq!(game.phase, Phase::Playing);
        assert_eq!(game.trump, Some(Suit::Hearts));
        assert_eq!(game.contractor_team, Some(team_of(0)));
        assert_eq!(game.current_player, 0);
        assert_eq!(game.passed.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::BiddingComplete { .. })));
    }

    #[test]
    fn all_pass_starts_new_round() {
        let mut game = test_game();
        game.dealer = 0;
        game.current_player = 0;
        pass(&mut game, 0).unwrap();
        pass(&mut game, 1).unwrap();
        pass(&mut game, 2).unwrap();
        pass(&mut game, 3).unwrap();
        assert_eq!(game.round_no, 2);
        assert_eq!(game.dealer, 1);
        assert!(game.passed.is_empty());
        assert!(game.current_bid.is_none());
        assert_eq!(game.bidding_passes, 0);
    }

    #[test]
    fn bid_of_100_terminates_immediately() {
        let mut game = test_game();
        bid(&mut game, 0, 50, Suit::Spades).unwrap();
        bid(&mut game, 1, 100, Suit::Clubs).unwrap();
        assert_eq!(game.phase, Phase::Playing);
        assert_eq!(game.trump, Some(Suit::Clubs));
        assert_eq!(game.contractor_team, Some(team_of(1)));
    }

    #[test]
    fn bid_must_exceed_current_and_be_multiple_of_five() {
        let mut game = test_game();
        bid(&mut game, 0, 50, Suit::Hearts).unwrap();
        assert!(bid(&mut game, 1, 50, Suit::Clubs).is_err());
        assert!(bid(&mut game, 1, 52, Suit::Clubs).is_err());
    }

    #[test]
    fn passed_seat_cannot_bid_again() {
        let mut game = test_game();
        pass(&mut game, 0).unwrap();
        game.current_player = 0;
        assert!(bid(&mut game, 0, 50, Suit::Hearts).is_err());
    }
}
