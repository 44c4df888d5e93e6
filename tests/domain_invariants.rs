//! Property tests for §8's cross-module invariants. Pure domain logic,
//! no async runtime, no network.

mod common;

use proptest::prelude::*;
use two_hundred_server::domain::bidding::bid as make_bid;
use two_hundred_server::domain::cards::Suit;
use two_hundred_server::domain::deck::DeckVariant;
use two_hundred_server::domain::game::Phase;
use two_hundred_server::domain::rules::{is_valid_bid_amount, team_of, MAX_BID, MIN_BID};
use two_hundred_server::domain::tricks::{legal_plays, play_card};

fn deck_total(variant: DeckVariant) -> usize {
    variant.size()
}

proptest! {
    #![proptest_config(common::proptest_config())]

    /// Invariant 1: the multiset-sum of hands + current trick + kitty +
    /// kitty discards + remaining deck equals the variant's deck size at
    /// every point in a played-out round.
    #[test]
    fn total_card_count_is_conserved(seed in any::<u64>(), plays in 0u8..36) {
        let mut game = common::bot_game(seed);
        game.phase = Phase::Playing;
        game.trump = Some(Suit::Hearts);
        game.contractor_team = Some(team_of(0));
        game.current_player = 0;
        prop_assert_eq!(game.total_card_count(), deck_total(DeckVariant::Thirty6));

        for _ in 0..plays {
            if game.phase != Phase::Playing {
                break;
            }
            let seat = game.current_player;
            let Some(&card) = legal_plays(&game, seat).first() else { break };
            play_card(&mut game, seat, card).unwrap();
            prop_assert_eq!(game.total_card_count(), deck_total(DeckVariant::Thirty6));
        }
    }

    /// Invariant 2: every accepted play either matches the lead suit or
    /// the acting seat held no lead-suit card when it played.
    #[test]
    fn accepted_plays_respect_lead_suit(seed in any::<u64>(), plays in 0u8..36) {
        let mut game = common::bot_game(seed);
        game.phase = Phase::Playing;
        game.trump = Some(Suit::Spades);
        game.contractor_team = Some(team_of(0));
        game.current_player = 0;

        for _ in 0..plays {
            if game.phase != Phase::Playing {
                break;
            }
            let seat = game.current_player;
            let lead = game.current_trick.lead_suit();
            let hand_before = game.seats[seat as usize].hand.clone();
            let Some(&card) = legal_plays(&game, seat).first() else { break };
            play_card(&mut game, seat, card).unwrap();
            let followed = match lead {
                Some(lead) => card.suit == lead || !hand_before.iter().any(|c| c.suit == lead),
                None => true,
            };
            prop_assert!(followed);
        }
    }

    /// Invariant 6: a sequence of accepted bids strictly increases, every
    /// accepted amount is a multiple of 5 in [50, 100].
    #[test]
    fn accepted_bids_strictly_increase(seed in any::<u64>(), raw_points in prop::collection::vec(0u16..120, 1..8)) {
        let mut game = common::bot_game(seed);
        let mut last_accepted: Option<u16> = None;
        let mut seat = 0u8;

        for raw in raw_points {
            if game.phase != Phase::Bidding {
                break;
            }
            let points = (raw / 5) * 5;
            if !is_valid_bid_amount(points) {
                continue;
            }
            let before = last_accepted;
            match make_bid(&mut game, seat, points, Suit::Diamonds) {
                Ok(_) => {
                    if let Some(prev) = before {
                        prop_assert!(points > prev);
                        prop_assert!(points - prev >= 5);
                    }
                    prop_assert!((MIN_BID..=MAX_BID).contains(&points));
                    last_accepted = Some(points);
                    seat = game.current_player;
                }
                Err(_) => {
                    // Rejected bids (too low, out of turn after a round
                    // restart) must never appear in the invariant.
                }
            }
        }
    }
}

#[test]
fn kitty_deal_produces_nine_and_four() {
    use two_hundred_server::domain::rules::KITTY_SIZE;
    let game = common::bot_game_with_kitty(99);
    for seat in &game.seats {
        assert_eq!(seat.hand.len(), 9);
    }
    assert_eq!(game.kitty.len(), KITTY_SIZE);
    assert_eq!(game.total_card_count(), DeckVariant::Forty.size());
}
