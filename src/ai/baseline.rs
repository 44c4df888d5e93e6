//! Baseline bot policy: skill-tiered bid thresholds, simple follow-suit
//! card play. §4.7.

use rand::seq::IndexedRandom;

use crate::ai::trait_def::{AiError, BidChoice, BotPolicy, GameView};
use crate::domain::cards::{Card, Suit};
use crate::domain::player::BotSkill;
use crate::domain::rules::are_partners;

pub struct BaselinePolicy {
    pub skill: BotSkill,
}

impl BaselinePolicy {
    pub fn new(skill: BotSkill) -> Self {
        Self { skill }
    }
}

/// Sum of point values (A/10/5) in the hand.
pub fn hand_point_value(hand: &[Card]) -> u16 {
    hand.iter().map(|c| c.point_value() as u16).sum()
}

fn suggested_bid_from_value(value: u16) -> Option<u16> {
    if value < 30 {
        None
    } else if value < 40 {
        Some((value + 10).min(70))
    } else if value < 50 {
        Some((value + 5).min(80))
    } else {
        Some(value.min(100))
    }
}

fn floor_to_five(points: u16) -> u16 {
    points - (points % 5)
}

/// The suit the hand is longest in; ties broken by total point value.
fn longest_suit(hand: &[Card]) -> Suit {
    Suit::ALL
        .into_iter()
        .max_by_key(|&suit| {
            let cards: Vec<&Card> = hand.iter().filter(|c| c.suit == suit).collect();
            let count = cards.len();
            let points: u16 = cards.iter().map(|c| c.point_value() as u16).sum();
            (count, points)
        })
        .unwrap_or(Suit::Hearts)
}

impl BotPolicy for BaselinePolicy {
    fn choose_bid(&self, view: &GameView<'_>) -> Result<BidChoice, AiError> {
        let hand = view.my_hand();
        let value = hand_point_value(hand);
        let Some(mut suggested) = suggested_bid_from_value(value) else {
            return Ok(BidChoice::Pass);
        };

        let ceiling = (value + self.skill.aggressiveness_offset()).min(100);
        suggested = suggested.min(ceiling);

        if let Some(current) = view.game.current_bid {
            if are_partners(current.seat, view.my_seat) {
                return Ok(BidChoice::Pass);
            }
            if suggested <= current.points {
                let required = current.points + 5;
                if required > 100 || required > ceiling {
                    return Ok(BidChoice::Pass);
                }
                suggested = required;
            }
        }

        suggested = floor_to_five(suggested);
        if suggested < 50 {
            return Ok(BidChoice::Pass);
        }

        Ok(BidChoice::Bid {
            points: suggested,
            suit: longest_suit(hand),
        })
    }

    fn choose_play(&self, view: &GameView<'_>) -> Result<Card, AiError> {
        let hand = view.my_hand();
        let legal = view.legal_plays();
        if legal.is_empty() {
            return Err(AiError::NoLegalMove("empty legal set".into()));
        }
        let lead = view.game.current_trick.lead_suit();

        let chosen = match lead {
            None => {
                let mut rng = rand::rng();
                *legal.choose(&mut rng).expect("checked non-empty")
            }
            Some(lead_suit) if crate::domain::cards::hand_has_suit(hand, lead_suit) => legal
                .iter()
                .copied()
                .max_by_key(|c| c.priority())
                .expect("checked non-empty"),
            Some(_) => legal
                .iter()
                .copied()
                .min_by_key(|c| c.point_value())
                .expect("checked non-empty"),
        };
        Ok(chosen)
    }
}

/// Commits a bid choice onto the game's bidding engine.
pub fn apply_bid_choice(
    game: &mut crate::domain::game::Game,
    seat: u8,
    choice: BidChoice,
) -> Result<Vec<crate::domain::events::GameEvent>, crate::errors::domain::DomainError> {
    match choice {
        BidChoice::Pass => crate::domain::bidding::pass(game, seat),
        BidChoice::Bid { points, suit } => crate::domain::bidding::bid(game, seat, points, suit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::parse_cards;
    use crate::domain::fixtures::test_game;

    #[test]
    fn weak_hand_passes() {
        let mut game = test_game();
        game.seats[0].hand = parse_cards(&["clubs-7", "diamonds-8"]);
        let policy = BaselinePolicy::new(BotSkill::Medium);
        let view = GameView::new(&game, 0);
        assert_eq!(policy.choose_bid(&view).unwrap(), BidChoice::Pass);
    }

    #[test]
    fn strong_hand_bids_multiple_of_five_at_least_50() {
        let mut game = test_game();
        game.seats[0].hand = parse_cards(&[
            "hearts-A", "hearts-K", "hearts-Q", "hearts-J", "hearts-10", "diamonds-A",
        ]);
        let policy = BaselinePolicy::new(BotSkill::Hard);
        let view = GameView::new(&game, 0);
        match policy.choose_bid(&view).unwrap() {
            BidChoice::Bid { points, .. } => {
                assert!(points >= 50);
                assert_eq!(points % 5, 0);
            }
            BidChoice::Pass => panic!("expected a bid"),
        }
    }

    #[test]
    fn never_outbids_partner() {
        let mut game = test_game();
        game.current_bid = Some(crate::domain::game::Bid {
            seat: 2,
            points: 50,
            suit: Some(Suit::Hearts),
        });
        game.seats[0].hand = parse_cards(&["hearts-A", "hearts-K", "hearts-Q"]);
        let policy = BaselinePolicy::new(BotSkill::Hard);
        let view = GameView::new(&game, 0);
        assert_eq!(policy.choose_bid(&view).unwrap(), BidChoice::Pass);
    }

    #[test]
    fn follows_suit_with_highest_card() {
        let mut game = test_game();
        game.current_trick.plays.push((parse_cards(&["hearts-5"])[0], 3));
        game.seats[0].hand = parse_cards(&["hearts-K", "hearts-9", "clubs-A"]);
        let policy = BaselinePolicy::new(BotSkill::Easy);
        let view = GameView::new(&game, 0);
        let played = policy.choose_play(&view).unwrap();
        assert_eq!(played, parse_cards(&["hearts-K"])[0]);
    }
}
