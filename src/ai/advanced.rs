//! Advanced bot policy: card tracking derived purely from the round's
//! played tricks (already retained on `Game`), plus a richer bidder.
//! §4.7 "Advanced card policy" / "advanced bidder".
//!
//! Unlike a stateful tracker, every tracking fact here is recomputed from
//! `GameView` on each call: the round's completed tricks and the
//! in-progress trick already carry everything needed, so there is no
//! hidden captured state to reset between rounds.

use std::collections::BTreeSet;

use crate::ai::baseline::{hand_point_value, BaselinePolicy};
use crate::ai::trait_def::{AiError, BidChoice, BotPolicy, GameView};
use crate::domain::cards::{card_beats, hand_has_suit, Card, Rank, Suit};
use crate::domain::game::{Game, Trick};
use crate::domain::player::BotSkill;
use crate::domain::rules::team_of;

pub struct AdvancedPolicy {
    fallback: BaselinePolicy,
}

impl AdvancedPolicy {
    pub fn new() -> Self {
        Self {
            fallback: BaselinePolicy::new(BotSkill::Advanced),
        }
    }
}

impl Default for AdvancedPolicy {
    fn default() -> Self {
        Self::new()
    }
}

fn all_round_tricks<'a>(game: &'a Game) -> impl Iterator<Item = &'a Trick> {
    game.round_tricks.iter().chain(std::iter::once(&game.current_trick))
}

fn played_cards(game: &Game) -> BTreeSet<Card> {
    all_round_tricks(game)
        .flat_map(|t| t.plays.iter().map(|(c, _)| *c))
        .collect()
}

/// Seats known to be void in a suit, inferred whenever a seat failed to
/// follow that trick's lead suit.
fn known_voids(game: &Game) -> [BTreeSet<Suit>; 4] {
    let mut voids: [BTreeSet<Suit>; 4] = Default::default();
    for trick in all_round_tricks(game) {
        let Some(lead) = trick.lead_suit() else { continue };
        for (card, seat) in &trick.plays {
            if card.suit != lead {
                voids[*seat as usize].insert(lead);
            }
        }
    }
    voids
}

fn remaining_trump_count(game: &Game, my_hand: &[Card], trump: Suit) -> usize {
    let seen = played_cards(game);
    let ranks: &[Rank] = if game.deck_variant == crate::domain::deck::DeckVariant::Forty {
        &Rank::VARIANT_40
    } else {
        &Rank::VARIANT_36
    };
    ranks
        .iter()
        .filter(|&&r| {
            let card = Card::new(trump, r);
            !seen.contains(&card) && !my_hand.contains(&card)
        })
        .count()
}

enum Action {
    DumpPointsToPartner,
    WinTrick,
    LoseTrick,
    ConserveTrump,
    Default,
}

fn current_winner(trick: &Trick, lead: Suit, trump: Suit) -> Option<(Card, u8)> {
    trick.plays.iter().copied().fold(None, |acc, (card, seat)| match acc {
        None => Some((card, seat)),
        Some((best, best_seat)) => {
            if card_beats(card, best, lead, trump) {
                Some((card, seat))
            } else {
                Some((best, best_seat))
            }
        }
    })
}

fn classify(game: &Game, my_seat: u8, trump: Suit) -> Action {
    let trick = &game.current_trick;
    let Some(lead) = trick.lead_suit() else {
        return Action::Default;
    };
    let points_on_table: u32 = trick.plays.iter().map(|(c, _)| c.point_value() as u32).sum();
    let Some((_, winning_seat)) = current_winner(trick, lead, trump) else {
        return Action::Default;
    };

    if team_of(winning_seat) == team_of(my_seat) && winning_seat != my_seat {
        return Action::DumpPointsToPartner;
    }

    let my_hand = &game.seats[my_seat as usize].hand;
    let need_points = game.contractor_team == Some(team_of(my_seat))
        && game.round_scores[team_of(my_seat) as usize] < game.current_bid.map(|b| b.points as u32).unwrap_or(0);

    if team_of(winning_seat) != team_of(my_seat) && (points_on_table >= 5 || need_points) {
        return Action::WinTrick;
    }

    let is_last_to_play = trick.plays.len() == 3;
    if is_last_to_play && points_on_table < 10 {
        return Action::LoseTrick;
    }

    if lead != trump && remaining_trump_count(game, my_hand, trump) <= 2 {
        return Action::ConserveTrump;
    }

    Action::Default
}

/// Picks an opening lead. Prefers a non-trump suit a known opponent is void
/// in (forcing them to trump in or shed points), falling back to our own
/// longest non-trump suit.
fn select_lead_card(game: &Game, seat: u8, legal: &[Card], trump: Suit) -> Card {
    let voids = known_voids(game);
    let my_team = team_of(seat);
    let opponent_void_suits: BTreeSet<Suit> = (0u8..4)
        .filter(|&s| s != seat && team_of(s) != my_team)
        .flat_map(|s| voids[s as usize].iter().copied())
        .collect();

    if let Some(card) = legal
        .iter()
        .copied()
        .filter(|c| c.suit != trump && opponent_void_suits.contains(&c.suit))
        .max_by_key(|c| c.priority())
    {
        return card;
    }

    let best_non_trump_suit = Suit::ALL
        .into_iter()
        .filter(|&s| s != trump)
        .max_by_key(|&s| legal.iter().filter(|c| c.suit == s).count());

    if let Some(suit) = best_non_trump_suit {
        if let Some(card) = legal
            .iter()
            .copied()
            .filter(|c| c.suit == suit)
            .max_by_key(|c| c.priority())
        {
            return card;
        }
    }

    legal.iter().copied().min_by_key(|c| c.priority()).unwrap_or(legal[0])
}

fn select_winning_card(legal: &[Card], current_winner: Card, lead: Suit, trump: Suit, points_on_table: u32) -> Card {
    let mut winners: Vec<Card> = legal
        .iter()
        .copied()
        .filter(|c| card_beats(*c, current_winner, lead, trump))
        .collect();
    winners.sort_by_key(|c| (c.suit != lead, c.priority()));
    if let Some(cheap_lead_win) = winners.iter().find(|c| c.suit == lead).copied() {
        return cheap_lead_win;
    }
    if points_on_table >= 5 {
        if let Some(trump_win) = winners.into_iter().find(|c| c.suit == trump) {
            return trump_win;
        }
    }
    legal.iter().copied().min_by_key(|c| c.point_value()).unwrap_or(legal[0])
}

fn select_losing_card(legal: &[Card], lead: Suit) -> Card {
    if let Some(c) = legal
        .iter()
        .copied()
        .filter(|c| c.suit == lead)
        .min_by_key(|c| c.point_value())
    {
        return c;
    }
    legal.iter().copied().min_by_key(|c| c.point_value()).unwrap_or(legal[0])
}

fn select_dump_card(legal: &[Card], lead: Suit, trump: Suit) -> Card {
    let lead_cards: Vec<Card> = legal.iter().copied().filter(|c| c.suit == lead).collect();
    if !lead_cards.is_empty() {
        if let Some(five) = lead_cards.iter().copied().find(|c| c.point_value() == 5) {
            return five;
        }
        return lead_cards
            .into_iter()
            .max_by_key(|c| c.point_value())
            .expect("non-empty");
    }
    // Never cut a winning partner with trump: play lowest non-trump instead.
    legal
        .iter()
        .copied()
        .filter(|c| c.suit != trump)
        .min_by_key(|c| c.point_value())
        .unwrap_or_else(|| legal.iter().copied().min_by_key(|c| c.point_value()).unwrap_or(legal[0]))
}

fn select_conserve_card(legal: &[Card], trump: Suit) -> Card {
    legal
        .iter()
        .copied()
        .filter(|c| c.suit != trump)
        .min_by_key(|c| c.point_value())
        .unwrap_or_else(|| legal.iter().copied().min_by_key(|c| c.priority()).unwrap_or(legal[0]))
}

impl BotPolicy for AdvancedPolicy {
    fn choose_bid(&self, view: &GameView<'_>) -> Result<BidChoice, AiError> {
        let hand = view.my_hand();
        let base = hand_point_value(hand);

        let trump_suit = Suit::ALL
            .into_iter()
            .max_by_key(|&suit| {
                let in_suit: Vec<&Card> = hand.iter().filter(|c| c.suit == suit).collect();
                let high_card_bonus: u16 = in_suit
                    .iter()
                    .map(|c| match c.rank {
                        Rank::Ace => 3,
                        Rank::King => 2,
                        Rank::Queen => 1,
                        _ => 0,
                    })
                    .sum();
                in_suit.len() as u16 * 4 + high_card_bonus
            })
            .unwrap_or(Suit::Hearts);

        let long_suit_len = hand.iter().filter(|c| c.suit == trump_suit).count();
        let long_suit_bonus: u16 = if long_suit_len >= 5 { 10 } else { 0 };

        let my_team = team_of(view.my_seat);
        let team_score = view.game.team_scores[my_team as usize];
        let opp_score = view.game.team_scores[(1 - my_team) as usize];
        let mut aggression = 0u16;
        if team_score >= 100 {
            aggression += 10;
        }
        if opp_score >= 100 {
            aggression += 5;
        }

        let mut value = base + long_suit_bonus + aggression;
        value = value.min(100);

        if value < 30 {
            return Ok(BidChoice::Pass);
        }
        let mut suggested = value.max(50);

        if let Some(current) = view.game.current_bid {
            if crate::domain::rules::are_partners(current.seat, view.my_seat) {
                return Ok(BidChoice::Pass);
            }
            if suggested <= current.points {
                let required = current.points + 5;
                if required > 100 {
                    return Ok(BidChoice::Pass);
                }
                suggested = required;
            }
        }

        suggested -= suggested % 5;
        if suggested < 50 {
            return Ok(BidChoice::Pass);
        }
        Ok(BidChoice::Bid {
            points: suggested.min(100),
            suit: trump_suit,
        })
    }

    fn choose_play(&self, view: &GameView<'_>) -> Result<Card, AiError> {
        let legal = view.legal_plays();
        if legal.is_empty() {
            return Err(AiError::NoLegalMove("empty legal set".into()));
        }
        let Some(trump) = view.game.trump else {
            return self.fallback.choose_play(view);
        };
        let lead = match view.game.current_trick.lead_suit() {
            Some(l) => l,
            None => return Ok(select_lead_card(view.game, view.my_seat, &legal, trump)),
        };

        let action = classify(view.game, view.my_seat, trump);
        let points_on_table: u32 = view
            .game
            .current_trick
            .plays
            .iter()
            .map(|(c, _)| c.point_value() as u32)
            .sum();

        let chosen = match action {
            Action::DumpPointsToPartner => select_dump_card(&legal, lead, trump),
            Action::WinTrick => {
                let Some((winner_card, _)) = current_winner(&view.game.current_trick, lead, trump) else {
                    return self.fallback.choose_play(view);
                };
                select_winning_card(&legal, winner_card, lead, trump, points_on_table)
            }
            Action::LoseTrick => select_losing_card(&legal, lead),
            Action::ConserveTrump => select_conserve_card(&legal, trump),
            Action::Default => {
                if hand_has_suit(&legal, lead) {
                    legal
                        .iter()
                        .copied()
                        .min_by_key(|c| c.priority())
                        .unwrap_or(legal[0])
                } else {
                    legal.iter().copied().min_by_key(|c| c.point_value()).unwrap_or(legal[0])
                }
            }
        };
        Ok(chosen)
    }

    fn on_round_start(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards::parse_cards;
    use crate::domain::fixtures::test_game;
    use crate::domain::game::Bid;

    fn set_up(game: &mut Game, trump: Suit) {
        game.phase = crate::domain::game::Phase::Playing;
        game.trump = Some(trump);
        game.contractor_team = Some(0);
        game.current_bid = Some(Bid {
            seat: 0,
            points: 50,
            suit: Some(trump),
        });
    }

    #[test]
    fn wins_cheaply_when_opponent_winning_with_points() {
        let mut game = test_game();
        set_up(&mut game, Suit::Clubs);
        game.current_trick.plays.push((parse_cards(&["spades-A"])[0], 1));
        game.seats[2].hand = parse_cards(&["spades-K", "spades-9"]);
        let policy = AdvancedPolicy::new();
        let view = GameView::new(&game, 2);
        let played = policy.choose_play(&view).unwrap();
        assert_eq!(played, parse_cards(&["spades-K"])[0]);
    }

    #[test]
    fn dumps_to_winning_partner() {
        let mut game = test_game();
        set_up(&mut game, Suit::Clubs);
        game.current_trick.plays.push((parse_cards(&["spades-A"])[0], 0));
        game.seats[2].hand = parse_cards(&["spades-5", "spades-10"]);
        let policy = AdvancedPolicy::new();
        let view = GameView::new(&game, 2);
        let played = policy.choose_play(&view).unwrap();
        assert_eq!(played, parse_cards(&["spades-5"])[0]);
    }
}
