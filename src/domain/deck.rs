//! Deck construction, shuffling, and the two dealing disciplines.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, Rank, Suit};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckVariant {
    #[serde(rename = "36")]
    Thirty6,
    #[serde(rename = "40")]
    Forty,
}

impl DeckVariant {
    pub fn size(self) -> usize {
        match self {
            DeckVariant::Thirty6 => 36,
            DeckVariant::Forty => 40,
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "36" => Ok(DeckVariant::Thirty6),
            "40" => Ok(DeckVariant::Forty),
            other => Err(DomainError::state(format!("unknown deck variant '{other}'"))),
        }
    }
}

pub fn build_deck(variant: DeckVariant) -> Vec<Card> {
    let ranks: &[Rank] = match variant {
        DeckVariant::Thirty6 => &Rank::VARIANT_36,
        DeckVariant::Forty => &Rank::VARIANT_40,
    };
    let mut deck = Vec::with_capacity(variant.size());
    for suit in Suit::ALL {
        for &rank in ranks {
            deck.push(Card::new(suit, rank));
        }
    }
    deck
}

/// SplitMix64-style deterministic RNG so a dealt hand can be reproduced
/// from its seed for transcript replay and tests.
pub struct SimpleLcg {
    state: u64,
}

impl SimpleLcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    /// Unbiased value in `0..max` via rejection sampling.
    pub fn next_range(&mut self, max: u64) -> u64 {
        if max == 0 {
            return 0;
        }
        let limit = u64::MAX - (u64::MAX % max);
        loop {
            let v = self.next();
            if v < limit {
                return v % max;
            }
        }
    }
}

pub fn shuffle_with_seed(deck: &mut [Card], seed: u64) {
    let mut rng = SimpleLcg::new(seed);
    for i in (1..deck.len()).rev() {
        let j = rng.next_range((i + 1) as u64) as usize;
        deck.swap(i, j);
    }
}

/// Shuffles with real entropy. The only shuffle the production deal path
/// uses; `shuffle_with_seed` stays reserved for reproducible tests.
pub fn shuffle(deck: &mut [Card]) {
    use rand::seq::SliceRandom;
    deck.shuffle(&mut rand::rng());
}

pub const PLAYERS: usize = 4;

/// Standard no-kitty deal: round-robin from seat 0 until the deck is
/// exhausted (9 per seat for 36-card, 10 per seat for 40-card no-kitty).
pub fn deal_standard(deck: &[Card]) -> [Vec<Card>; 4] {
    let mut hands: [Vec<Card>; 4] = Default::default();
    for (i, card) in deck.iter().enumerate() {
        hands[i % PLAYERS].push(*card);
    }
    for hand in &mut hands {
        hand.sort_by_key(Card::sort_key);
    }
    hands
}

/// Kitty deal: packet pattern 3-2-3-2-3 across the 40-card deck, leaving
/// 9 cards per seat and 4 in the kitty.
pub fn deal_with_kitty(deck: &[Card]) -> ([Vec<Card>; 4], Vec<Card>) {
    let mut hands: [Vec<Card>; 4] = Default::default();
    let mut kitty = Vec::with_capacity(4);
    let mut cursor = 0usize;
    for _round in 0..3 {
        for hand in &mut hands {
            hand.extend_from_slice(&deck[cursor..cursor + 3]);
            cursor += 3;
        }
        kitty.extend_from_slice(&deck[cursor..cursor + 2]);
        cursor += 2;
    }
    debug_assert_eq!(cursor, 40);
    for hand in &mut hands {
        hand.sort_by_key(Card::sort_key);
    }
    (hands, kitty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_sizes_are_correct() {
        assert_eq!(build_deck(DeckVariant::Thirty6).len(), 36);
        assert_eq!(build_deck(DeckVariant::Forty).len(), 40);
    }

    #[test]
    fn shuffle_is_deterministic_for_seed() {
        let mut a = build_deck(DeckVariant::Thirty6);
        let mut b = build_deck(DeckVariant::Thirty6);
        shuffle_with_seed(&mut a, 42);
        shuffle_with_seed(&mut b, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_differs_across_seeds() {
        let mut a = build_deck(DeckVariant::Thirty6);
        let mut b = build_deck(DeckVariant::Thirty6);
        shuffle_with_seed(&mut a, 1);
        shuffle_with_seed(&mut b, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn standard_deal_covers_whole_deck() {
        let mut deck = build_deck(DeckVariant::Thirty6);
        shuffle_with_seed(&mut deck, 7);
        let hands = deal_standard(&deck);
        assert!(hands.iter().all(|h| h.len() == 9));
        let mut all: Vec<Card> = hands.into_iter().flatten().collect();
        all.sort_by_key(Card::sort_key);
        let mut expected = deck.clone();
        expected.sort_by_key(Card::sort_key);
        assert_eq!(all, expected);
    }

    #[test]
    fn kitty_deal_shape() {
        let mut deck = build_deck(DeckVariant::Forty);
        shuffle_with_seed(&mut deck, 7);
        let (hands, kitty) = deal_with_kitty(&deck);
        assert!(hands.iter().all(|h| h.len() == 9));
        assert_eq!(kitty.len(), 4);
    }
}
