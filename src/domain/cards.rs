//! Card model: suits, ranks, point values, trick-comparison ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub const fn as_str(self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "hearts" => Ok(Suit::Hearts),
            "diamonds" => Ok(Suit::Diamonds),
            "clubs" => Ok(Suit::Clubs),
            "spades" => Ok(Suit::Spades),
            other => Err(DomainError::legality(format!("unknown suit '{other}'"))),
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rank 6 exists only in the 40-card variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const VARIANT_36: [Rank; 9] = [
        Rank::Five,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub const VARIANT_40: [Rank; 10] = [
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "5" => Ok(Rank::Five),
            "6" => Ok(Rank::Six),
            "7" => Ok(Rank::Seven),
            "8" => Ok(Rank::Eight),
            "9" => Ok(Rank::Nine),
            "10" => Ok(Rank::Ten),
            "J" => Ok(Rank::Jack),
            "Q" => Ok(Rank::Queen),
            "K" => Ok(Rank::King),
            "A" => Ok(Rank::Ace),
            other => Err(DomainError::legality(format!("unknown rank '{other}'"))),
        }
    }

    /// Trick-comparison priority: A=14 down to 5.
    pub const fn priority(self) -> u8 {
        match self {
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 14,
        }
    }

    /// Point value: A=10, 10=10, 5=5, everything else 0.
    pub const fn point_value(self) -> u8 {
        match self {
            Rank::Ace | Rank::Ten => 10,
            Rank::Five => 5,
            _ => 0,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Rank {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Rank {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Rank::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A playing card. `id` is `"{suit}-{rank}"`, unique within a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    pub fn id(&self) -> String {
        format!("{}-{}", self.suit, self.rank)
    }

    pub fn point_value(&self) -> u8 {
        self.rank.point_value()
    }

    pub fn priority(&self) -> u8 {
        self.rank.priority()
    }

    /// Ordering used only for sorting hands, never for trick resolution.
    pub fn sort_key(&self) -> (u8, u8) {
        let suit_order = match self.suit {
            Suit::Clubs => 0,
            Suit::Diamonds => 1,
            Suit::Hearts => 2,
            Suit::Spades => 3,
        };
        (suit_order, self.rank.priority())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.id())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_card_str(&s).map_err(serde::de::Error::custom)
    }
}

pub fn parse_card_str(s: &str) -> Result<Card, DomainError> {
    let (suit_part, rank_part) = s
        .split_once('-')
        .ok_or_else(|| DomainError::legality(format!("malformed card token '{s}'")))?;
    let suit = Suit::parse(suit_part)?;
    let rank = Rank::parse(rank_part)?;
    Ok(Card::new(suit, rank))
}

pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

/// Trump/lead-suit comparison: trump beats non-trump regardless of rank;
/// within the same trump-status, higher rank wins; among non-trump cards
/// only lead-suit cards contend, off-suit never wins.
pub fn card_beats(a: Card, b: Card, lead: Suit, trump: Suit) -> bool {
    let a_trump = a.suit == trump;
    let b_trump = b.suit == trump;
    if a_trump != b_trump {
        return a_trump;
    }
    if a_trump {
        return a.rank.priority() > b.rank.priority();
    }
    let a_lead = a.suit == lead;
    let b_lead = b.suit == lead;
    match (a_lead, b_lead) {
        (true, true) => a.rank.priority() > b.rank.priority(),
        (true, false) => true,
        (false, true) => false,
        (false, false) => false,
    }
}

#[cfg(test)]
pub fn parse_cards(tokens: &[&str]) -> Vec<Card> {
    tokens
        .iter()
        .map(|t| parse_card_str(t).expect("fixture token must parse"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let card = Card::new(Suit::Spades, Rank::Ten);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"spades-10\"");
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn rejects_invalid_tokens() {
        assert!(parse_card_str("nope").is_err());
        assert!(parse_card_str("hearts-1").is_err());
        assert!(parse_card_str("wind-A").is_err());
    }

    #[test]
    fn card_beats_trump_over_lead() {
        let trump = Suit::Clubs;
        let lead = Suit::Spades;
        let trump_card = Card::new(Suit::Clubs, Rank::Five);
        let lead_ace = Card::new(Suit::Spades, Rank::Ace);
        assert!(card_beats(trump_card, lead_ace, lead, trump));
        assert!(!card_beats(lead_ace, trump_card, lead, trump));
    }

    #[test]
    fn card_beats_off_suit_never_wins() {
        let lead = Suit::Spades;
        let trump = Suit::Clubs;
        let off = Card::new(Suit::Diamonds, Rank::Ace);
        let lead_card = Card::new(Suit::Spades, Rank::Five);
        assert!(!card_beats(off, lead_card, lead, trump));
    }

    #[test]
    fn test_hand_has_suit() {
        let hand = parse_cards(&["hearts-5", "clubs-A"]);
        assert!(hand_has_suit(&hand, Suit::Hearts));
        assert!(!hand_has_suit(&hand, Suit::Spades));
    }
}
