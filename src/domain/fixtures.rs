//! Test-only game construction helpers.

#![cfg(test)]

use crate::domain::deck::{build_deck, deal_standard, shuffle_with_seed, DeckVariant};
use crate::domain::game::{Game, Phase, Trick};
use crate::domain::player::Player;

/// A four-bot game ready for bidding: dealer=3 so seat 0 bids first,
/// 36-card deck, no kitty, dealt deterministically.
pub fn test_game() -> Game {
    let mut deck = build_deck(DeckVariant::Thirty6);
    shuffle_with_seed(&mut deck, 1234);
    let hands = deal_standard(&deck);

    let seats_vec: Vec<Player> = hands
        .into_iter()
        .enumerate()
        .map(|(i, hand)| {
            let mut player = Player::new_bot(
                format!("bot-{i}"),
                format!("Bot {i}"),
                i as u8,
                crate::domain::player::BotSkill::Medium,
            );
            player.hand = hand;
            player
        })
        .collect();
    let seats: [Player; 4] = seats_vec.try_into().expect("dealing always yields 4 hands");

    Game {
        id: "game-1".to_string(),
        table_id: "table-1".to_string(),
        seats,
        current_player: 0,
        phase: Phase::Bidding,
        current_bid: None,
        trump: None,
        current_trick: Trick::default(),
        last_trick: None,
        round_tricks: Vec::new(),
        round_no: 1,
        team_scores: [0, 0],
        round_scores: [0, 0],
        dealer: 3,
        spectator_ids: Vec::new(),
        contractor_team: None,
        bidding_passes: 0,
        passed: Default::default(),
        turn_started_at: None,
        timeout_budget_ms: 30_000,
        deck_variant: DeckVariant::Thirty6,
        score_target: 200,
        kitty_enabled: false,
        kitty: Vec::new(),
        kitty_discards: Vec::new(),
        kitty_phase_completed: false,
        remaining_deck: Vec::new(),
        completed_rounds: Vec::new(),
        opposing_team_bid: 0,
        allow_point_card_discards: true,
        enforce_opposing_team_bid_rule: false,
    }
}

/// Same as `test_game` but with the 40-card kitty variant dealt.
pub fn test_game_with_kitty() -> Game {
    let mut game = test_game();
    game.deck_variant = DeckVariant::Forty;
    game.kitty_enabled = true;
    let mut deck = build_deck(DeckVariant::Forty);
    shuffle_with_seed(&mut deck, 5678);
    let (hands, kitty) = crate::domain::deck::deal_with_kitty(&deck);
    for (i, hand) in hands.into_iter().enumerate() {
        game.seats[i].hand = hand;
    }
    game.kitty = kitty;
    game
}
