//! Shared test fixtures: a deterministic four-bot game builder and the
//! proptest case-count knob, mirroring the domain module's own
//! `#[cfg(test)]` fixtures but usable from integration tests (which link
//! against the compiled library, where `cfg(test)` items are absent).

use two_hundred_server::domain::cards::Card;
use two_hundred_server::domain::deck::{build_deck, deal_standard, deal_with_kitty, shuffle_with_seed, DeckVariant};
use two_hundred_server::domain::game::{Game, Phase, Trick};
use two_hundred_server::domain::player::{BotSkill, Player};

/// Number of proptest cases per property; override with `PROPTEST_CASES`
/// for a deeper local run.
pub fn proptest_config() -> proptest::prelude::ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(64);
    proptest::prelude::ProptestConfig {
        cases,
        failure_persistence: None,
        ..proptest::prelude::ProptestConfig::default()
    }
}

fn bot_seats(hands: [Vec<Card>; 4]) -> [Player; 4] {
    let seats: Vec<Player> = hands
        .into_iter()
        .enumerate()
        .map(|(i, hand)| {
            let mut player = Player::new_bot(format!("bot-{i}"), format!("Bot {i}"), i as u8, BotSkill::Medium);
            player.hand = hand;
            player
        })
        .collect();
    seats.try_into().expect("dealing always yields 4 hands")
}

/// A four-bot, 36-card game seeded for deterministic dealing, parked in
/// `Bidding` with seat 0 to act first (dealer = 3).
pub fn bot_game(seed: u64) -> Game {
    let mut deck = build_deck(DeckVariant::Thirty6);
    shuffle_with_seed(&mut deck, seed);
    let hands = deal_standard(&deck);

    Game {
        id: format!("game-{seed}"),
        table_id: "table-1".to_string(),
        seats: bot_seats(hands),
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

/// Same shape but the 40-card kitty variant, dealt 9/9/9/9 + a 4-card kitty.
pub fn bot_game_with_kitty(seed: u64) -> Game {
    let mut game = bot_game(seed);
    game.deck_variant = DeckVariant::Forty;
    game.kitty_enabled = true;
    let mut deck = build_deck(DeckVariant::Forty);
    shuffle_with_seed(&mut deck, seed ^ 0x40);
    let (hands, kitty) = deal_with_kitty(&deck);
    for (i, hand) in hands.into_iter().enumerate() {
        game.seats[i].hand = hand;
    }
    game.kitty = kitty;
    game
}
