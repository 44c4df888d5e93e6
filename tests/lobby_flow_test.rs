//! Table lifecycle through `services::lobby`, independent of the
//! transport layer. Covers creation, seating, bot management, and the
//! creator-only guards `TableRegistry` enforces.

use two_hundred_server::config::Config;
use two_hundred_server::domain::player::BotSkill;
use two_hundred_server::services::lobby;
use two_hundred_server::state::table_registry::{TableOptions, TableRegistry};
use two_hundred_server::state::AppState;

fn registry() -> TableRegistry {
    TableRegistry::new()
}

fn test_state() -> AppState {
    AppState::new(Config {
        port: 0,
        frontend_url: None,
        log_level: "warn".to_string(),
        node_env: "test".to_string(),
        integration_test: true,
    })
}

#[test]
fn create_join_and_fill_with_bots() {
    let tables = registry();
    let table = tables
        .create_table("lobby", "t1", "Table One", "human-1", "Alice", TableOptions::default())
        .unwrap();
    assert_eq!(table.seats[0].as_ref().unwrap().display_name, "Alice");
    assert!(table.live_game_id.is_none());

    for pos in 1..4u8 {
        let updated = tables.add_bot("t1", "Alice", pos, BotSkill::Medium).unwrap();
        assert!(updated.seats[pos as usize].as_ref().unwrap().is_bot);
    }

    let full = tables.get_summary("t1").unwrap();
    assert!(full.seats.iter().all(Option::is_some));
}

#[test]
fn non_creator_cannot_add_bots_or_change_config() {
    let tables = registry();
    tables
        .create_table("lobby", "t1", "Table One", "human-1", "Alice", TableOptions::default())
        .unwrap();
    assert!(tables.add_bot("t1", "Bob", 1, BotSkill::Easy).is_err());
    let opts = TableOptions {
        score_target: Some(50),
        ..Default::default()
    };
    assert!(tables.update_config("t1", "Bob", opts).is_err());
}

#[test]
fn kitty_requires_forty_card_deck() {
    let tables = registry();
    let opts = TableOptions {
        has_kitty: Some(true),
        ..Default::default()
    };
    assert!(tables
        .create_table("lobby", "t1", "Kitty Table", "human-1", "Alice", opts)
        .is_err());
}

#[test]
fn wrong_password_rejected_on_join() {
    let tables = registry();
    let opts = TableOptions {
        is_private: Some(true),
        password: Some("secret".to_string()),
        ..Default::default()
    };
    tables
        .create_table("lobby", "t1", "Private Table", "human-1", "Alice", opts)
        .unwrap();
    assert!(tables.join_table("t1", "human-2", "Bob", Some("nope")).is_err());
    let (table, seat) = tables.join_table("t1", "human-2", "Bob", Some("secret")).unwrap();
    assert_eq!(seat, 1);
    assert_eq!(table.seats[1].as_ref().unwrap().display_name, "Bob");
}

#[test]
fn move_player_requires_empty_destination_and_creator() {
    let state = test_state();
    lobby::create_table(&state, "t1", "Table One", "human-1", "Alice", TableOptions::default()).unwrap();
    lobby::add_bot(&state, "t1", "Alice", 1, BotSkill::Easy).unwrap();

    assert!(lobby::move_player(&state, "t1", "Alice", "human-1", 1).is_err());
    let moved = lobby::move_player(&state, "t1", "Alice", "human-1", 2).unwrap();
    assert_eq!(moved.seats[2].as_ref().unwrap().id, "human-1");
    assert!(moved.seats[0].is_none());
}

#[tokio::test]
async fn maybe_auto_start_only_fires_once_table_is_full() {
    let state = std::sync::Arc::new(test_state());
    lobby::create_table(&state, "t1", "Table One", "human-1", "Alice", TableOptions::default()).unwrap();
    assert!(lobby::maybe_auto_start(&state, "t1").is_none());

    lobby::add_bot(&state, "t1", "Alice", 1, BotSkill::Easy).unwrap();
    lobby::add_bot(&state, "t1", "Alice", 2, BotSkill::Easy).unwrap();
    assert!(lobby::maybe_auto_start(&state, "t1").is_none());

    lobby::add_bot(&state, "t1", "Alice", 3, BotSkill::Easy).unwrap();
    let handle = lobby::maybe_auto_start(&state, "t1").expect("table is full, game should start");
    assert!(state.lanes.get(&handle.game_id).is_some());
    assert!(state.tables.get_summary("t1").unwrap().live_game_id.is_some());
}
