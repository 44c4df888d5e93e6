//! Wire-shape checks for the tagged `ClientEvent`/`ServerEvent` enums:
//! the `type` discriminant and field casing clients depend on (§6).

use two_hundred_server::domain::cards::{Card, Rank, Suit};
use two_hundred_server::ws::protocol::{ClientEvent, ServerEvent};

#[test]
fn play_card_decodes_from_snake_case_tag() {
    let raw = r#"{"type":"play_card","gameId":"g1","card":"hearts-10"}"#;
    let event: ClientEvent = serde_json::from_str(raw).unwrap();
    match event {
        ClientEvent::PlayCard { game_id, card } => {
            assert_eq!(game_id, "g1");
            assert_eq!(card, Card::new(Suit::Hearts, Rank::Ten));
        }
        other => panic!("expected PlayCard, got {other:?}"),
    }
}

#[test]
fn join_table_password_is_optional() {
    let raw = r#"{"type":"join_table","tableId":"t1"}"#;
    let event: ClientEvent = serde_json::from_str(raw).unwrap();
    assert!(matches!(event, ClientEvent::JoinTable { table_id, password } if table_id == "t1" && password.is_none()));
}

#[test]
fn create_table_flattens_table_options_alongside_name() {
    let raw = r#"{"type":"create_table","tableId":"t1","tableName":"Alice's Table","hasKitty":true,"deckVariant":"40"}"#;
    let event: ClientEvent = serde_json::from_str(raw).unwrap();
    match event {
        ClientEvent::CreateTable { table_id, table_name, options } => {
            assert_eq!(table_id, "t1");
            assert_eq!(table_name, "Alice's Table");
            assert_eq!(options.has_kitty, Some(true));
        }
        other => panic!("expected CreateTable, got {other:?}"),
    }
}

#[test]
fn unknown_event_type_is_rejected() {
    let raw = r#"{"type":"teleport","tableId":"t1"}"#;
    assert!(serde_json::from_str::<ClientEvent>(raw).is_err());
}

#[test]
fn error_event_serializes_with_tag_and_optional_code() {
    let event = ServerEvent::Error {
        message: "not your turn".to_string(),
        code: Some("NOT_YOUR_TURN"),
        phase: None,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "error");
    assert_eq!(json["message"], "not your turn");
    assert_eq!(json["code"], "NOT_YOUR_TURN");
}

#[test]
fn card_wire_format_is_suit_dash_rank() {
    let card = Card::new(Suit::Spades, Rank::Ace);
    assert_eq!(serde_json::to_string(&card).unwrap(), "\"spades-A\"");
}
