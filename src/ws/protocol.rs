//! Typed inbound/outbound event catalogue. §6.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, Suit};
use crate::domain::game::Phase;
use crate::domain::player::BotSkill;
use crate::domain::snapshot::GameSnapshot;
use crate::state::table_registry::{TableOptions, TableSummary};
use crate::state::transcript_store::{Transcript, TranscriptSummary};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    JoinLobby {
        player_name: String,
        lobby_id: Option<String>,
    },
    CreateTable {
        table_id: String,
        table_name: String,
        #[serde(flatten)]
        options: TableOptions,
    },
    JoinTable {
        table_id: String,
        password: Option<String>,
    },
    JoinAsSpectator {
        table_id: String,
    },
    AddBot {
        table_id: String,
        position: u8,
        skill: Option<BotSkill>,
    },
    RemoveBot {
        table_id: String,
        position: u8,
    },
    MovePlayer {
        table_id: String,
        new_position: u8,
    },
    StartGame {
        table_id: String,
    },
    UpdateTableConfig {
        table_id: String,
        #[serde(flatten)]
        options: TableOptions,
    },
    MakeBid {
        game_id: String,
        points: u16,
        suit: Option<Suit>,
    },
    TakeKitty {
        game_id: String,
    },
    DiscardToKitty {
        game_id: String,
        cards: Vec<Card>,
        trump_suit: Suit,
    },
    PlayCard {
        game_id: String,
        card: Card,
    },
    ExitGame {
        game_id: String,
        player_name: String,
    },
    GetGameTranscript {
        game_id: String,
    },
    GetAllTranscripts {},
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    LobbyJoined { lobby_id: String, tables: Vec<TableSummary> },
    LobbyUpdated { tables: Vec<TableSummary> },
    TableJoined { table: TableSummary, seat: u8 },
    TableUpdated { table: TableSummary },
    TableLeft { table_id: String },
    TableDeleted { table_id: String },
    PlayerJoinedTable { table: TableSummary, seat: u8 },
    PlayerLeftTable { table: TableSummary },
    SpectatorJoined { table_id: String, spectator_id: String },
    SpectatorLeft { table_id: String, spectator_id: String },
    GameStarted { game: GameSnapshot },
    GameUpdated { game: GameSnapshot },
    BidMade { game: GameSnapshot, seat: u8, points: u16, suit: Option<Suit> },
    CardPlayed { game: GameSnapshot, seat: u8, card: Card },
    TrickCompleted { game: GameSnapshot, winner: u8, points: u32 },
    RoundCompleted { game: GameSnapshot, team_score_delta: [i32; 2] },
    GameEnded { game: GameSnapshot, winning_team: u8 },
    GameEndedForSpectator { game: GameSnapshot, winning_team: u8 },
    PlayerExitedGame { game: GameSnapshot, seat: u8 },
    GameTimeout { game: GameSnapshot, seat: u8 },
    GameTranscript { transcript: Transcript },
    AllTranscripts { transcripts: Vec<TranscriptSummary> },
    Error {
        message: String,
        code: Option<&'static str>,
        phase: Option<Phase>,
    },
}
