//! Orchestration layer: translates inbound lobby/table operations into
//! `TableRegistry` mutations and, for `start_game`, spins up a new game
//! lane. This is the "external collaborator" the engine proper treats as
//! out of scope (§1) wired back in so the process is runnable end to end.

use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::domain::bidding::deal_round;
use crate::domain::game::{Game, Phase, Trick};
use crate::domain::player::BotSkill;
use crate::domain::rules::next_seat;
use crate::errors::domain::DomainError;
use crate::services::game_lane::{self, GameLaneHandle};
use crate::services::pacing::Pacing;
use crate::state::app_state::AppState;
use crate::state::table_registry::{TableOptions, TableSummary};

pub fn join_lobby(state: &AppState, player_name: &str) -> Vec<TableSummary> {
    state.names.reserve(player_name);
    state.tables.tables_in_lobby(&state.lobby_id)
}

pub fn create_table(
    state: &AppState,
    table_id: &str,
    table_name: &str,
    creator_id: &str,
    creator_name: &str,
    opts: TableOptions,
) -> Result<TableSummary, DomainError> {
    state
        .tables
        .create_table(&state.lobby_id, table_id, table_name, creator_id, creator_name, opts)
}

pub fn update_table_config(
    state: &AppState,
    table_id: &str,
    creator_name: &str,
    opts: TableOptions,
) -> Result<TableSummary, DomainError> {
    state.tables.update_config(table_id, creator_name, opts)
}

pub fn join_table(
    state: &AppState,
    table_id: &str,
    player_id: &str,
    display_name: &str,
    password: Option<&str>,
) -> Result<(TableSummary, u8), DomainError> {
    state.names.reserve(display_name);
    state.tables.join_table(table_id, player_id, display_name, password)
}

pub fn join_as_spectator(state: &AppState, table_id: &str, spectator_id: &str) -> Result<TableSummary, DomainError> {
    state.tables.join_as_spectator(table_id, spectator_id)
}

pub fn add_bot(
    state: &AppState,
    table_id: &str,
    creator_name: &str,
    position: u8,
    skill: BotSkill,
) -> Result<TableSummary, DomainError> {
    state.tables.add_bot(table_id, creator_name, position, skill)
}

pub fn remove_bot(state: &AppState, table_id: &str, creator_name: &str, position: u8) -> Result<TableSummary, DomainError> {
    state.tables.remove_bot(table_id, creator_name, position)
}

pub fn move_player(
    state: &AppState,
    table_id: &str,
    creator_name: &str,
    player_id: &str,
    new_position: u8,
) -> Result<TableSummary, DomainError> {
    state.tables.move_player(table_id, creator_name, player_id, new_position)
}

fn build_initial_game(table_id: &str, seats: [crate::domain::player::Player; 4], opts: &TableSummary) -> Game {
    let dealer = 3u8;
    let mut game = Game {
        id: Uuid::new_v4().to_string(),
        table_id: table_id.to_string(),
        seats,
        current_player: next_seat(dealer),
        phase: Phase::Bidding,
        current_bid: None,
        trump: None,
        current_trick: Trick::default(),
        last_trick: None,
        round_tricks: Vec::new(),
        round_no: 1,
        team_scores: [0, 0],
        round_scores: [0, 0],
        dealer,
        spectator_ids: Vec::new(),
        contractor_team: None,
        bidding_passes: 0,
        passed: Default::default(),
        turn_started_at: None,
        timeout_budget_ms: opts.timeout_budget_ms,
        deck_variant: opts.deck_variant,
        score_target: opts.score_target,
        kitty_enabled: opts.kitty_enabled,
        kitty: Vec::new(),
        kitty_discards: Vec::new(),
        kitty_phase_completed: false,
        remaining_deck: Vec::new(),
        completed_rounds: Vec::new(),
        opposing_team_bid: 0,
        allow_point_card_discards: opts.allow_point_card_discards,
        enforce_opposing_team_bid_rule: opts.enforce_opposing_team_bid_rule,
    };
    deal_round(&mut game);
    game.turn_started_at = Some(Instant::now());
    game
}

/// Starts a game for a table with 4 occupied seats, spawning its lane.
/// Used both by the explicit `start_game` event and by `join_table`'s
/// auto-start once the fourth seat fills.
pub fn start_game(state: Arc<AppState>, table_id: &str, creator_name: &str) -> Result<GameLaneHandle, DomainError> {
    let game_id = Uuid::new_v4().to_string();
    let seats = state.tables.start_game(table_id, creator_name, &game_id)?;
    let summary = state
        .tables
        .get_summary(table_id)
        .ok_or_else(|| DomainError::identity("unknown table"))?;
    let table_name = summary.name.clone();
    let mut game = build_initial_game(table_id, seats, &summary);
    game.id = game_id.clone();

    // Tells every connection still sitting in the table room (including
    // the three players who didn't trigger this start) that a game is
    // now live, so each session can move itself into the game/spectator
    // room — see `GameWsSession`'s `Handler<Push>`.
    state.dispatcher.table_updated(table_id, summary);

    let pacing = Pacing::new(state.config.integration_test);
    let state_for_finish = state.clone();
    let handle = game_lane::spawn(
        game,
        table_name,
        state.dispatcher.clone(),
        state.transcripts.clone(),
        pacing,
        move |table_id, game_id| {
            state_for_finish.lanes.remove(&game_id);
            state_for_finish.tables.reset_to_bots_only(&table_id);
            if let Some(summary) = state_for_finish.tables.get_summary(&table_id) {
                state_for_finish.dispatcher.table_updated(&table_id, summary);
            }
        },
    );
    state.lanes.insert(game_id, handle.clone());
    Ok(handle)
}

/// `join_table`'s auto-start: if the table is now full, spin up a game.
/// Errors from this are swallowed into a log line by the caller — a race
/// where the table filled and emptied again is not a client-facing error.
pub fn maybe_auto_start(state: &Arc<AppState>, table_id: &str) -> Option<GameLaneHandle> {
    let summary = state.tables.get_summary(table_id)?;
    if !summary.seats.iter().all(Option::is_some) || summary.live_game_id.is_some() {
        return None;
    }
    start_game(state.clone(), table_id, &summary.creator_name).ok()
}

pub async fn exit_game(state: &AppState, game_id: &str, seat: u8) -> Result<(), DomainError> {
    let handle = state
        .lanes
        .get(game_id)
        .map(|e| e.value().clone())
        .ok_or_else(|| DomainError::identity("unknown game"))?;
    handle.exit_seat(seat).await
}

pub fn remove_player_pre_game(state: &AppState, table_id: &str, player_id: &str) {
    if let Some(now_empty) = state.tables.remove_player_pre_game(table_id, player_id) {
        if now_empty {
            state.tables.remove_table(&state.lobby_id, table_id);
        } else if let Some(summary) = state.tables.get_summary(table_id) {
            state.dispatcher.table_updated(table_id, summary);
        }
    }
}
