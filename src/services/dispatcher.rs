//! Routes domain events to the right audience rooms. §4.9.

use std::sync::Arc;

use crate::domain::events::GameEvent;
use crate::domain::game::Game;
use crate::domain::snapshot::snapshot_for_viewer;
use crate::ws::hub::RoomRegistry;
use crate::ws::protocol::ServerEvent;

fn game_room(game_id: &str) -> String {
    format!("game-{game_id}")
}

fn spectator_room(table_id: &str) -> String {
    format!("spectator-{table_id}")
}

fn table_room(table_id: &str) -> String {
    format!("table-{table_id}")
}

#[derive(Clone, Copy)]
enum Audience {
    Player,
    Spectator,
}

fn to_server_event(game: &Game, event: &GameEvent, viewer_seat: Option<u8>) -> ServerEvent {
    let snap = || snapshot_for_viewer(game, viewer_seat);
    // A room member's audience is whatever seat they actually joined
    // with, not which branch of `game.phase` happened to be current when
    // the event was mutated into existence — the terminal `GameComplete`/
    // `PlayerExit` event is broadcast *after* `phase` has already flipped
    // to `Finished`, so keying audience off phase would make the seated
    // `Player` arm below unreachable.
    let audience = if viewer_seat.is_some() { Audience::Player } else { Audience::Spectator };
    match event {
        GameEvent::GameStart => ServerEvent::GameStarted { game: snap() },
        GameEvent::RoundStart { .. }
        | GameEvent::BidPass { .. }
        | GameEvent::BiddingComplete { .. }
        | GameEvent::KittyPick { .. }
        | GameEvent::KittyDiscard { .. } => ServerEvent::GameUpdated { game: snap() },
        GameEvent::BidMade { bid } => ServerEvent::BidMade {
            game: snap(),
            seat: bid.seat,
            points: bid.points,
            suit: bid.suit,
        },
        GameEvent::CardPlayed { seat, card } => ServerEvent::CardPlayed {
            game: snap(),
            seat: *seat,
            card: *card,
        },
        GameEvent::TrickComplete { winner, points } => ServerEvent::TrickCompleted {
            game: snap(),
            winner: *winner,
            points: *points,
        },
        GameEvent::RoundComplete { team_score_delta } => ServerEvent::RoundCompleted {
            game: snap(),
            team_score_delta: *team_score_delta,
        },
        GameEvent::GameComplete { winning_team } => match audience {
            Audience::Player => ServerEvent::GameEnded {
                game: snap(),
                winning_team: *winning_team,
            },
            Audience::Spectator => ServerEvent::GameEndedForSpectator {
                game: snap(),
                winning_team: *winning_team,
            },
        },
        GameEvent::PlayerExit { seat } => ServerEvent::PlayerExitedGame {
            game: snap(),
            seat: *seat,
        },
    }
}

pub struct Dispatcher {
    hub: Arc<RoomRegistry>,
}

impl Dispatcher {
    pub fn new(hub: Arc<RoomRegistry>) -> Self {
        Self { hub }
    }

    /// §4.9 dispatch rule: every event, including the one that finishes
    /// the game, fans out to the game and spectator rooms — those are
    /// where the actual players and spectators are sitting. Once the lane
    /// exits, `services::lobby`'s `on_finish` hook resets the table and
    /// pushes `table_updated` separately to reconcile table-room bystanders.
    pub fn broadcast(&self, game: &Game, event: &GameEvent) {
        self.hub
            .broadcast_with(&game_room(&game.id), |viewer_seat| to_server_event(game, event, viewer_seat));
        self.hub
            .broadcast_with(&spectator_room(&game.table_id), |_| to_server_event(game, event, None));
    }

    /// Timeouts (§4.8) have no `GameEvent` counterpart — they are not a
    /// transcript-entry kind — so they bypass `broadcast` and are pushed
    /// directly. Called after the lane has already flipped `phase` to
    /// `Finished`, same as the terminal event in `broadcast` above, so
    /// this always targets the live game room rather than branching on
    /// phase.
    pub fn broadcast_timeout(&self, game: &Game, seat: u8) {
        self.hub.broadcast_with(&game_room(&game.id), |viewer_seat| ServerEvent::GameTimeout {
            game: snapshot_for_viewer(game, viewer_seat),
            seat,
        });
        self.hub.broadcast_with(&spectator_room(&game.table_id), |_| ServerEvent::GameTimeout {
            game: snapshot_for_viewer(game, None),
            seat,
        });
    }

    pub fn table_updated(&self, table_id: &str, table: crate::state::table_registry::TableSummary) {
        self.hub
            .broadcast_with(&table_room(table_id), move |_| ServerEvent::TableUpdated { table: table.clone() });
    }
}
