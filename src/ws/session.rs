//! Per-connection actor. One `GameWsSession` per socket; it owns no game
//! state itself, only the connection's evolving identity (player id,
//! display name, seat/table/game it is currently attached to) and talks
//! to `AppState`'s registries and game lanes to do anything useful.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::lobby;
use crate::state::app_state::AppState;
use crate::ws::hub::Push;
use crate::ws::protocol::{ClientEvent, ServerEvent};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(req: HttpRequest, stream: web::Payload, state: web::Data<Arc<AppState>>) -> Result<HttpResponse, Error> {
    let session = GameWsSession::new(state.get_ref().clone());
    ws::start(session, &req, stream)
}

/// Where this connection currently sits: nowhere yet, at a pre-game
/// table, or seated in a live game. A connection can be a spectator at
/// either a pre-game table or a live one.
#[derive(Clone)]
enum Attachment {
    None,
    Table { table_id: String, spectator: bool },
    Game { table_id: String, game_id: String, seat: Option<u8> },
}

pub struct GameWsSession {
    conn_id: Uuid,
    player_id: String,
    display_name: Option<String>,
    state: Arc<AppState>,
    attachment: Attachment,
    last_heartbeat: Instant,
}

impl GameWsSession {
    fn new(state: Arc<AppState>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            player_id: Uuid::new_v4().to_string(),
            display_name: None,
            state,
            attachment: Attachment::None,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerEvent) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound event"),
        }
    }

    fn send_error(ctx: &mut ws::WebsocketContext<Self>, message: impl Into<String>, code: Option<&'static str>) {
        Self::send_json(
            ctx,
            &ServerEvent::Error {
                message: message.into(),
                code,
                phase: None,
            },
        );
    }

    fn send_domain_error(ctx: &mut ws::WebsocketContext<Self>, err: &crate::errors::domain::DomainError) {
        Self::send_json(
            ctx,
            &ServerEvent::Error {
                message: err.message.clone(),
                code: Some(err.code.unwrap_or_else(|| err.kind.as_str())),
                phase: err.phase,
            },
        );
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    /// Joins the rooms this attachment implies, after leaving whatever it
    /// was in before. The hub does not track a connection's own
    /// membership, so the session is the source of truth for that.
    fn rejoin_rooms(&mut self, ctx: &mut ws::WebsocketContext<Self>, attachment: Attachment) {
        self.state.hub.leave_all(&self.conn_id);
        let recipient = ctx.address().recipient::<Push>();
        match &attachment {
            Attachment::None => {}
            Attachment::Table { table_id, .. } => {
                self.state.hub.join(&format!("table-{table_id}"), self.conn_id, recipient, None);
            }
            Attachment::Game { table_id, game_id, seat } => {
                if let Some(seat) = seat {
                    self.state
                        .hub
                        .join(&format!("game-{game_id}"), self.conn_id, recipient, Some(*seat));
                } else {
                    self.state
                        .hub
                        .join(&format!("spectator-{table_id}"), self.conn_id, recipient, None);
                }
            }
        }
        self.attachment = attachment;
    }

    fn handle_client_event(&mut self, event: ClientEvent, ctx: &mut ws::WebsocketContext<Self>) {
        match event {
            ClientEvent::JoinLobby { player_name, lobby_id: _ } => {
                self.display_name = Some(player_name.clone());
                let tables = lobby::join_lobby(&self.state, &player_name);
                Self::send_json(
                    ctx,
                    &ServerEvent::LobbyJoined {
                        lobby_id: self.state.lobby_id.clone(),
                        tables,
                    },
                );
            }
            ClientEvent::CreateTable {
                table_id,
                table_name,
                options,
            } => {
                let Some(name) = self.display_name.clone() else {
                    Self::send_error(ctx, "join the lobby first", None);
                    return;
                };
                match lobby::create_table(&self.state, &table_id, &table_name, &self.player_id, &name, options) {
                    Ok(table) => {
                        self.rejoin_rooms(
                            ctx,
                            Attachment::Table {
                                table_id: table_id.clone(),
                                spectator: false,
                            },
                        );
                        Self::send_json(ctx, &ServerEvent::TableJoined { table, seat: 0 });
                    }
                    Err(err) => Self::send_domain_error(ctx, &err),
                }
            }
            ClientEvent::JoinTable { table_id, password } => {
                let Some(name) = self.display_name.clone() else {
                    Self::send_error(ctx, "join the lobby first", None);
                    return;
                };
                match lobby::join_table(&self.state, &table_id, &self.player_id, &name, password.as_deref()) {
                    Ok((table, seat)) => {
                        self.rejoin_rooms(
                            ctx,
                            Attachment::Table {
                                table_id: table_id.clone(),
                                spectator: false,
                            },
                        );
                        self.state.dispatcher.table_updated(&table_id, table.clone());
                        Self::send_json(ctx, &ServerEvent::PlayerJoinedTable { table, seat });
                        let state = self.state.clone();
                        let table_id_for_autostart = table_id.clone();
                        ctx.spawn(
                            async move { lobby::maybe_auto_start(&state, &table_id_for_autostart) }
                                .into_actor(self)
                                .map(|_, _, _| ()),
                        );
                    }
                    Err(err) => Self::send_domain_error(ctx, &err),
                }
            }
            ClientEvent::JoinAsSpectator { table_id } => match lobby::join_as_spectator(&self.state, &table_id, &self.player_id) {
                Ok(table) => {
                    self.rejoin_rooms(
                        ctx,
                        Attachment::Table {
                            table_id: table_id.clone(),
                            spectator: true,
                        },
                    );
                    if let Some(game_id) = table.live_game_id.clone() {
                        self.attachment = Attachment::Game {
                            table_id: table_id.clone(),
                            game_id,
                            seat: None,
                        };
                        let recipient = ctx.address().recipient::<Push>();
                        self.state.hub.join(&format!("spectator-{table_id}"), self.conn_id, recipient, None);
                    }
                    Self::send_json(
                        ctx,
                        &ServerEvent::SpectatorJoined {
                            table_id,
                            spectator_id: self.player_id.clone(),
                        },
                    );
                }
                Err(err) => Self::send_domain_error(ctx, &err),
            },
            ClientEvent::AddBot { table_id, position, skill } => {
                let Some(name) = self.display_name.clone() else {
                    Self::send_error(ctx, "join the lobby first", None);
                    return;
                };
                let skill = skill.unwrap_or(crate::domain::player::BotSkill::Medium);
                match lobby::add_bot(&self.state, &table_id, &name, position, skill) {
                    Ok(table) => {
                        self.state.dispatcher.table_updated(&table_id, table.clone());
                        Self::send_json(ctx, &ServerEvent::TableUpdated { table });
                    }
                    Err(err) => Self::send_domain_error(ctx, &err),
                }
            }
            ClientEvent::RemoveBot { table_id, position } => {
                let Some(name) = self.display_name.clone() else {
                    Self::send_error(ctx, "join the lobby first", None);
                    return;
                };
                match lobby::remove_bot(&self.state, &table_id, &name, position) {
                    Ok(table) => {
                        self.state.dispatcher.table_updated(&table_id, table.clone());
                        Self::send_json(ctx, &ServerEvent::TableUpdated { table });
                    }
                    Err(err) => Self::send_domain_error(ctx, &err),
                }
            }
            ClientEvent::MovePlayer { table_id, new_position } => {
                let Some(name) = self.display_name.clone() else {
                    Self::send_error(ctx, "join the lobby first", None);
                    return;
                };
                match lobby::move_player(&self.state, &table_id, &name, &self.player_id, new_position) {
                    Ok(table) => {
                        self.state.dispatcher.table_updated(&table_id, table.clone());
                        Self::send_json(ctx, &ServerEvent::TableUpdated { table });
                    }
                    Err(err) => Self::send_domain_error(ctx, &err),
                }
            }
            ClientEvent::UpdateTableConfig { table_id, options } => {
                let Some(name) = self.display_name.clone() else {
                    Self::send_error(ctx, "join the lobby first", None);
                    return;
                };
                match lobby::update_table_config(&self.state, &table_id, &name, options) {
                    Ok(table) => {
                        self.state.dispatcher.table_updated(&table_id, table.clone());
                        Self::send_json(ctx, &ServerEvent::TableUpdated { table });
                    }
                    Err(err) => Self::send_domain_error(ctx, &err),
                }
            }
            ClientEvent::StartGame { table_id } => {
                let Some(name) = self.display_name.clone() else {
                    Self::send_error(ctx, "join the lobby first", None);
                    return;
                };
                match lobby::start_game(self.state.clone(), &table_id, &name) {
                    Ok(handle) => {
                        self.rejoin_rooms(
                            ctx,
                            Attachment::Game {
                                table_id: table_id.clone(),
                                game_id: handle.game_id.clone(),
                                seat: self.seat_at(&table_id),
                            },
                        );
                    }
                    Err(err) => Self::send_domain_error(ctx, &err),
                }
            }
            ClientEvent::MakeBid { game_id, points, suit } => {
                self.with_seat(ctx, move |state, seat| {
                    let handle = state.lanes.get(&game_id).map(|e| e.value().clone());
                    async move {
                        match handle {
                            Some(h) => h.bid(seat, points, suit.unwrap_or(crate::domain::cards::Suit::Spades)).await,
                            None => Err(crate::errors::domain::DomainError::identity("unknown game")),
                        }
                    }
                });
            }
            ClientEvent::TakeKitty { game_id } => {
                self.with_seat(ctx, move |state, seat| {
                    let handle = state.lanes.get(&game_id).map(|e| e.value().clone());
                    async move {
                        match handle {
                            Some(h) => h.take_kitty(seat).await,
                            None => Err(crate::errors::domain::DomainError::identity("unknown game")),
                        }
                    }
                });
            }
            ClientEvent::DiscardToKitty { game_id, cards, trump_suit } => {
                self.with_seat(ctx, move |state, seat| {
                    let handle = state.lanes.get(&game_id).map(|e| e.value().clone());
                    async move {
                        match handle {
                            Some(h) => h.discard_to_kitty(seat, cards, trump_suit).await,
                            None => Err(crate::errors::domain::DomainError::identity("unknown game")),
                        }
                    }
                });
            }
            ClientEvent::PlayCard { game_id, card } => {
                self.with_seat(ctx, move |state, seat| {
                    let handle = state.lanes.get(&game_id).map(|e| e.value().clone());
                    async move {
                        match handle {
                            Some(h) => h.play_card(seat, card).await,
                            None => Err(crate::errors::domain::DomainError::identity("unknown game")),
                        }
                    }
                });
            }
            ClientEvent::ExitGame { game_id, player_name: _ } => {
                let Some(seat) = self.current_seat() else {
                    Self::send_error(ctx, "not seated in a game", None);
                    return;
                };
                let state = self.state.clone();
                ctx.spawn(
                    async move { lobby::exit_game(&state, &game_id, seat).await }
                        .into_actor(self)
                        .map(|res, _actor, ctx| {
                            if let Err(err) = res {
                                Self::send_domain_error(ctx, &err);
                            }
                        }),
                );
            }
            ClientEvent::GetGameTranscript { game_id } => match self.state.transcripts.get(&game_id) {
                Some(transcript) => Self::send_json(ctx, &ServerEvent::GameTranscript { transcript }),
                None => Self::send_error(ctx, "no transcript for that game", None),
            },
            ClientEvent::GetAllTranscripts {} => {
                let transcripts = self.state.transcripts.list_summaries();
                Self::send_json(ctx, &ServerEvent::AllTranscripts { transcripts });
            }
        }
    }

    fn seat_at(&self, table_id: &str) -> Option<u8> {
        let summary = self.state.tables.get_summary(table_id)?;
        summary.seats.iter().enumerate().find_map(|(idx, seat)| match seat {
            Some(p) if p.id == self.player_id => Some(idx as u8),
            _ => None,
        })
    }

    fn current_seat(&self) -> Option<u8> {
        match &self.attachment {
            Attachment::Game { seat, .. } => *seat,
            _ => None,
        }
    }

    /// Runs a seat-scoped game action, replying with an `Error` event if
    /// this connection isn't seated in the named game.
    fn with_seat<F, Fut>(&mut self, ctx: &mut ws::WebsocketContext<Self>, f: F)
    where
        F: FnOnce(Arc<AppState>, u8) -> Fut + 'static,
        Fut: std::future::Future<Output = Result<(), crate::errors::domain::DomainError>> + 'static,
    {
        let Some(seat) = self.current_seat() else {
            Self::send_error(ctx, "not seated in that game", None);
            return;
        };
        let state = self.state.clone();
        ctx.spawn(f(state, seat).into_actor(self).map(|res, _actor, ctx| {
            if let Err(err) = res {
                Self::send_domain_error(ctx, &err);
            }
        }));
    }
}

impl Actor for GameWsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.state.hub.leave_all(&self.conn_id);
        match &self.attachment {
            Attachment::Table { table_id, spectator: false } => {
                lobby::remove_player_pre_game(&self.state, table_id, &self.player_id);
            }
            Attachment::Game { game_id, seat: Some(seat), .. } => {
                let state = self.state.clone();
                let game_id = game_id.clone();
                let seat = *seat;
                actix::spawn(async move {
                    let _ = lobby::exit_game(&state, &game_id, seat).await;
                });
            }
            _ => {}
        }
        info!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

impl Handler<Push> for GameWsSession {
    type Result = ();

    /// Connections left sitting in the table room when a game starts
    /// (everyone but whichever session triggered the start) reconcile
    /// their own room membership here, off the `table_updated` push
    /// `lobby::start_game` sends on every live-game transition.
    fn handle(&mut self, msg: Push, ctx: &mut Self::Context) {
        if let ServerEvent::TableUpdated { table } = &msg.0 {
            let reconcile = match &self.attachment {
                Attachment::Table { table_id, spectator } if table_id == &table.id => {
                    table.live_game_id.clone().map(|game_id| (game_id, *spectator))
                }
                _ => None,
            };
            if let Some((game_id, spectator)) = reconcile {
                let seat = if spectator { None } else { self.seat_at(&table.id) };
                let table_id = table.id.clone();
                self.rejoin_rooms(ctx, Attachment::Game { table_id, game_id, seat });
            }
        }
        Self::send_json(ctx, &msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameWsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => self.handle_client_event(event, ctx),
                    Err(err) => Self::send_error(ctx, format!("malformed event: {err}"), None),
                }
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(_) => {}
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] protocol error");
                ctx.stop();
            }
        }
    }
}
