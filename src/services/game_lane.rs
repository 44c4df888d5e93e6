//! One scheduling lane per game: a tokio task owning the `Game` and
//! draining an inbox, so every mutation to that game is processed to
//! quiescence before the next is started. §5, §9 "Per-game serialization
//! without global locks".

use tokio::sync::{mpsc, oneshot};

use crate::domain::bidding;
use crate::domain::cards::{Card, Suit};
use crate::domain::events::GameEvent;
use crate::domain::game::{Game, Phase};
use crate::domain::kitty;
use crate::domain::tricks;
use crate::errors::domain::DomainError;
use crate::services::bot_scheduler::run_bot_turns;
use crate::services::dispatcher::Dispatcher;
use crate::services::pacing::Pacing;
use crate::state::transcript_store::TranscriptStore;

use std::sync::Arc;

pub enum LaneAction {
    Bid { seat: u8, points: u16, suit: Suit },
    Pass { seat: u8 },
    TakeKitty { seat: u8 },
    DiscardToKitty { seat: u8, discards: Vec<Card>, trump: Suit },
    PlayCard { seat: u8, card: Card },
    ExitSeat { seat: u8 },
}

pub struct LaneCommand {
    pub action: LaneAction,
    pub reply: oneshot::Sender<Result<(), DomainError>>,
}

enum Inbox {
    Command(LaneCommand),
    CheckTimeout,
}

/// A cheap, cloneable reference to a running game's lane. Dropping every
/// handle closes the inbox and lets the lane task exit.
#[derive(Clone)]
pub struct GameLaneHandle {
    pub game_id: String,
    pub table_id: String,
    tx: mpsc::Sender<Inbox>,
}

impl GameLaneHandle {
    async fn send(&self, action: LaneAction) -> Result<(), DomainError> {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Inbox::Command(LaneCommand { action, reply })).await.is_err() {
            return Err(DomainError::state("game is no longer running"));
        }
        rx.await.unwrap_or_else(|_| Err(DomainError::state("game is no longer running")))
    }

    pub async fn bid(&self, seat: u8, points: u16, suit: Suit) -> Result<(), DomainError> {
        self.send(LaneAction::Bid { seat, points, suit }).await
    }

    pub async fn pass(&self, seat: u8) -> Result<(), DomainError> {
        self.send(LaneAction::Pass { seat }).await
    }

    pub async fn take_kitty(&self, seat: u8) -> Result<(), DomainError> {
        self.send(LaneAction::TakeKitty { seat }).await
    }

    pub async fn discard_to_kitty(&self, seat: u8, discards: Vec<Card>, trump: Suit) -> Result<(), DomainError> {
        self.send(LaneAction::DiscardToKitty { seat, discards, trump }).await
    }

    pub async fn play_card(&self, seat: u8, card: Card) -> Result<(), DomainError> {
        self.send(LaneAction::PlayCard { seat, card }).await
    }

    pub async fn exit_seat(&self, seat: u8) -> Result<(), DomainError> {
        self.send(LaneAction::ExitSeat { seat }).await
    }

    /// Fire-and-forget: the timer supervisor doesn't wait on a reply, it
    /// just hands expiry checking off to the owning lane.
    pub fn check_timeout(&self) {
        let _ = self.tx.try_send(Inbox::CheckTimeout);
    }
}

fn apply_action(game: &mut Game, action: LaneAction) -> Result<Vec<GameEvent>, DomainError> {
    match action {
        LaneAction::Bid { seat, points, suit } => bidding::bid(game, seat, points, suit),
        LaneAction::Pass { seat } => bidding::pass(game, seat),
        LaneAction::TakeKitty { seat } => kitty::take_kitty(game, seat),
        LaneAction::DiscardToKitty { seat, discards, trump } => kitty::discard_to_kitty(game, seat, discards, trump),
        LaneAction::PlayCard { seat, card } => tricks::play_card(game, seat, card),
        LaneAction::ExitSeat { seat } => {
            if game.phase == Phase::Finished {
                return Ok(Vec::new());
            }
            game.phase = Phase::Finished;
            Ok(vec![GameEvent::PlayerExit { seat }])
        }
    }
}

fn emit(game: &Game, events: &[GameEvent], dispatcher: &Dispatcher, transcripts: &TranscriptStore) {
    for event in events {
        dispatcher.broadcast(game, event);
        transcripts.append(game, event);
    }
}

async fn pace_after(events: &[GameEvent], pacing: &Pacing) {
    if events.iter().any(|e| matches!(e, GameEvent::GameComplete { .. })) {
        pacing.game_end_delay().await;
    } else if events.iter().any(|e| matches!(e, GameEvent::TrickComplete { .. })) {
        pacing.trick_delay().await;
    }
}

/// Spawns the lane task and returns a handle to it. `on_finish` is called
/// exactly once, after the lane has processed its last command, so the
/// caller can deregister the game and reset the table to bots-only.
pub fn spawn<F>(
    mut game: Game,
    table_name: String,
    dispatcher: Arc<Dispatcher>,
    transcripts: Arc<TranscriptStore>,
    pacing: Pacing,
    on_finish: F,
) -> GameLaneHandle
where
    F: FnOnce(String, String) + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Inbox>(64);
    let game_id = game.id.clone();
    let table_id = game.table_id.clone();
    let handle = GameLaneHandle {
        game_id: game_id.clone(),
        table_id: table_id.clone(),
        tx,
    };

    tokio::spawn(async move {
        transcripts.open(&game, &table_name);
        emit(&game, &[GameEvent::GameStart], &dispatcher, &transcripts);
        run_bot_turns(&mut game, &dispatcher, &transcripts, &pacing).await;

        while game.phase != Phase::Finished {
            let Some(item) = rx.recv().await else { break };
            match item {
                Inbox::CheckTimeout => {
                    if check_and_finish_on_timeout(&mut game, &dispatcher, &transcripts).await {
                        break;
                    }
                }
                Inbox::Command(LaneCommand { action, reply }) => {
                    let result = apply_action(&mut game, action);
                    match result {
                        Ok(events) => {
                            emit(&game, &events, &dispatcher, &transcripts);
                            let _ = reply.send(Ok(()));
                            pace_after(&events, &pacing).await;
                            if game.phase == Phase::Finished {
                                transcripts.close(&game.id);
                                break;
                            }
                            run_bot_turns(&mut game, &dispatcher, &transcripts, &pacing).await;
                            if game.phase == Phase::Finished {
                                transcripts.close(&game.id);
                            }
                        }
                        Err(err) => {
                            let _ = reply.send(Err(err));
                        }
                    }
                }
            }
        }

        on_finish(table_id, game_id);
    });

    handle
}

/// Returns true if the check fired a timeout (the caller should stop the
/// lane loop; `on_finish` still runs after the loop exits normally).
async fn check_and_finish_on_timeout(game: &mut Game, dispatcher: &Dispatcher, transcripts: &TranscriptStore) -> bool {
    if game.phase == Phase::Finished {
        return true;
    }
    let Some(started) = game.turn_started_at else {
        return false;
    };
    if (started.elapsed().as_millis() as u64) < game.timeout_budget_ms {
        return false;
    }
    let seat = game.current_player;
    game.phase = Phase::Finished;
    dispatcher.broadcast_timeout(game, seat);
    transcripts.close(&game.id);
    true
}
