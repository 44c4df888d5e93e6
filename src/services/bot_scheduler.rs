//! Iterative bot-turn scheduler. §4.7, and §9 "Bot recursion to
//! iteration": the source's recursive bot chain is reshaped as a loop on
//! the game lane, stepping once per eligible bot seat and yielding back
//! to the lane as soon as the acting seat is human or the phase ends.

use crate::ai::registry::policy_for;
use crate::ai::trait_def::{BidChoice, GameView};
use crate::domain::cards::Suit;
use crate::domain::events::GameEvent;
use crate::domain::game::{Game, Phase};
use crate::domain::kitty;
use crate::domain::player::BotSkill;
use crate::domain::tricks;
use crate::services::dispatcher::Dispatcher;
use crate::services::pacing::Pacing;
use crate::state::transcript_store::TranscriptStore;

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

/// Drives consecutive bot turns to quiescence: stops as soon as the
/// current seat is human, the phase is not one a bot acts in, or a bot
/// decision fails to apply (treated as "nothing more this bot can do"
/// rather than panicking the lane).
pub async fn run_bot_turns(game: &mut Game, dispatcher: &Dispatcher, transcripts: &TranscriptStore, pacing: &Pacing) {
    loop {
        if game.phase == Phase::Finished {
            return;
        }
        let seat = game.current_player;
        if !game.seat(seat).is_bot {
            return;
        }
        let skill = game.seat(seat).bot_skill.unwrap_or(BotSkill::Medium);

        let events = match game.phase {
            Phase::Bidding => {
                if game.passed.contains(&seat) {
                    return;
                }
                let policy = policy_for(skill);
                let choice = {
                    let view = GameView::new(game, seat);
                    policy.choose_bid(&view).unwrap_or(BidChoice::Pass)
                };
                pacing.bot_think_delay().await;
                match crate::ai::baseline::apply_bid_choice(game, seat, choice) {
                    Ok(events) => events,
                    Err(_) => return,
                }
            }
            Phase::Kitty => {
                let Some(bid) = game.current_bid else {
                    return;
                };
                let bid_suit = bid.suit.unwrap_or(Suit::Hearts);
                pacing.bot_think_delay().await;
                let mut events = match kitty::take_kitty(game, seat) {
                    Ok(events) => events,
                    Err(_) => return,
                };
                let discards = kitty::choose_bot_discards(game, seat, bid_suit);
                match kitty::discard_to_kitty(game, seat, discards, bid_suit) {
                    Ok(more) => {
                        events.extend(more);
                        events
                    }
                    Err(_) => return,
                }
            }
            Phase::Playing => {
                let policy = policy_for(skill);
                let card = {
                    let view = GameView::new(game, seat);
                    match policy.choose_play(&view) {
                        Ok(card) => card,
                        Err(_) => return,
                    }
                };
                pacing.bot_think_delay().await;
                match tricks::play_card(game, seat, card) {
                    Ok(events) => events,
                    Err(_) => return,
                }
            }
            Phase::Waiting | Phase::Finished => return,
        };

        emit(game, &events, dispatcher, transcripts);
        pace_after(&events, pacing).await;
    }
}
