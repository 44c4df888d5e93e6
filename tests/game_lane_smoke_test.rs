//! End-to-end smoke test for a game lane: spawn with four bots and a
//! score target reachable in one round, then watch it run itself to
//! completion with pacing disabled. No client ever sends a command —
//! `run_bot_turns` drives the whole round.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use two_hundred_server::domain::game::Phase;
use two_hundred_server::services::dispatcher::Dispatcher;
use two_hundred_server::services::game_lane;
use two_hundred_server::services::pacing::Pacing;
use two_hundred_server::state::transcript_store::TranscriptStore;
use two_hundred_server::ws::hub::RoomRegistry;

#[tokio::test]
async fn four_bot_game_runs_to_completion_and_closes_transcript() {
    let mut game = common::bot_game(7);
    game.score_target = 1; // any settled round ends the game
    let game_id = game.id.clone();

    let hub = Arc::new(RoomRegistry::new());
    let dispatcher = Arc::new(Dispatcher::new(hub));
    let transcripts = Arc::new(TranscriptStore::default());
    let pacing = Pacing::new(true); // integration mode, no sleeps

    let finished = Arc::new(AtomicBool::new(false));
    let finished_in_callback = finished.clone();

    let handle = game_lane::spawn(
        game,
        "Smoke Table".to_string(),
        dispatcher,
        transcripts.clone(),
        pacing,
        move |_table_id, _game_id| {
            finished_in_callback.store(true, Ordering::SeqCst);
        },
    );
    assert_eq!(handle.game_id, game_id);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !finished.load(Ordering::SeqCst) && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(finished.load(Ordering::SeqCst), "lane never called on_finish within 5s");

    let transcript = transcripts.get(&game_id).expect("transcript must exist for a started game");
    assert!(transcript.end_time_ms.is_some());
    assert!(!transcript.entries.is_empty());
    let last = transcript.entries.last().unwrap();
    assert_eq!(last.snapshot.phase, Phase::Finished);
    assert!(last.snapshot.team_scores[0].abs() >= 1 || last.snapshot.team_scores[1].abs() >= 1);
}
