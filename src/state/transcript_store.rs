//! Process-wide game-id -> transcript map, capped at `TRANSCRIPT_STORE_CAP`
//! with LRU-by-start-time eviction. §4.10.

use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use serde::Serialize;

use crate::domain::deck::DeckVariant;
use crate::domain::events::GameEvent;
use crate::domain::game::Game;
use crate::domain::rules::TRANSCRIPT_STORE_CAP;
use crate::domain::snapshot::{snapshot_full, GameSnapshot};

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_millis()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptMetadata {
    pub deck_variant: DeckVariant,
    pub score_target: i32,
    pub kitty_enabled: bool,
    pub seat_names: [String; 4],
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    pub timestamp_ms: u128,
    pub kind: &'static str,
    pub snapshot: GameSnapshot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub game_id: String,
    pub table_id: String,
    pub table_name: String,
    pub start_time_ms: u128,
    pub end_time_ms: Option<u128>,
    pub entries: Vec<TranscriptEntry>,
    pub metadata: TranscriptMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSummary {
    pub game_id: String,
    pub table_id: String,
    pub table_name: String,
    pub start_time_ms: u128,
    pub end_time_ms: Option<u128>,
    pub entry_count: usize,
}

impl From<&Transcript> for TranscriptSummary {
    fn from(t: &Transcript) -> Self {
        Self {
            game_id: t.game_id.clone(),
            table_id: t.table_id.clone(),
            table_name: t.table_name.clone(),
            start_time_ms: t.start_time_ms,
            end_time_ms: t.end_time_ms,
            entry_count: t.entries.len(),
        }
    }
}

pub struct TranscriptStore {
    transcripts: DashMap<String, Transcript>,
    cap: usize,
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new(TRANSCRIPT_STORE_CAP)
    }
}

impl TranscriptStore {
    pub fn new(cap: usize) -> Self {
        Self {
            transcripts: DashMap::new(),
            cap,
        }
    }

    fn evict_if_full(&self) {
        if self.transcripts.len() < self.cap {
            return;
        }
        let victim = self
            .transcripts
            .iter()
            .min_by_key(|entry| entry.value().start_time_ms)
            .map(|entry| entry.key().clone());
        if let Some(victim) = victim {
            self.transcripts.remove(&victim);
        }
    }

    /// Opens a transcript for a freshly started game. No-op if one already
    /// exists for this game id (append-only: never re-opened).
    pub fn open(&self, game: &Game, table_name: &str) {
        if self.transcripts.contains_key(&game.id) {
            return;
        }
        self.evict_if_full();
        let seat_names = std::array::from_fn(|i| game.seats[i].display_name.clone());
        self.transcripts.insert(
            game.id.clone(),
            Transcript {
                game_id: game.id.clone(),
                table_id: game.table_id.clone(),
                table_name: table_name.to_string(),
                start_time_ms: now_ms(),
                end_time_ms: None,
                entries: Vec::new(),
                metadata: TranscriptMetadata {
                    deck_variant: game.deck_variant,
                    score_target: game.score_target,
                    kitty_enabled: game.kitty_enabled,
                    seat_names,
                },
            },
        );
    }

    /// Appends one entry for `event`, setting `end_time_ms` when the event
    /// is the game's completion.
    pub fn append(&self, game: &Game, event: &GameEvent) {
        let Some(mut transcript) = self.transcripts.get_mut(&game.id) else {
            return;
        };
        transcript.entries.push(TranscriptEntry {
            timestamp_ms: now_ms(),
            kind: event.kind(),
            snapshot: snapshot_full(game),
        });
        if matches!(event, GameEvent::GameComplete { .. }) {
            transcript.end_time_ms = Some(now_ms());
        }
    }

    /// Marks a transcript closed without a `GameComplete` entry (used for
    /// timeout and exit-driven finishes, which are not scoring events).
    pub fn close(&self, game_id: &str) {
        if let Some(mut transcript) = self.transcripts.get_mut(game_id) {
            if transcript.end_time_ms.is_none() {
                transcript.end_time_ms = Some(now_ms());
            }
        }
    }

    pub fn get(&self, game_id: &str) -> Option<Transcript> {
        self.transcripts.get(game_id).map(|t| t.clone())
    }

    pub fn list_summaries(&self) -> Vec<TranscriptSummary> {
        self.transcripts.iter().map(|e| e.value().into()).collect()
    }

    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::test_game;

    #[test]
    fn append_only_growth_and_end_time_on_completion() {
        let store = TranscriptStore::new(TRANSCRIPT_STORE_CAP);
        let game = test_game();
        store.open(&game, "Table One");
        store.append(&game, &GameEvent::GameStart);
        assert_eq!(store.get(&game.id).unwrap().entries.len(), 1);
        assert!(store.get(&game.id).unwrap().end_time_ms.is_none());

        store.append(&game, &GameEvent::GameComplete { winning_team: 0 });
        let transcript = store.get(&game.id).unwrap();
        assert_eq!(transcript.entries.len(), 2);
        assert!(transcript.end_time_ms.is_some());
    }

    #[test]
    fn cap_evicts_smallest_start_time() {
        let store = TranscriptStore::new(2);
        let mut a = test_game();
        a.id = "a".to_string();
        store.open(&a, "A");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let mut b = test_game();
        b.id = "b".to_string();
        store.open(&b, "B");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let mut c = test_game();
        c.id = "c".to_string();
        store.open(&c, "C");

        assert_eq!(store.len(), 2);
        assert!(store.get("a").is_none());
        assert!(store.get("b").is_some());
        assert!(store.get("c").is_some());
    }
}
