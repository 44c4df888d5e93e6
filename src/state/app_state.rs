//! Process-wide, in-memory application state. No database: persistence
//! beyond the transcript store is explicitly out of scope.

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::Config;
use crate::services::dispatcher::Dispatcher;
use crate::services::game_lane::GameLaneHandle;
use crate::state::name_registry::NameRegistry;
use crate::state::table_registry::{seed_default_tables, TableRegistry};
use crate::state::transcript_store::TranscriptStore;
use crate::ws::hub::RoomRegistry;

pub const DEFAULT_LOBBY_ID: &str = "default";

pub struct AppState {
    pub config: Config,
    pub lobby_id: String,
    pub tables: TableRegistry,
    pub names: NameRegistry,
    pub transcripts: Arc<TranscriptStore>,
    pub hub: Arc<RoomRegistry>,
    pub dispatcher: Arc<Dispatcher>,
    pub lanes: Arc<DashMap<String, GameLaneHandle>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let hub = Arc::new(RoomRegistry::new());
        let dispatcher = Arc::new(Dispatcher::new(hub.clone()));
        let tables = TableRegistry::new();
        seed_default_tables(&tables, DEFAULT_LOBBY_ID);

        Self {
            config,
            lobby_id: DEFAULT_LOBBY_ID.to_string(),
            tables,
            names: NameRegistry::new(),
            transcripts: Arc::new(TranscriptStore::default()),
            hub,
            dispatcher,
            lanes: Arc::new(DashMap::new()),
        }
    }
}
