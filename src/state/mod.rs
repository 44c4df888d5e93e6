//! Shared in-memory state: the lobby/table registry, name registry,
//! transcript store, and the top-level `AppState` that wires them
//! together with the event dispatcher and live game lanes.

pub mod app_state;
pub mod name_registry;
pub mod table_registry;
pub mod transcript_store;

pub use app_state::AppState;
