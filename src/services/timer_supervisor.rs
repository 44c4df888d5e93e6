//! Periodic turn-timeout scan over all live games. §4.8. Never mutates a
//! game directly — it only hands an expiry check off to the owning lane,
//! matching §9's "timer supervisor sends expire-messages to lanes".

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use crate::services::game_lane::GameLaneHandle;

const TICK: Duration = Duration::from_secs(1);

pub fn spawn(lanes: Arc<DashMap<String, GameLaneHandle>>) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(TICK).await;
            for entry in lanes.iter() {
                entry.value().check_timeout();
            }
        }
    });
}
