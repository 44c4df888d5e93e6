//! Cooperative scheduler delays. §5 "Cooperative delays": narrative
//! pacing, not correctness, skippable under `INTEGRATION_TEST`. Never
//! held across a serialization lock that would block another game's lane.

use std::time::Duration;

const BOT_THINK_DELAY: Duration = Duration::from_millis(1000);
const TRICK_CLEAR_DELAY: Duration = Duration::from_millis(2000);
const GAME_END_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    enabled: bool,
}

impl Pacing {
    pub fn new(integration_test: bool) -> Self {
        Self {
            enabled: !integration_test,
        }
    }

    async fn sleep(&self, duration: Duration) {
        if self.enabled {
            tokio::time::sleep(duration).await;
        }
    }

    /// Between a bot's decision being chosen and its commit.
    pub async fn bot_think_delay(&self) {
        self.sleep(BOT_THINK_DELAY).await;
    }

    /// After a completed trick, before clearing the trick area.
    pub async fn trick_delay(&self) {
        self.sleep(TRICK_CLEAR_DELAY).await;
    }

    /// After game end, before resetting the table.
    pub async fn game_end_delay(&self) {
        self.sleep(GAME_END_DELAY).await;
    }
}
