//! Maps a bot's skill tier to the policy instance that plays for it.

use std::sync::Arc;

use crate::ai::advanced::AdvancedPolicy;
use crate::ai::baseline::BaselinePolicy;
use crate::ai::trait_def::BotPolicy;
use crate::domain::player::BotSkill;

/// Returns the shared policy for a skill tier. Policies are stateless
/// (tracking facts are recomputed from `GameView` per call), so one
/// instance per tier can be reused across every bot seat and game.
pub fn policy_for(skill: BotSkill) -> Arc<dyn BotPolicy> {
    match skill {
        BotSkill::Advanced => Arc::new(AdvancedPolicy::new()),
        other => Arc::new(BaselinePolicy::new(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advanced_skill_gets_the_card_tracking_policy() {
        let policy = policy_for(BotSkill::Advanced);
        let _: Arc<dyn BotPolicy> = policy;
    }

    #[test]
    fn other_skills_get_baseline() {
        for skill in [BotSkill::Easy, BotSkill::Medium, BotSkill::Hard] {
            let _ = policy_for(skill);
        }
    }
}
