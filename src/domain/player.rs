//! Player and bot-skill types shared by tables and games.

use serde::{Deserialize, Serialize};

use crate::domain::cards::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotSkill {
    Easy,
    Medium,
    Hard,
    Advanced,
}

impl BotSkill {
    /// Aggressiveness offset applied when a baseline bot estimates its
    /// bid ceiling (hard and advanced share the same offset; advanced
    /// additionally switches to the card-tracking policy).
    pub fn aggressiveness_offset(self) -> u16 {
        match self {
            BotSkill::Easy => 5,
            BotSkill::Medium => 10,
            BotSkill::Hard | BotSkill::Advanced => 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub display_name: String,
    pub is_bot: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_skill: Option<BotSkill>,
    pub seat: u8,
    #[serde(skip)]
    pub hand: Vec<Card>,
    pub ready: bool,
    #[serde(default)]
    pub spectator: bool,
}

impl Player {
    pub fn new_human(id: impl Into<String>, display_name: impl Into<String>, seat: u8) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            is_bot: false,
            bot_skill: None,
            seat,
            hand: Vec::new(),
            ready: true,
            spectator: false,
        }
    }

    pub fn new_bot(id: impl Into<String>, display_name: impl Into<String>, seat: u8, skill: BotSkill) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            is_bot: true,
            bot_skill: Some(skill),
            seat,
            hand: Vec::new(),
            ready: true,
            spectator: false,
        }
    }
}
