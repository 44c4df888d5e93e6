//! Lobby/table registry: lobby id -> table ids, and the table store
//! itself. §2.4. Table/game CRUD lives here; the engine modules
//! (`domain::bidding`, `domain::tricks`, ...) own in-game mutation.

use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};

use crate::domain::deck::DeckVariant;
use crate::domain::player::{BotSkill, Player};
use crate::domain::table::Table;
use crate::errors::domain::DomainError;

/// Wire-safe view of a `Table`: drops the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub id: String,
    pub name: String,
    pub max_seats: u8,
    pub seats: Vec<Option<Player>>,
    pub live_game_id: Option<String>,
    pub is_private: bool,
    pub creator_name: String,
    pub timeout_budget_ms: u64,
    pub deck_variant: DeckVariant,
    pub score_target: i32,
    pub kitty_enabled: bool,
    pub allow_point_card_discards: bool,
    pub enforce_opposing_team_bid_rule: bool,
    pub spectator_count: usize,
}

impl From<&Table> for TableSummary {
    fn from(t: &Table) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            max_seats: t.max_seats,
            seats: t.seats.clone(),
            live_game_id: t.live_game_id.clone(),
            is_private: t.is_private,
            creator_name: t.creator_name.clone(),
            timeout_budget_ms: t.timeout_budget_ms,
            deck_variant: t.deck_variant,
            score_target: t.score_target,
            kitty_enabled: t.kitty_enabled,
            allow_point_card_discards: t.allow_point_card_discards,
            enforce_opposing_team_bid_rule: t.enforce_opposing_team_bid_rule,
            spectator_count: t.spectators.len(),
        }
    }
}

/// Creator-supplied table options, all optional so callers only set what
/// they mean to override from `Table::new`'s defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOptions {
    pub timeout_duration_ms: Option<u64>,
    pub deck_variant: Option<DeckVariant>,
    pub score_target: Option<i32>,
    pub has_kitty: Option<bool>,
    pub allow_point_card_discards: Option<bool>,
    pub enforce_opposing_team_bid_rule: Option<bool>,
    pub is_private: Option<bool>,
    pub password: Option<String>,
}

fn apply_options(table: &mut Table, opts: &TableOptions) -> Result<(), DomainError> {
    if let Some(v) = opts.timeout_duration_ms {
        table.timeout_budget_ms = v;
    }
    if let Some(v) = opts.deck_variant {
        table.deck_variant = v;
    }
    if let Some(v) = opts.score_target {
        table.score_target = v;
    }
    if let Some(v) = opts.has_kitty {
        table.kitty_enabled = v;
    }
    if let Some(v) = opts.allow_point_card_discards {
        table.allow_point_card_discards = v;
    }
    if let Some(v) = opts.enforce_opposing_team_bid_rule {
        table.enforce_opposing_team_bid_rule = v;
    }
    if let Some(v) = opts.is_private {
        table.is_private = v;
    }
    if opts.password.is_some() {
        table.password = opts.password.clone();
    }
    if table.kitty_enabled && table.deck_variant != DeckVariant::Forty {
        return Err(DomainError::legality("kitty requires the 40-card deck variant"));
    }
    Ok(())
}

pub struct TableRegistry {
    lobbies: DashMap<String, DashSet<String>>,
    tables: DashMap<String, Table>,
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRegistry {
    pub fn new() -> Self {
        Self {
            lobbies: DashMap::new(),
            tables: DashMap::new(),
        }
    }

    pub fn tables_in_lobby(&self, lobby_id: &str) -> Vec<TableSummary> {
        let Some(ids) = self.lobbies.get(lobby_id) else {
            return Vec::new();
        };
        ids.iter()
            .filter_map(|id| self.tables.get(id.as_str()).map(|t| TableSummary::from(&*t)))
            .collect()
    }

    pub fn get_summary(&self, table_id: &str) -> Option<TableSummary> {
        self.tables.get(table_id).map(|t| TableSummary::from(&*t))
    }

    pub fn with_table<R>(&self, table_id: &str, f: impl FnOnce(&Table) -> R) -> Option<R> {
        self.tables.get(table_id).map(|t| f(&t))
    }

    fn insert_new_table(
        &self,
        lobby_id: &str,
        table_id: &str,
        table_name: &str,
        creator_name: &str,
        opts: TableOptions,
    ) -> Result<(), DomainError> {
        if self.tables.contains_key(table_id) {
            return Err(DomainError::state("table already exists"));
        }
        let mut table = Table::new(table_id, table_name, creator_name);
        apply_options(&mut table, &opts)?;
        self.tables.insert(table_id.to_string(), table);
        self.lobbies
            .entry(lobby_id.to_string())
            .or_default()
            .insert(table_id.to_string());
        Ok(())
    }

    pub fn create_table(
        &self,
        lobby_id: &str,
        table_id: &str,
        table_name: &str,
        creator_id: &str,
        creator_name: &str,
        opts: TableOptions,
    ) -> Result<TableSummary, DomainError> {
        self.insert_new_table(lobby_id, table_id, table_name, creator_name, opts)?;
        let mut table = self.tables.get_mut(table_id).expect("just inserted");
        table.seats[0] = Some(Player::new_human(creator_id, creator_name, 0));
        Ok(TableSummary::from(&*table))
    }

    pub fn update_config(
        &self,
        table_id: &str,
        creator_name: &str,
        opts: TableOptions,
    ) -> Result<TableSummary, DomainError> {
        let mut table = self
            .tables
            .get_mut(table_id)
            .ok_or_else(|| DomainError::identity("unknown table"))?;
        require_creator(&table, creator_name)?;
        require_pre_game(&table)?;
        apply_options(&mut table, &opts)?;
        Ok(TableSummary::from(&*table))
    }

    pub fn join_table(
        &self,
        table_id: &str,
        player_id: &str,
        display_name: &str,
        password: Option<&str>,
    ) -> Result<(TableSummary, u8), DomainError> {
        let mut table = self
            .tables
            .get_mut(table_id)
            .ok_or_else(|| DomainError::identity("unknown table"))?;
        if table.is_private && table.password.as_deref() != password {
            return Err(DomainError::precondition("wrong password"));
        }
        let seat = table
            .lowest_empty_seat()
            .ok_or_else(|| DomainError::state("table is full"))?;
        table.seats[seat as usize] = Some(Player::new_human(player_id, display_name, seat));
        Ok((TableSummary::from(&*table), seat))
    }

    pub fn join_as_spectator(&self, table_id: &str, spectator_id: &str) -> Result<TableSummary, DomainError> {
        let mut table = self
            .tables
            .get_mut(table_id)
            .ok_or_else(|| DomainError::identity("unknown table"))?;
        if table.is_private || !table.has_live_game() {
            return Err(DomainError::precondition("cannot spectate this table"));
        }
        table.spectators.push(spectator_id.to_string());
        Ok(TableSummary::from(&*table))
    }

    pub fn add_bot(
        &self,
        table_id: &str,
        creator_name: &str,
        position: u8,
        skill: BotSkill,
    ) -> Result<TableSummary, DomainError> {
        let mut table = self
            .tables
            .get_mut(table_id)
            .ok_or_else(|| DomainError::identity("unknown table"))?;
        require_creator(&table, creator_name)?;
        require_pre_game(&table)?;
        let slot = table
            .seats
            .get_mut(position as usize)
            .ok_or_else(|| DomainError::state("no such seat position"))?;
        if slot.is_some() {
            return Err(DomainError::state("position occupied"));
        }
        *slot = Some(Player::new_bot(
            format!("bot-{table_id}-{position}"),
            bot_display_name(position),
            position,
            skill,
        ));
        Ok(TableSummary::from(&*table))
    }

    pub fn remove_bot(&self, table_id: &str, creator_name: &str, position: u8) -> Result<TableSummary, DomainError> {
        let mut table = self
            .tables
            .get_mut(table_id)
            .ok_or_else(|| DomainError::identity("unknown table"))?;
        require_creator(&table, creator_name)?;
        require_pre_game(&table)?;
        let slot = table
            .seats
            .get_mut(position as usize)
            .ok_or_else(|| DomainError::state("no such seat position"))?;
        match slot {
            Some(p) if p.is_bot => *slot = None,
            Some(_) => return Err(DomainError::state("seat is not a bot")),
            None => return Err(DomainError::state("seat is already empty")),
        }
        Ok(TableSummary::from(&*table))
    }

    pub fn move_player(
        &self,
        table_id: &str,
        creator_name: &str,
        player_id: &str,
        new_position: u8,
    ) -> Result<TableSummary, DomainError> {
        let mut table = self
            .tables
            .get_mut(table_id)
            .ok_or_else(|| DomainError::identity("unknown table"))?;
        require_creator(&table, creator_name)?;
        require_pre_game(&table)?;
        if table
            .seats
            .get(new_position as usize)
            .ok_or_else(|| DomainError::state("no such seat position"))?
            .is_some()
        {
            return Err(DomainError::state("destination seat is occupied"));
        }
        let current_pos = table
            .seats
            .iter()
            .position(|s| s.as_ref().is_some_and(|p| p.id == player_id))
            .ok_or_else(|| DomainError::identity("player not seated at this table"))?;
        let mut player = table.seats[current_pos].take().expect("checked above");
        player.seat = new_position;
        table.seats[new_position as usize] = Some(player);
        Ok(TableSummary::from(&*table))
    }

    /// Marks the table as running `game_id` and returns the seated players
    /// in seat order, required by the caller to build the `Game`.
    pub fn start_game(&self, table_id: &str, creator_name: &str, game_id: &str) -> Result<[Player; 4], DomainError> {
        let mut table = self
            .tables
            .get_mut(table_id)
            .ok_or_else(|| DomainError::identity("unknown table"))?;
        require_creator(&table, creator_name)?;
        require_pre_game(&table)?;
        if !table.is_full() {
            return Err(DomainError::state("table needs exactly 4 seats filled"));
        }
        let seats: Vec<Player> = table.seats.iter().cloned().map(|s| s.expect("checked full")).collect();
        let seats: [Player; 4] = seats.try_into().expect("table is full");
        table.live_game_id = Some(game_id.to_string());
        Ok(seats)
    }

    /// Resets a finished/aborted table to bots-only, per §4.6/§4.8's
    /// "reset the table to contain only bots" cleanup.
    pub fn reset_to_bots_only(&self, table_id: &str) {
        if let Some(mut table) = self.tables.get_mut(table_id) {
            table.clear_to_bots_only();
        }
    }

    pub fn remove_table(&self, lobby_id: &str, table_id: &str) {
        self.tables.remove(table_id);
        if let Some(ids) = self.lobbies.get(lobby_id) {
            ids.remove(table_id);
        }
    }

    /// Removes a seated human (exit or disconnect) before a game has
    /// started. Returns whether the table is now fully empty.
    pub fn remove_player_pre_game(&self, table_id: &str, player_id: &str) -> Option<bool> {
        let mut table = self.tables.get_mut(table_id)?;
        for slot in table.seats.iter_mut() {
            if slot.as_ref().is_some_and(|p| p.id == player_id) {
                *slot = None;
            }
        }
        table.spectators.retain(|s| s != player_id);
        Some(table.occupied_count() == 0 && table.spectators.is_empty())
    }
}

fn require_creator(table: &Table, creator_name: &str) -> Result<(), DomainError> {
    if table.creator_name != creator_name {
        return Err(DomainError::authorization("only the table creator may do this"));
    }
    Ok(())
}

fn require_pre_game(table: &Table) -> Result<(), DomainError> {
    if table.has_live_game() {
        return Err(DomainError::authorization("table already has a game in progress"));
    }
    Ok(())
}

fn bot_display_name(position: u8) -> String {
    const NAMES: [&str; 4] = ["Bramble", "Sprocket", "Juniper", "Tansy"];
    NAMES[position as usize % NAMES.len()].to_string()
}

/// Seeds the well-known public default tables. §6 "Default tables".
pub fn seed_default_tables(registry: &TableRegistry, lobby_id: &str) {
    let presets: [(&str, &str, DeckVariant, bool); 4] = [
        ("standard-table", "Standard Table", DeckVariant::Thirty6, false),
        ("kitty-table", "Kitty Table", DeckVariant::Forty, true),
        ("big-bub", "Big Bub", DeckVariant::Thirty6, false),
        ("acadie", "Acadie", DeckVariant::Forty, true),
    ];
    for (id, name, deck_variant, has_kitty) in presets {
        let opts = TableOptions {
            deck_variant: Some(deck_variant),
            has_kitty: Some(has_kitty),
            ..Default::default()
        };
        if registry
            .insert_new_table(lobby_id, id, name, "table-host", opts)
            .is_err()
        {
            continue;
        }
        for position in 0..4u8 {
            let _ = registry.add_bot(id, "table-host", position, BotSkill::Medium);
        }
    }
}
