//! Content factory for building battles from data files.

use std::path::{Path, PathBuf};

use battle_core::{Battle, BattleConfig, EntityTemplate, Inventory, Roster, Side};

use crate::loaders::{
    BoardLayout, BoardLoader, ConfigLoader, InventoryLoader, LoadResult, RosterLoader,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── party.ron
/// ├── enemies.ron
/// ├── board.ron
/// └── items.ron      (optional)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the player party from `party.ron`.
    pub fn load_party(&self) -> LoadResult<Vec<EntityTemplate>> {
        RosterLoader::load(&self.data_dir.join("party.ron"))
    }

    /// Load the enemy party from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<Vec<EntityTemplate>> {
        RosterLoader::load(&self.data_dir.join("enemies.ron"))
    }

    /// Load the board layout from `board.ron`.
    pub fn load_board(&self) -> LoadResult<BoardLayout> {
        BoardLoader::load(&self.data_dir.join("board.ron"))
    }

    /// Load the party inventory from `items.ron`, or an empty one when the
    /// file does not exist.
    pub fn load_inventory(&self) -> LoadResult<Inventory> {
        let path = self.data_dir.join("items.ron");
        if !path.exists() {
            return Ok(Inventory::default());
        }
        InventoryLoader::load(&path)
    }

    /// Spawns both parties, players first.
    pub fn build_roster(party: &[EntityTemplate], enemies: &[EntityTemplate]) -> Roster {
        let mut roster = Roster::new();
        for template in party {
            roster.spawn(Side::Player, template);
        }
        for template in enemies {
            roster.spawn(Side::Enemy, template);
        }
        roster
    }

    /// Loads every file and assembles a battle ready for `start`.
    ///
    /// `adjust` may edit the loaded templates (e.g. to hand the player party
    /// to an AI policy) before they are spawned.
    pub fn build_battle(
        &self,
        adjust: impl FnOnce(&mut BattleConfig, &mut Vec<EntityTemplate>, &mut Vec<EntityTemplate>),
    ) -> LoadResult<Battle> {
        let mut config = self.load_config()?;
        let mut party = self.load_party()?;
        let mut enemies = self.load_enemies()?;
        adjust(&mut config, &mut party, &mut enemies);

        let roster = Self::build_roster(&party, &enemies);
        let board = self.load_board()?.build(&roster)?;
        let inventory = self.load_inventory()?;

        tracing::debug!(
            data_dir = %self.data_dir.display(),
            players = party.len(),
            enemies = enemies.len(),
            tiles = board.tiles().len(),
            "battle content loaded"
        );
        Ok(Battle::new(config, roster, board, inventory))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
