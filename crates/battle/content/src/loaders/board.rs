//! Board layout loader.
//!
//! Board files list the tiles with up to two terrain tags each, plus the
//! starting tile of every party slot. Entities are placed in spawn order.

use std::collections::HashSet;
use std::path::Path;

use battle_core::{Board, Roster, Side, TerrainTag, Tile, TileEffects, TileId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One tile as written in a board file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    pub name: String,
    #[serde(default)]
    pub terrain: Vec<TerrainTag>,
}

/// Board structure for RON files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub tiles: Vec<TileSpec>,
    /// Starting tile indices of the player party, in spawn order.
    #[serde(default)]
    pub players: Vec<u32>,
    /// Starting tile indices of the enemy party, in spawn order.
    #[serde(default)]
    pub enemies: Vec<u32>,
}

impl BoardLayout {
    /// Checks tag counts and that every start tile exists and is used once.
    pub fn validate(&self) -> LoadResult<()> {
        for tile in &self.tiles {
            if tile.terrain.len() > 2 {
                anyhow::bail!(
                    "tile {} has {} terrain tags, at most 2 are allowed",
                    tile.name,
                    tile.terrain.len()
                );
            }
        }

        let mut seen = HashSet::new();
        for &index in self.players.iter().chain(&self.enemies) {
            if index as usize >= self.tiles.len() {
                anyhow::bail!("start tile {} is out of range ({} tiles)", index, self.tiles.len());
            }
            if !seen.insert(index) {
                anyhow::bail!("start tile {} is used twice", index);
            }
        }
        Ok(())
    }

    /// Builds the board and places the roster's living members on their
    /// starting tiles.
    pub fn build(&self, roster: &Roster) -> LoadResult<Board> {
        self.validate()?;

        let tiles = self
            .tiles
            .iter()
            .map(|spec| {
                let mut tags = spec.terrain.iter().copied();
                Tile::new(spec.name.clone(), TileEffects::new(tags.next(), tags.next()))
            })
            .collect();
        let mut board = Board::new(tiles);

        for (side, starts) in [(Side::Player, &self.players), (Side::Enemy, &self.enemies)] {
            let members: Vec<_> = roster.living(side).map(|e| e.id).collect();
            if members.len() > starts.len() {
                tracing::warn!(
                    %side,
                    members = members.len(),
                    starts = starts.len(),
                    "not enough start tiles, extra members stand off the board"
                );
            }
            for (entity, &tile) in members.into_iter().zip(starts.iter()) {
                board.place(entity, TileId(tile));
            }
        }
        Ok(board)
    }
}

/// Loader for board layouts from RON files.
pub struct BoardLoader;

impl BoardLoader {
    pub fn load(path: &Path) -> LoadResult<BoardLayout> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BoardLayout> {
        let layout: BoardLayout = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse board RON: {}", e))?;
        layout.validate()?;
        Ok(layout)
    }
}
