//! Battle board terrain.
//!
//! The combat rules only read a tile's terrain tags for the tile an entity
//! stands on, through [`BoardOracle`]. [`Board`] is the in-memory
//! implementation that also tracks where every entity stands.

use std::collections::HashMap;

use crate::state::EntityId;

/// Terrain effect attached to a tile.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TerrainTag {
    /// Tech damage taken is doubled.
    Soggy,
    /// Tech damage taken is scaled by 0.65.
    Grounded,
    /// Gauge growth halved; SPD drops to half of base each turn.
    Stuck,
    /// Attackers lose 15 accuracy.
    Obscured,
    /// Restores 3 HP each turn.
    Recovery,
    /// Attackers lose 35 accuracy.
    Hidden,
    /// Physical damage taken -3.
    Cover,
    /// Physical damage taken -5.
    Fortified,
    /// Loses 3 HP each turn.
    Hazard,
}

impl TerrainTag {
    pub const fn hit_penalty(self) -> i32 {
        match self {
            Self::Hidden => 35,
            Self::Obscured => 15,
            _ => 0,
        }
    }

    pub const fn physical_reduction(self) -> i32 {
        match self {
            Self::Cover => 3,
            Self::Fortified => 5,
            _ => 0,
        }
    }

    pub const fn tech_scale(self) -> f32 {
        match self {
            Self::Grounded => 0.65,
            Self::Soggy => 2.0,
            _ => 1.0,
        }
    }

    /// HP change applied at the start of each turn.
    pub const fn hp_per_turn(self) -> i32 {
        match self {
            Self::Recovery => 3,
            Self::Hazard => -3,
            _ => 0,
        }
    }
}

/// The two terrain slots of a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileEffects(pub [Option<TerrainTag>; 2]);

impl TileEffects {
    pub const NONE: Self = Self([None, None]);

    pub fn new(first: Option<TerrainTag>, second: Option<TerrainTag>) -> Self {
        Self([first, second])
    }

    pub fn single(tag: TerrainTag) -> Self {
        Self([Some(tag), None])
    }

    pub fn iter(&self) -> impl Iterator<Item = TerrainTag> + '_ {
        self.0.iter().flatten().copied()
    }

    /// How many slots carry `tag`.
    pub fn count(&self, tag: TerrainTag) -> usize {
        self.iter().filter(|t| *t == tag).count()
    }

    pub fn has(&self, tag: TerrainTag) -> bool {
        self.count(tag) > 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileId(pub u32);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tile {
    pub name: String,
    pub effects: TileEffects,
}

impl Tile {
    pub fn new(name: impl Into<String>, effects: TileEffects) -> Self {
        Self {
            name: name.into(),
            effects,
        }
    }
}

/// Read-only terrain lookup used by the scheduler and the resolver.
pub trait BoardOracle {
    /// Terrain tags under an entity; empty when it stands nowhere.
    fn terrain(&self, entity: EntityId) -> TileEffects;
}

/// Tiles plus the current placement of every entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    tiles: Vec<Tile>,
    placements: HashMap<EntityId, TileId>,
}

impl Board {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self {
            tiles,
            placements: HashMap::new(),
        }
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.0 as usize)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile_of(&self, entity: EntityId) -> Option<TileId> {
        self.placements.get(&entity).copied()
    }

    pub fn occupant(&self, tile: TileId) -> Option<EntityId> {
        self.placements
            .iter()
            .find(|(_, t)| **t == tile)
            .map(|(e, _)| *e)
    }

    pub fn is_free(&self, tile: TileId) -> bool {
        self.tile(tile).is_some() && self.occupant(tile).is_none()
    }

    /// Puts an entity on a free tile, leaving its previous tile.
    ///
    /// Returns false when the tile does not exist or is occupied by someone
    /// else.
    pub fn place(&mut self, entity: EntityId, tile: TileId) -> bool {
        if self.tile(tile).is_none() {
            return false;
        }
        match self.occupant(tile) {
            Some(other) if other != entity => false,
            _ => {
                self.placements.insert(entity, tile);
                true
            }
        }
    }
}

impl BoardOracle for Board {
    fn terrain(&self, entity: EntityId) -> TileEffects {
        self.tile_of(entity)
            .and_then(|id| self.tile(id))
            .map(|tile| tile.effects)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_repeated_tags() {
        let effects = TileEffects::new(Some(TerrainTag::Stuck), Some(TerrainTag::Stuck));
        assert_eq!(effects.count(TerrainTag::Stuck), 2);
        assert!(!effects.has(TerrainTag::Hazard));
    }

    #[test]
    fn placement_rejects_occupied_tiles() {
        let mut board = Board::new(vec![
            Tile::new("Grass", TileEffects::NONE),
            Tile::new("Mud", TileEffects::single(TerrainTag::Stuck)),
        ]);
        assert!(board.place(EntityId(0), TileId(1)));
        assert!(!board.place(EntityId(1), TileId(1)));
        assert!(!board.place(EntityId(1), TileId(9)));
        assert!(board.place(EntityId(0), TileId(0)));
        assert!(board.is_free(TileId(1)));

        assert_eq!(board.terrain(EntityId(0)), TileEffects::NONE);
        assert_eq!(board.terrain(EntityId(5)), TileEffects::NONE);
    }
}
