//! Battle state types.
//!
//! - [`CombatEntity`]: one combatant's stats, HP, gauge and active effects
//! - [`StatusEffects`]: turn-counted buffs, debuffs and ailments
//! - [`Special`]: skill, spell and tech definitions
//! - [`Roster`]: both parties, with the queries targeting logic needs
//! - [`Inventory`]: the player's shared consumables
pub mod entity;
pub mod inventory;
pub mod roster;
pub mod special;
pub mod stats;
pub mod status;
pub mod template;

use core::fmt;

pub use entity::{CombatEntity, Condition, EntityType, HpChange};
pub use inventory::{Inventory, Item, ItemEffect};
pub use roster::Roster;
pub use special::{Loadout, Special, SpecialClass, SpecialEffect, SpecialKind};
pub use stats::{GrowthChances, LevelUpReport, StatBlock, StatKind};
pub use status::{EffectOutcome, StatusEffect, StatusEffects, StatusKind};
pub use template::EntityTemplate;

/// Identifier of a combatant, stable for the whole battle.
///
/// Unlike the party index (which is compacted as members die and revive),
/// an `EntityId` never changes once the entity joined the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of the field an entity fights for.
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
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}
