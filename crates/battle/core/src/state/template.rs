use super::{EntityType, GrowthChances, Loadout, StatBlock, StatusKind};
use crate::behavior::BehaviorPolicy;

/// Declarative description of a combatant, as loaded from content files.
///
/// Templates carry only **base** values; [`super::CombatEntity::from_template`]
/// derives the in-battle state (current stats, HP, gauge) from them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EntityTemplate {
    pub name: String,
    pub kind: EntityType,
    pub max_hp: i32,
    pub stats: StatBlock,
    pub level: u32,
    /// Experience granted to whoever lands the killing blow.
    pub exp_reward: u32,
    pub growth: GrowthChances,
    pub loadout: Loadout,
    /// Declared immunities; innate type immunities are added on spawn.
    pub immunities: Vec<StatusKind>,
    pub behavior: BehaviorPolicy,
}

impl Default for EntityTemplate {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: EntityType::ORGANIC,
            max_hp: 1,
            stats: StatBlock::default(),
            level: 1,
            exp_reward: 0,
            growth: GrowthChances::default(),
            loadout: Loadout::default(),
            immunities: Vec::new(),
            behavior: BehaviorPolicy::Player,
        }
    }
}

impl EntityTemplate {
    pub fn new(name: impl Into<String>, kind: EntityType, max_hp: i32, stats: StatBlock) -> Self {
        Self {
            name: name.into(),
            kind,
            max_hp,
            stats,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_behavior(mut self, behavior: BehaviorPolicy) -> Self {
        self.behavior = behavior;
        self
    }

    #[must_use]
    pub fn with_loadout(mut self, loadout: Loadout) -> Self {
        self.loadout = loadout;
        self
    }

    #[must_use]
    pub fn with_exp_reward(mut self, exp_reward: u32) -> Self {
        self.exp_reward = exp_reward;
        self
    }
}
