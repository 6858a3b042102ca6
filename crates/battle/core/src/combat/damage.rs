//! Power formulas.
//!
//! Each formula returns the projected, pre-critical magnitude. Damage never
//! drops below zero whatever the stats, statuses and terrain involved.

use crate::env::{TerrainTag, TileEffects};
use crate::state::{CombatEntity, Special, SpecialClass, SpecialKind, StatusKind};

pub const OFFENSIVE_CRIT_MULTIPLIER: f32 = 2.25;
pub const SUPPORT_CRIT_MULTIPLIER: f32 = 1.5;

/// Projected effect of an action on one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Impact {
    Damage(i32),
    Heal(i32),
    /// Status-only actions.
    Inert,
}

impl Impact {
    /// Magnitude after a critical multiplier, truncated toward zero.
    pub fn with_crit(self, crit: bool) -> Self {
        if !crit {
            return self;
        }
        match self {
            Self::Damage(d) => Self::Damage(scale(d, OFFENSIVE_CRIT_MULTIPLIER)),
            Self::Heal(h) => Self::Heal(scale(h, SUPPORT_CRIT_MULTIPLIER)),
            Self::Inert => Self::Inert,
        }
    }

    /// Signed HP change this impact asks for.
    pub fn hp_delta(self) -> i32 {
        match self {
            Self::Damage(d) => -d,
            Self::Heal(h) => h,
            Self::Inert => 0,
        }
    }

    /// Unsigned value shown in projections.
    pub fn magnitude(self) -> i32 {
        self.hp_delta().abs()
    }
}

fn scale(value: i32, factor: f32) -> i32 {
    (value as f32 * factor) as i32
}

/// Physical damage of a plain attack.
pub fn physical(actor: &CombatEntity, target: &CombatEntity, terrain: TileEffects) -> i32 {
    let own = actor.stats();
    let offense = if actor.has_effect(StatusKind::Swapped) {
        own.mag + own.vlt
    } else {
        own.atk
    };

    let mut damage = offense - target.stats().def;
    if target.has_effect(StatusKind::Protect) {
        damage /= 2;
    }
    if target.has_effect(StatusKind::Armor) {
        damage = 0;
    }
    if actor.has_effect(StatusKind::Intense) {
        damage *= 3;
    }
    damage = damage.max(0);

    for tag in terrain.iter() {
        damage = (damage - tag.physical_reduction()).max(0);
    }
    damage
}

/// Projected impact of a special on one target.
pub fn special(
    actor: &CombatEntity,
    target: &CombatEntity,
    special: &Special,
    terrain: TileEffects,
) -> Impact {
    let own = actor.stats();
    let swapped = actor.has_effect(StatusKind::Swapped);
    let mag = if swapped { own.atk } else { own.mag };
    let vlt = if swapped { own.atk } else { own.vlt };

    match (special.kind, special.class) {
        (SpecialKind::Effect, _) => Impact::Inert,

        (SpecialKind::Attack, SpecialClass::Skill) => {
            Impact::Damage(scale(physical(actor, target, terrain), special.power))
        }
        (SpecialKind::Attack, SpecialClass::Spell) => {
            let mut damage = mag as f32 * special.power - target.stats().res as f32;
            if target.has_effect(StatusKind::Barrier) {
                damage /= 2.0;
            }
            Impact::Damage(damage.max(0.0) as i32)
        }
        (SpecialKind::Attack, SpecialClass::Tech) => {
            let mut damage = vlt as f32 * special.power - target.stats().stb as f32;
            if target.has_effect(StatusKind::Ground) {
                damage /= 2.0;
            }
            let mut damage = damage.max(0.0) as i32;
            for tag in terrain.iter() {
                if matches!(tag, TerrainTag::Grounded | TerrainTag::Soggy) {
                    damage = scale(damage, tag.tech_scale()).max(0);
                }
            }
            Impact::Damage(damage)
        }

        (SpecialKind::Heal, class) => {
            let single_self_spell = class == SpecialClass::Spell
                && actor.id == target.id
                && !special.hit_all
                && !special.self_target;
            if !target.kind.accepts_healing() || single_self_spell {
                Impact::Heal(0)
            } else {
                Impact::Heal(scale(mag, special.power))
            }
        }
        (SpecialKind::Repair, _) => {
            if target.kind.accepts_repair() {
                Impact::Heal(scale(vlt, special.power))
            } else {
                Impact::Heal(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EntityId, EntityTemplate, EntityType, Side, StatBlock};

    fn entity(id: u32, kind: EntityType, stats: StatBlock) -> CombatEntity {
        let template = EntityTemplate::new("E", kind, 50, stats);
        CombatEntity::from_template(EntityId(id), Side::Player, &template)
    }

    fn brawler() -> CombatEntity {
        entity(
            0,
            EntityType::ORGANIC,
            StatBlock {
                atk: 20,
                mag: 12,
                vlt: 10,
                ..StatBlock::default()
            },
        )
    }

    fn guard() -> CombatEntity {
        entity(
            1,
            EntityType::ORGANIC,
            StatBlock {
                def: 5,
                res: 4,
                stb: 2,
                ..StatBlock::default()
            },
        )
    }

    #[test]
    fn physical_damage_scenarios() {
        let mut actor = brawler();
        let mut target = guard();
        assert_eq!(physical(&actor, &target, TileEffects::NONE), 15);

        target.apply_effect(StatusKind::Armor, 1);
        assert_eq!(physical(&actor, &target, TileEffects::NONE), 0);
        target.remove_effect(StatusKind::Armor);

        actor.apply_effect(StatusKind::Intense, 1);
        assert_eq!(physical(&actor, &target, TileEffects::NONE), 45);
    }

    #[test]
    fn swapped_uses_mag_plus_vlt() {
        let mut actor = brawler();
        actor.apply_effect(StatusKind::Swapped, 1);
        assert_eq!(physical(&actor, &guard(), TileEffects::NONE), 17);
    }

    #[test]
    fn protect_halves_and_cover_subtracts() {
        let actor = brawler();
        let mut target = guard();
        target.apply_effect(StatusKind::Protect, 1);
        let cover = TileEffects::new(Some(TerrainTag::Cover), Some(TerrainTag::Fortified));
        // (20 - 5) / 2 = 7, then 7 - 3 - 5 floors at 0
        assert_eq!(physical(&actor, &target, TileEffects::NONE), 7);
        assert_eq!(physical(&actor, &target, cover), 0);
    }

    #[test]
    fn damage_never_negative() {
        let weak = entity(0, EntityType::ORGANIC, StatBlock::default());
        let wall = entity(
            1,
            EntityType::ORGANIC,
            StatBlock {
                def: 99,
                res: 99,
                stb: 99,
                ..StatBlock::default()
            },
        );
        let bolt = Special::new("Bolt", SpecialClass::Spell, SpecialKind::Attack).with_power(3.0);
        let zap = Special::new("Zap", SpecialClass::Tech, SpecialKind::Attack).with_power(3.0);

        assert_eq!(physical(&weak, &wall, TileEffects::NONE), 0);
        assert_eq!(special(&weak, &wall, &bolt, TileEffects::NONE), Impact::Damage(0));
        let soggy = TileEffects::single(TerrainTag::Soggy);
        assert_eq!(special(&weak, &wall, &zap, soggy), Impact::Damage(0));
    }

    #[test]
    fn spell_and_tech_damage() {
        let actor = brawler();
        let mut target = guard();
        let bolt = Special::new("Bolt", SpecialClass::Spell, SpecialKind::Attack).with_power(1.5);
        let zap = Special::new("Zap", SpecialClass::Tech, SpecialKind::Attack).with_power(2.0);

        // 12 * 1.5 - 4
        assert_eq!(special(&actor, &target, &bolt, TileEffects::NONE), Impact::Damage(14));
        // 10 * 2 - 2 = 18, grounded 18 * 0.65 = 11
        let grounded = TileEffects::single(TerrainTag::Grounded);
        assert_eq!(special(&actor, &target, &zap, grounded), Impact::Damage(11));
        // soggy doubles
        let soggy = TileEffects::single(TerrainTag::Soggy);
        assert_eq!(special(&actor, &target, &zap, soggy), Impact::Damage(36));

        target.apply_effect(StatusKind::Ground, 1);
        assert_eq!(special(&actor, &target, &zap, TileEffects::NONE), Impact::Damage(9));
    }

    #[test]
    fn healing_respects_creature_type() {
        let healer = brawler();
        let droid = entity(2, EntityType::DROID, StatBlock::default());
        let cyborg = entity(3, EntityType::DROID | EntityType::ORGANIC, StatBlock::default());
        let mend = Special::new("Mend", SpecialClass::Spell, SpecialKind::Heal).with_power(1.0);
        let patch = Special::new("Patch", SpecialClass::Tech, SpecialKind::Repair).with_power(1.0);

        assert_eq!(special(&healer, &droid, &mend, TileEffects::NONE), Impact::Heal(0));
        assert_eq!(special(&healer, &cyborg, &mend, TileEffects::NONE), Impact::Heal(12));
        assert_eq!(special(&healer, &droid, &patch, TileEffects::NONE), Impact::Heal(10));
        assert_eq!(special(&healer, &guard(), &patch, TileEffects::NONE), Impact::Heal(0));
    }

    #[test]
    fn single_target_spell_heal_on_self_is_blocked() {
        let healer = brawler();
        let mend = Special::new("Mend", SpecialClass::Spell, SpecialKind::Heal).with_power(1.0);
        assert_eq!(special(&healer, &healer, &mend, TileEffects::NONE), Impact::Heal(0));

        let wave = mend.clone().hitting_all();
        assert_eq!(special(&healer, &healer, &wave, TileEffects::NONE), Impact::Heal(12));
    }

    #[test]
    fn crit_multipliers_truncate() {
        assert_eq!(Impact::Damage(15).with_crit(true), Impact::Damage(33));
        assert_eq!(Impact::Heal(15).with_crit(true), Impact::Heal(22));
        assert_eq!(Impact::Damage(15).with_crit(false), Impact::Damage(15));
    }
}
