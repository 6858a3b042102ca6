//! Hit and critical chances.
//!
//! Both chances are percentages in `[0, 99]`; a roll in `0..=99` strictly
//! below the chance succeeds.

use crate::env::TileEffects;
use crate::state::{CombatEntity, Special, SpecialKind, StatusKind};

pub const BASE_ACCURACY: i32 = 70;
pub const BASE_CRIT: i32 = 1;
pub const ANGER_SHIFT: i32 = 35;
pub const MAX_CHANCE: i32 = 99;

/// Chance for `actor` to hit `target`, including the target's terrain.
pub fn hit_chance(
    actor: &CombatEntity,
    target: &CombatEntity,
    special: Option<&Special>,
    terrain: TileEffects,
) -> i32 {
    let own = actor.stats();

    let mut accuracy = special.map_or(BASE_ACCURACY, |s| s.accuracy);
    accuracy += own.skl * 2 + own.lck;
    if actor.has_effect(StatusKind::Anger) {
        accuracy -= ANGER_SHIFT;
    }

    let self_target = special.is_some_and(|s| s.self_target);
    let evasion = if self_target {
        0
    } else {
        target.stats().spd + target.stats().lck / 2
    };

    let mut hit = (accuracy - evasion).clamp(0, MAX_CHANCE);

    // status specials ignore evasion
    if let Some(special) = special.filter(|s| s.kind == SpecialKind::Effect) {
        hit = special.accuracy.clamp(0, MAX_CHANCE);
    }

    if !self_target {
        for tag in terrain.iter() {
            hit = (hit - tag.hit_penalty()).max(0);
        }
    }
    hit
}

/// Chance for a landed hit to be critical.
///
/// Specials ignore the target's luck.
pub fn crit_chance(actor: &CombatEntity, target: &CombatEntity, special: Option<&Special>) -> i32 {
    let mut crit = special.map_or(BASE_CRIT, |s| s.crit);
    crit += actor.stats().skl / 2;
    if actor.has_effect(StatusKind::Anger) {
        crit += ANGER_SHIFT;
    }

    let evasion = if special.is_some() {
        0
    } else {
        target.stats().lck
    };
    (crit - evasion).clamp(0, MAX_CHANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::TerrainTag;
    use crate::state::{EntityId, EntityTemplate, EntityType, Side, SpecialClass, StatBlock};

    fn entity(skl: i32, lck: i32, spd: i32) -> CombatEntity {
        let stats = StatBlock {
            skl,
            lck,
            spd,
            ..StatBlock::default()
        };
        let template = EntityTemplate::new("E", EntityType::ORGANIC, 10, stats);
        CombatEntity::from_template(EntityId(0), Side::Player, &template)
    }

    #[test]
    fn plain_attack_accuracy_against_evasion() {
        let actor = entity(5, 4, 0);
        let target = entity(0, 6, 10);
        // 70 + 10 + 4 - (10 + 3)
        assert_eq!(hit_chance(&actor, &target, None, TileEffects::NONE), 71);
    }

    #[test]
    fn chances_are_bounded() {
        let sharp = entity(100, 100, 0);
        let clumsy = entity(0, 0, 0);
        let nimble = entity(0, 100, 200);

        assert_eq!(hit_chance(&sharp, &clumsy, None, TileEffects::NONE), 99);
        assert_eq!(hit_chance(&clumsy, &nimble, None, TileEffects::NONE), 0);
        assert_eq!(crit_chance(&sharp, &clumsy, None), 99);
        assert_eq!(crit_chance(&clumsy, &nimble, None), 0);
    }

    #[test]
    fn anger_trades_accuracy_for_crit() {
        let mut actor = entity(0, 0, 0);
        let target = entity(0, 0, 0);
        actor.apply_effect(StatusKind::Anger, 2);
        assert_eq!(hit_chance(&actor, &target, None, TileEffects::NONE), 35);
        assert_eq!(crit_chance(&actor, &target, None), 36);
    }

    #[test]
    fn effect_specials_use_base_accuracy() {
        let actor = entity(0, 0, 0);
        let target = entity(0, 0, 90);
        let hex = Special::new("Hex", SpecialClass::Spell, SpecialKind::Effect).with_accuracy(80, 0);
        assert_eq!(hit_chance(&actor, &target, Some(&hex), TileEffects::NONE), 80);
    }

    #[test]
    fn terrain_penalties_stack_and_floor_at_zero() {
        let actor = entity(0, 0, 0);
        let target = entity(0, 0, 0);
        let hidden = TileEffects::new(Some(TerrainTag::Hidden), Some(TerrainTag::Obscured));
        assert_eq!(hit_chance(&actor, &target, None, hidden), 20);

        let doubly_hidden = TileEffects::new(Some(TerrainTag::Hidden), Some(TerrainTag::Hidden));
        assert_eq!(hit_chance(&actor, &target, None, doubly_hidden), 0);
    }

    #[test]
    fn self_target_skips_evasion_and_terrain() {
        let actor = entity(0, 0, 40);
        let focus = Special::new("Focus", SpecialClass::Skill, SpecialKind::Attack);
        let hidden = TileEffects::single(TerrainTag::Hidden);
        assert_eq!(hit_chance(&actor, &actor, Some(&focus), hidden), 70);
    }
}
