//! Combatant state.
//!
//! [`CombatEntity`] owns every number the rules read or mutate: HP, base and
//! current stats, the active status effects and the speed gauge. Mutation goes
//! through methods that keep the invariants in place:
//!
//! - `0 <= hp <= max_hp`, and `hp == 0` exactly when the condition is `Dead`
//! - current stats never drop below zero
//! - a dead entity has an empty gauge and is never ready

use arrayvec::ArrayVec;
use bitflags::bitflags;

use super::{
    EffectOutcome, EntityId, EntityTemplate, GrowthChances, Loadout, LevelUpReport, Side,
    StatBlock, StatKind, StatusEffect, StatusEffects, StatusKind,
};
use crate::behavior::BehaviorPolicy;
use crate::config::BattleConfig;
use crate::env::RngOracle;

bitflags! {
    /// Creature type. Entities may combine any two (or all three) types.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct EntityType: u8 {
        const ORGANIC = 1 << 0;
        const MAGIC   = 1 << 1;
        const DROID   = 1 << 2;
    }
}

impl EntityType {
    /// Heal-kind specials only restore organic or magic entities.
    pub fn accepts_healing(self) -> bool {
        self.intersects(Self::ORGANIC | Self::MAGIC)
    }

    /// Repair-kind specials only restore droids.
    pub fn accepts_repair(self) -> bool {
        self.contains(Self::DROID)
    }

    /// Immunities every entity of this type is born with.
    pub fn innate_immunities(self) -> impl Iterator<Item = StatusKind> {
        let poison = (self == Self::DROID).then_some(StatusKind::Poison);
        let corrosion = (!self.contains(Self::DROID)).then_some(StatusKind::Corrosion);
        poison.into_iter().chain(corrosion)
    }
}

/// Coarse condition shown next to an entity.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Condition {
    #[default]
    Normal,
    /// Below the low-health threshold.
    Critical,
    /// Suffering from an ailment.
    Ill,
    Defending,
    Dead,
}

/// HP before and after a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HpChange {
    pub before: i32,
    pub after: i32,
}

impl HpChange {
    pub fn delta(&self) -> i32 {
        self.after - self.before
    }

    pub fn died(&self) -> bool {
        self.before > 0 && self.after == 0
    }
}

/// A single combatant.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatEntity {
    pub id: EntityId,
    pub name: String,
    pub side: Side,
    /// Position among the living members of the party; `None` while dead.
    pub index: Option<usize>,
    pub kind: EntityType,
    pub level: u32,
    /// Experience towards the next level.
    pub exp: u32,
    pub exp_reward: u32,
    pub growth: GrowthChances,
    pub loadout: Loadout,
    pub behavior: BehaviorPolicy,
    /// Turns this entity has taken under AI control.
    pub turns_taken: u32,

    hp: i32,
    max_hp: i32,
    base: StatBlock,
    current: StatBlock,
    condition: Condition,
    effects: StatusEffects,
    immunities: Vec<StatusKind>,
    gauge: f32,
    ready: bool,
    tech_timer: u32,
}

impl CombatEntity {
    pub fn from_template(id: EntityId, side: Side, template: &EntityTemplate) -> Self {
        let mut immunities = template.immunities.clone();
        for kind in template.kind.innate_immunities() {
            if !immunities.contains(&kind) {
                immunities.push(kind);
            }
        }

        let max_hp = template.max_hp.max(1);
        let mut entity = Self {
            id,
            name: template.name.clone(),
            side,
            index: None,
            kind: template.kind,
            level: template.level.max(1),
            exp: 0,
            exp_reward: template.exp_reward,
            growth: template.growth,
            loadout: template.loadout.clone(),
            behavior: template.behavior.clone(),
            turns_taken: 0,
            hp: max_hp,
            max_hp,
            base: template.stats,
            current: template.stats,
            condition: Condition::Normal,
            effects: StatusEffects::empty(),
            immunities,
            gauge: 0.0,
            ready: false,
            tech_timer: 0,
        };
        entity.reset_for_battle();
        entity
    }

    /// Restores full HP, base stats, no effects and an empty gauge.
    pub fn reset_for_battle(&mut self) {
        self.hp = self.max_hp;
        self.current = self.base;
        self.condition = Condition::Normal;
        self.effects.clear();
        self.gauge = 0.0;
        self.ready = false;
        self.tech_timer = 0;
        self.turns_taken = 0;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn base(&self) -> &StatBlock {
        &self.base
    }

    /// Current (modified) stats.
    pub fn stats(&self) -> &StatBlock {
        &self.current
    }

    pub fn stat(&self, kind: StatKind) -> i32 {
        self.current.get(kind)
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn effects(&self) -> &StatusEffects {
        &self.effects
    }

    pub fn has_effect(&self, kind: StatusKind) -> bool {
        self.effects.has(kind)
    }

    pub fn immunities(&self) -> &[StatusKind] {
        &self.immunities
    }

    pub fn is_immune(&self, kind: StatusKind) -> bool {
        self.immunities.contains(&kind)
    }

    pub fn gauge(&self) -> f32 {
        self.gauge
    }

    /// Gauge as a ratio in [0, 1] for progress bars.
    pub fn gauge_ratio(&self) -> f32 {
        (self.gauge / BattleConfig::MAX_GAUGE).clamp(0.0, 1.0)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn tech_timer(&self) -> u32 {
        self.tech_timer
    }

    pub fn is_alive(&self) -> bool {
        self.condition != Condition::Dead
    }

    pub fn is_dead(&self) -> bool {
        self.condition == Condition::Dead
    }

    pub fn is_defending(&self) -> bool {
        self.condition == Condition::Defending
    }

    // ========================================================================
    // HP
    // ========================================================================

    /// Sets HP, clamped to `[0, max_hp]`.
    ///
    /// Reaching zero kills the entity and empties its gauge. A dead entity
    /// ignores HP changes until [`Self::revive`] is called.
    pub fn set_hp(&mut self, value: i32) -> HpChange {
        let before = self.hp;
        if self.is_dead() {
            return HpChange { before, after: before };
        }

        if value <= 0 {
            self.hp = 0;
            self.condition = Condition::Dead;
            self.force_reset();
        } else {
            self.hp = value.min(self.max_hp);
            self.refresh_condition();
        }

        HpChange {
            before,
            after: self.hp,
        }
    }

    pub fn adjust_hp(&mut self, delta: i32) -> HpChange {
        self.set_hp(self.hp.saturating_add(delta))
    }

    /// Brings a dead entity back with a share of its max HP.
    ///
    /// Returns false if the entity was not dead.
    pub fn revive(&mut self) -> bool {
        if !self.is_dead() {
            return false;
        }
        self.condition = Condition::Normal;
        self.hp = (self.max_hp * BattleConfig::REVIVE_PERCENT / 100).max(1);
        self.refresh_condition();
        true
    }

    /// Recomputes `Critical`/`Ill`/`Normal` from HP and ailments.
    ///
    /// `Defending` and `Dead` are left untouched.
    pub fn refresh_condition(&mut self) {
        if matches!(self.condition, Condition::Dead | Condition::Defending) {
            return;
        }

        self.condition = if self.hp * 100 < self.max_hp * BattleConfig::LOW_HEALTH_PERCENT {
            Condition::Critical
        } else if self.effects.has_ailment() {
            Condition::Ill
        } else {
            Condition::Normal
        };
    }

    // ========================================================================
    // Stats
    // ========================================================================

    /// Sets a current stat, clamped at zero.
    pub fn set_stat(&mut self, kind: StatKind, value: i32) {
        self.current.set(kind, value);
    }

    /// Returns every current stat to its base value and drops all effects.
    pub fn reset_modifiers(&mut self) {
        self.current = self.base;
        self.effects.clear();
        if self.is_defending() {
            self.condition = Condition::Normal;
        }
        self.refresh_condition();
    }

    /// Enters or leaves the defending stance.
    ///
    /// Entering doubles current DEF, RES and STB. Leaving halves them again,
    /// never below base. Leaving is a no-op when not defending.
    pub fn set_defending(&mut self, defending: bool) {
        const GUARDS: [StatKind; 3] = [StatKind::Def, StatKind::Res, StatKind::Stb];

        if self.is_dead() {
            return;
        }

        if defending {
            for kind in GUARDS {
                let doubled = self.current.get(kind).saturating_mul(2);
                self.current.set(kind, doubled);
            }
            self.condition = Condition::Defending;
        } else if self.is_defending() {
            for kind in GUARDS {
                let halved = (self.current.get(kind) / 2).max(self.base.get(kind));
                self.current.set(kind, halved);
            }
            self.condition = Condition::Normal;
            self.refresh_condition();
        }
    }

    // ========================================================================
    // Status effects
    // ========================================================================

    /// Applies a status effect for `turns` owner turns.
    ///
    /// Immune entities reject the effect. `Swift` and `Slow` cancel each
    /// other; re-applying a kind refreshes its duration.
    pub fn apply_effect(&mut self, kind: StatusKind, turns: u32) -> EffectOutcome {
        if self.is_immune(kind) {
            return EffectOutcome::Immune;
        }
        if let Some(counterpart) = kind.counterpart() {
            self.remove_effect(counterpart);
        }

        let outcome = self.effects.insert(StatusEffect::new(kind, turns));
        self.refresh_condition();
        outcome
    }

    /// Removes an effect and undoes its stat side effect.
    pub fn remove_effect(&mut self, kind: StatusKind) -> bool {
        let removed = self.effects.remove(kind);
        if removed {
            self.on_effect_removed(kind);
            self.refresh_condition();
        }
        removed
    }

    fn on_effect_removed(&mut self, kind: StatusKind) {
        if kind == StatusKind::Armor {
            self.current.def = self.base.def;
        }
    }

    // ========================================================================
    // Gauge
    // ========================================================================

    /// Adds to the gauge, clamped at the maximum.
    ///
    /// Returns true on the single call that brings the gauge to the maximum;
    /// the caller then runs turn upkeep and calls [`Self::mark_ready`].
    pub fn advance_gauge(&mut self, increment: f32) -> bool {
        if self.is_dead() {
            self.force_reset();
            return false;
        }
        if self.ready || self.gauge > BattleConfig::MAX_GAUGE {
            return false;
        }

        self.gauge = (self.gauge + increment.max(0.0)).min(BattleConfig::MAX_GAUGE);
        self.gauge >= BattleConfig::MAX_GAUGE
    }

    /// Latches the ready flag and parks the gauge just past the maximum.
    pub fn mark_ready(&mut self) {
        if self.is_dead() {
            return;
        }
        self.ready = true;
        self.gauge = BattleConfig::READY_NUDGE;
    }

    /// Places the gauge at a starting value below the maximum.
    pub fn set_gauge(&mut self, value: f32) {
        if self.is_dead() {
            return;
        }
        self.gauge = value.clamp(0.0, BattleConfig::MAX_GAUGE);
    }

    /// Consumes the turn: empties the gauge, counts down the tech recharge and
    /// advances every status effect by one turn.
    ///
    /// Returns the effects that expired.
    pub fn reset_timer(&mut self) -> ArrayVec<StatusKind, { BattleConfig::MAX_STATUS_EFFECTS }> {
        self.gauge = 0.0;
        self.ready = false;
        self.tech_timer = self.tech_timer.saturating_sub(1);

        let expired = self.effects.advance();
        for kind in &expired {
            self.on_effect_removed(*kind);
        }
        self.refresh_condition();
        expired
    }

    /// Empties the gauge without consuming a turn.
    pub fn force_reset(&mut self) {
        self.gauge = 0.0;
        self.ready = false;
    }

    /// Adds tech recharge turns for a tech costing `cost`.
    ///
    /// One extra turn is added because the turn that used the tech counts
    /// down immediately.
    pub fn add_tech_cooldown(&mut self, cost: i32) {
        if cost > 0 {
            self.tech_timer = self.tech_timer.saturating_add(cost as u32 + 1);
        }
    }

    // ========================================================================
    // Progression
    // ========================================================================

    pub fn gain_exp(&mut self, amount: u32) {
        self.exp = self.exp.saturating_add(amount);
    }

    pub fn can_level_up(&self) -> bool {
        self.exp >= BattleConfig::EXP_THRESHOLD
    }

    /// Spends one threshold of experience and rolls every growth chance.
    ///
    /// Returns None when not enough experience has been collected.
    pub fn level_up<R: RngOracle + ?Sized>(&mut self, rng: &mut R) -> Option<LevelUpReport> {
        const ROLL_ORDER: [StatKind; 9] = [
            StatKind::Atk,
            StatKind::Mag,
            StatKind::Vlt,
            StatKind::Def,
            StatKind::Res,
            StatKind::Stb,
            StatKind::Skl,
            StatKind::Spd,
            StatKind::Lck,
        ];

        if !self.can_level_up() {
            return None;
        }
        self.exp -= BattleConfig::EXP_THRESHOLD;
        self.level += 1;

        let mut report = LevelUpReport {
            level: self.level,
            ..LevelUpReport::default()
        };

        if rng.chance(self.growth.hp) {
            report.hp = true;
            self.max_hp += 1;
            if self.is_alive() {
                self.hp += 1;
            }
        }
        for kind in ROLL_ORDER {
            if rng.chance(self.growth.stats.get(kind)) {
                *self.base.get_mut(kind) += 1;
                *self.current.get_mut(kind) += 1;
                report.stats.push(kind);
            }
        }

        self.refresh_condition();
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SequenceRng;

    fn entity(kind: EntityType) -> CombatEntity {
        let stats = StatBlock {
            atk: 10,
            def: 4,
            res: 3,
            stb: 2,
            spd: 20,
            ..StatBlock::default()
        };
        let template = EntityTemplate::new("Tester", kind, 40, stats);
        CombatEntity::from_template(EntityId(0), Side::Player, &template)
    }

    #[test]
    fn hp_is_clamped_and_zero_means_dead() {
        let mut e = entity(EntityType::ORGANIC);
        e.set_hp(500);
        assert_eq!(e.hp(), 40);

        let change = e.adjust_hp(-100);
        assert!(change.died());
        assert_eq!(e.hp(), 0);
        assert_eq!(e.condition(), Condition::Dead);
        assert!(!e.is_ready());
        assert_eq!(e.gauge(), 0.0);
    }

    #[test]
    fn dead_entities_ignore_healing_until_revived() {
        let mut e = entity(EntityType::ORGANIC);
        e.set_hp(0);
        e.adjust_hp(20);
        assert_eq!(e.hp(), 0);

        assert!(e.revive());
        assert_eq!(e.hp(), 13);
        assert!(e.is_alive());
        assert!(!e.revive());
    }

    #[test]
    fn low_health_is_critical_and_ailments_are_ill() {
        let mut e = entity(EntityType::ORGANIC);
        e.set_hp(11);
        assert_eq!(e.condition(), Condition::Critical);

        e.set_hp(40);
        assert_eq!(e.condition(), Condition::Normal);

        e.apply_effect(StatusKind::Poison, 3);
        assert_eq!(e.condition(), Condition::Ill);
    }

    #[test]
    fn innate_immunities_follow_type() {
        let droid = entity(EntityType::DROID);
        assert!(droid.is_immune(StatusKind::Poison));
        assert!(!droid.is_immune(StatusKind::Corrosion));

        let organic = entity(EntityType::ORGANIC);
        assert!(organic.is_immune(StatusKind::Corrosion));
        assert!(!organic.is_immune(StatusKind::Poison));

        let hybrid = entity(EntityType::MAGIC | EntityType::DROID);
        assert!(!hybrid.is_immune(StatusKind::Poison));
        assert!(!hybrid.is_immune(StatusKind::Corrosion));
    }

    #[test]
    fn immune_effects_are_rejected() {
        let mut droid = entity(EntityType::DROID);
        assert_eq!(
            droid.apply_effect(StatusKind::Poison, 3),
            EffectOutcome::Immune
        );
        assert!(!droid.has_effect(StatusKind::Poison));
    }

    #[test]
    fn swift_and_slow_cancel_each_other() {
        let mut e = entity(EntityType::ORGANIC);
        e.apply_effect(StatusKind::Swift, 3);
        e.apply_effect(StatusKind::Slow, 2);
        assert!(!e.has_effect(StatusKind::Swift));
        assert!(e.has_effect(StatusKind::Slow));
    }

    #[test]
    fn defending_doubles_then_halves_to_base() {
        let mut e = entity(EntityType::ORGANIC);
        e.set_defending(true);
        assert_eq!(e.stats().def, 8);
        assert_eq!(e.stats().res, 6);
        assert_eq!(e.condition(), Condition::Defending);

        e.set_defending(false);
        assert_eq!(e.stats().def, 4);
        assert_eq!(e.stats().stb, 2);
        assert_eq!(e.condition(), Condition::Normal);
    }

    #[test]
    fn reset_timer_expires_effects_and_restores_armor_def() {
        let mut e = entity(EntityType::ORGANIC);
        e.set_stat(StatKind::Def, 9);
        e.apply_effect(StatusKind::Armor, 1);
        e.add_tech_cooldown(2);
        assert_eq!(e.tech_timer(), 3);

        let expired = e.reset_timer();
        assert_eq!(expired.as_slice(), &[StatusKind::Armor]);
        assert_eq!(e.stats().def, 4);
        assert_eq!(e.tech_timer(), 2);
    }

    #[test]
    fn gauge_edge_fires_once() {
        let mut e = entity(EntityType::ORGANIC);
        assert!(!e.advance_gauge(60.0));
        assert!(e.advance_gauge(60.0));
        assert_eq!(e.gauge(), BattleConfig::MAX_GAUGE);
        e.mark_ready();
        assert!(!e.advance_gauge(60.0));
        assert_eq!(e.gauge(), BattleConfig::READY_NUDGE);
    }

    #[test]
    fn level_up_spends_threshold_and_rolls_growth() {
        let mut e = entity(EntityType::ORGANIC);
        e.growth.hp = 50;
        e.growth.stats.atk = 50;
        e.gain_exp(130);

        // hp roll 10 < 50, atk roll 90 >= 50, every other chance is 0
        let mut rng = SequenceRng::new([10, 90, 99]);
        let report = e.level_up(&mut rng).expect("enough exp");

        assert_eq!(report.level, 2);
        assert!(report.hp);
        assert!(report.stats.is_empty());
        assert_eq!(e.max_hp(), 41);
        assert_eq!(e.exp, 30);
        assert!(e.level_up(&mut rng).is_none());
    }
}
