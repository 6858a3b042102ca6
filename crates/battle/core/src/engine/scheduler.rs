//! Speed-gauge turn scheduling.
//!
//! Every living entity fills a gauge from 0 to 100; the tick that fills it
//! grants the turn. The gauge then stays parked just past 100 until the
//! entity's action consumes the turn, so readiness fires exactly once per
//! cycle.

use crate::config::BattleConfig;
use crate::env::{BoardOracle, TerrainTag, TileEffects};
use crate::events::BattleEvent;
use crate::state::{CombatEntity, EntityId, Roster, StatKind, StatusKind};

pub const SWIFT_FACTOR: f32 = 1.7;
pub const SLOW_FACTOR: f32 = 0.5;

/// Advances speed gauges and runs start-of-turn upkeep.
///
/// Owns the global speed multiplier, which scales every gauge uniformly to
/// fast-forward or slow down the whole battle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnScheduler {
    speed_multiplier: f32,
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl TurnScheduler {
    pub fn new(speed_multiplier: f32) -> Self {
        Self {
            speed_multiplier: Self::clamp_multiplier(speed_multiplier),
        }
    }

    /// Snaps to the nearest power of two within the allowed range.
    /// Non-finite and non-positive values fall back to 1.
    fn clamp_multiplier(value: f32) -> f32 {
        if !value.is_finite() || value <= 0.0 {
            return 1.0;
        }
        2f32.powf(value.log2().round()).clamp(
            BattleConfig::MIN_SPEED_MULTIPLIER,
            BattleConfig::MAX_SPEED_MULTIPLIER,
        )
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn set_speed_multiplier(&mut self, value: f32) {
        self.speed_multiplier = Self::clamp_multiplier(value);
    }

    /// Doubles the multiplier, up to the maximum.
    pub fn speed_up(&mut self) -> f32 {
        self.set_speed_multiplier(self.speed_multiplier * 2.0);
        self.speed_multiplier
    }

    /// Halves the multiplier, down to the minimum.
    pub fn slow_down(&mut self) -> f32 {
        self.set_speed_multiplier(self.speed_multiplier / 2.0);
        self.speed_multiplier
    }

    /// Gauge points `entity` gains over `dt` seconds.
    pub fn increment(&self, entity: &CombatEntity, terrain: TileEffects, dt: f32) -> f32 {
        let speed = entity.stat(StatKind::Spd) as f32;
        let mut increment = dt + speed / BattleConfig::SPEED_DIVISOR * self.speed_multiplier;

        for _ in 0..terrain.count(TerrainTag::Stuck) {
            increment /= 2.0;
        }

        if entity.has_effect(StatusKind::Swift) {
            increment *= SWIFT_FACTOR;
        } else if entity.has_effect(StatusKind::Slow) {
            increment *= SLOW_FACTOR;
        }
        increment
    }

    /// Advances every living gauge by one tick.
    ///
    /// Entities whose gauge fills on this tick run their start-of-turn
    /// upkeep and, if they survive it, become ready. Returns those entities
    /// in roster order.
    pub fn tick<B: BoardOracle + ?Sized>(
        &self,
        roster: &mut Roster,
        board: &B,
        dt: f32,
        events: &mut Vec<BattleEvent>,
    ) -> Vec<EntityId> {
        let dt = dt.max(0.0);
        let mut ready = Vec::new();

        for entity in roster.iter_mut() {
            if entity.is_dead() {
                entity.force_reset();
                continue;
            }
            if entity.is_ready() {
                continue;
            }

            let terrain = board.terrain(entity.id);
            let filled = entity.advance_gauge(self.increment(entity, terrain, dt));
            events.push(BattleEvent::GaugeChanged {
                entity: entity.id,
                ratio: entity.gauge_ratio(),
            });
            if !filled {
                continue;
            }

            Self::upkeep(entity, terrain, events);
            if entity.is_dead() {
                continue;
            }

            entity.mark_ready();
            tracing::debug!(entity = %entity.id, name = %entity.name, "ready");
            events.push(BattleEvent::Ready { entity: entity.id });
            ready.push(entity.id);
        }

        ready
    }

    /// Start-of-turn effects: ailment damage, terrain HP changes and the
    /// `Stuck` speed penalty.
    fn upkeep(entity: &mut CombatEntity, terrain: TileEffects, events: &mut Vec<BattleEvent>) {
        let before = entity.hp();

        let ailment = entity.effects().damage_per_turn();
        if ailment > 0 {
            entity.adjust_hp(-ailment);
        }
        for tag in terrain.iter() {
            let delta = tag.hp_per_turn();
            if delta != 0 {
                entity.adjust_hp(delta);
            }
        }

        // SPD returns to base each turn, then halves per `Stuck` tag.
        let mut speed = entity.base().spd;
        for _ in 0..terrain.count(TerrainTag::Stuck) {
            speed /= 2;
        }
        entity.set_stat(StatKind::Spd, speed);

        let hp_delta = entity.hp() - before;
        if hp_delta != 0 {
            events.push(BattleEvent::Upkeep {
                entity: entity.id,
                hp_delta,
            });
        }
        if entity.is_dead() {
            tracing::info!(entity = %entity.id, name = %entity.name, "died during upkeep");
            events.push(BattleEvent::EntityDied { entity: entity.id });
        }
    }
}
