//! Two-step action resolution.
//!
//! [`ActionResolver::prepare`] computes chances and power for every affected
//! target and rolls hit and critical **once**, producing a [`Projection`]
//! without touching HP. [`ActionResolver::commit`] later applies that
//! projection using the stored rolls, so the outcome the player confirmed is
//! exactly the outcome that happens.

use super::{damage, hit, Impact};
use crate::env::{BoardOracle, RngOracle};
use crate::error::CommandError;
use crate::state::{
    CombatEntity, EffectOutcome, EntityId, Roster, Special, SpecialEffect, SpecialKind,
    StatusKind,
};

/// Precomputed outcome for one target of an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetOutcome {
    pub target: EntityId,
    pub hit_chance: i32,
    pub crit_chance: i32,
    /// Pre-critical impact.
    pub impact: Impact,
    pub landed_hit: bool,
    pub landed_crit: bool,
}

/// A prepared action awaiting confirmation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection {
    pub actor: EntityId,
    /// None for a plain physical attack.
    pub special: Option<Special>,
    pub outcomes: Vec<TargetOutcome>,
}

impl Projection {
    pub fn primary(&self) -> Option<&TargetOutcome> {
        self.outcomes.first()
    }

    pub fn targets(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.outcomes.iter().map(|o| o.target)
    }
}

/// What committing a projection did to one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    pub target: EntityId,
    pub hit: bool,
    pub crit: bool,
    /// Signed HP change actually applied.
    pub hp_delta: i32,
    pub status: Option<(StatusKind, EffectOutcome)>,
    pub died: bool,
    pub revived: bool,
    /// Experience granted to the actor for a killing blow.
    pub exp_gained: u32,
}

/// Computes and applies action outcomes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ActionResolver;

impl ActionResolver {
    /// Builds the projection of `actor` using `special` (or a plain attack)
    /// on `target`.
    ///
    /// Hit-all specials fan out over the side the special aims at; the
    /// chosen target only selects that side. Rolls happen here, once per
    /// target: the critical roll is only made for a landed hit.
    pub fn prepare<B, R>(
        roster: &Roster,
        board: &B,
        rng: &mut R,
        actor: EntityId,
        target: EntityId,
        special: Option<&Special>,
    ) -> Result<Projection, CommandError>
    where
        B: BoardOracle + ?Sized,
        R: RngOracle + ?Sized,
    {
        let actor_entity = roster.get(actor).ok_or(CommandError::UnknownEntity(actor))?;
        let targets = Self::resolve_targets(roster, actor_entity, target, special)?;

        let mut outcomes = Vec::with_capacity(targets.len());
        for id in targets {
            let Some(target_entity) = roster.get(id) else {
                continue;
            };
            let terrain = board.terrain(id);

            let hit_chance = hit::hit_chance(actor_entity, target_entity, special, terrain);
            let crit_chance = hit::crit_chance(actor_entity, target_entity, special);
            let impact = match special {
                Some(special) => damage::special(actor_entity, target_entity, special, terrain),
                None => Impact::Damage(damage::physical(actor_entity, target_entity, terrain)),
            };

            let (landed_hit, landed_crit) = match special {
                Some(s) if s.is_support() => (true, rng.chance(crit_chance)),
                Some(s) if s.kind == SpecialKind::Effect => {
                    let landed = s.targets_allies() || rng.chance(hit_chance);
                    (landed, false)
                }
                _ => {
                    let landed = rng.chance(hit_chance);
                    (landed, landed && rng.chance(crit_chance))
                }
            };

            outcomes.push(TargetOutcome {
                target: id,
                hit_chance,
                crit_chance,
                impact,
                landed_hit,
                landed_crit,
            });
        }

        tracing::debug!(
            actor = %actor,
            special = special.map(|s| s.name.as_str()).unwrap_or("attack"),
            targets = outcomes.len(),
            "projection prepared"
        );

        Ok(Projection {
            actor,
            special: special.cloned(),
            outcomes,
        })
    }

    fn resolve_targets(
        roster: &Roster,
        actor: &CombatEntity,
        target: EntityId,
        special: Option<&Special>,
    ) -> Result<Vec<EntityId>, CommandError> {
        let revives = special.is_some_and(|s| s.effect == Some(SpecialEffect::Revive));

        let Some(special) = special else {
            let entity = roster.get(target).ok_or(CommandError::UnknownEntity(target))?;
            if entity.is_dead() || entity.id == actor.id {
                return Err(CommandError::InvalidTarget(target));
            }
            return Ok(vec![target]);
        };

        if special.self_target {
            return Ok(vec![actor.id]);
        }

        if special.hit_all {
            let side = if special.targets_allies() {
                actor.side
            } else {
                actor.side.opposite()
            };
            let ids: Vec<_> = roster
                .members(side)
                .filter(|e| if revives { e.is_dead() } else { e.is_alive() })
                .filter(|e| !(e.id == actor.id && special.spares_caster))
                .map(|e| e.id)
                .collect();
            return Ok(ids);
        }

        let entity = roster.get(target).ok_or(CommandError::UnknownEntity(target))?;
        if entity.is_dead() != revives {
            return Err(CommandError::InvalidTarget(target));
        }
        Ok(vec![target])
    }

    /// Applies a projection in target order.
    ///
    /// Targets that died since the projection was made are skipped, except
    /// by revives. A killing blow grants the victim's experience reward to
    /// the actor.
    pub fn commit(roster: &mut Roster, projection: &Projection) -> Vec<Resolution> {
        let special = projection.special.as_ref();
        let mut resolutions = Vec::with_capacity(projection.outcomes.len());

        for outcome in &projection.outcomes {
            let Some(target) = roster.get_mut(outcome.target) else {
                continue;
            };
            let revives = special.is_some_and(|s| s.effect == Some(SpecialEffect::Revive));
            if target.is_dead() && !revives {
                continue;
            }

            let mut resolution = Resolution {
                target: outcome.target,
                hit: outcome.landed_hit,
                crit: outcome.landed_crit,
                hp_delta: 0,
                status: None,
                died: false,
                revived: false,
                exp_gained: 0,
            };

            if outcome.landed_hit {
                let change = target.adjust_hp(outcome.impact.with_crit(outcome.landed_crit).hp_delta());
                resolution.hp_delta = change.delta();
                resolution.died = change.died();

                if !resolution.died {
                    match special.and_then(|s| s.effect.map(|e| (e, s.duration))) {
                        Some((SpecialEffect::Status(kind), turns)) => {
                            let applied = target.apply_effect(kind, turns);
                            resolution.status = Some((kind, applied));
                        }
                        Some((SpecialEffect::Revive, _)) => {
                            if target.revive() {
                                resolution.revived = true;
                                resolution.hp_delta = target.hp();
                            }
                        }
                        Some((SpecialEffect::Reset, _)) => target.reset_modifiers(),
                        None => {}
                    }
                }

                if resolution.died {
                    let reward = target.exp_reward;
                    if let Some(actor) = roster.get_mut(projection.actor) {
                        actor.gain_exp(reward);
                    }
                    resolution.exp_gained = reward;
                }
            }

            resolutions.push(resolution);
        }

        resolutions
    }
}
