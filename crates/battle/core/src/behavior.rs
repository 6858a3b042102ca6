//! Turn decisions for entities that are not driven by player input.
//!
//! Every combatant carries a [`BehaviorPolicy`] chosen when it is built. The
//! battle asks the policy for a [`Decision`] each time an AI-driven entity
//! becomes ready; `Player` entities never decide and wait for input instead.

use crate::env::RngOracle;
use crate::state::{CombatEntity, EntityId, Roster, SpecialClass, StatusKind};

/// Chance that an opponent carrying `Exposed` draws the attack.
pub const EXPOSED_LURE_PERCENT: i32 = 60;
/// Chance that an attack picked against an `Obscure` opponent is redirected.
pub const OBSCURE_REDIRECT_PERCENT: i32 = 80;

/// How an entity picks its action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorPolicy {
    /// Waits for commands from the input layer.
    #[default]
    Player,
    /// Physically attacks a random opponent.
    Brute,
    /// Uses the tech in slot `tech` on even turns and attacks on odd ones.
    Alternating { tech: usize },
    /// Casts `attack_spell` at a random opponent `attack_percent` of the
    /// time; otherwise heals the most wounded ally with `heal_spell`.
    Caster {
        attack_spell: usize,
        heal_spell: usize,
        attack_percent: i32,
    },
}

/// Action chosen by a policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Attack {
        target: EntityId,
    },
    Special {
        class: SpecialClass,
        index: usize,
        target: EntityId,
    },
}

impl Decision {
    pub fn target(&self) -> EntityId {
        match self {
            Self::Attack { target } | Self::Special { target, .. } => *target,
        }
    }
}

impl BehaviorPolicy {
    pub fn is_player(&self) -> bool {
        matches!(self, Self::Player)
    }

    /// Picks an action for `actor`, or None for player-driven entities and
    /// when no opponent is left.
    ///
    /// `actor.turns_taken` must already count the turn being decided.
    pub fn decide<R: RngOracle + ?Sized>(
        &self,
        actor: &CombatEntity,
        roster: &Roster,
        rng: &mut R,
    ) -> Option<Decision> {
        match self {
            Self::Player => None,
            Self::Brute => {
                let target = pick_opponent(actor, roster, rng)?;
                Some(Decision::Attack { target })
            }
            Self::Alternating { tech } => {
                let target = pick_opponent(actor, roster, rng)?;
                let usable = actor.tech_timer() == 0
                    && actor.loadout.get(SpecialClass::Tech, *tech).is_some();
                if actor.turns_taken % 2 == 0 && usable {
                    Some(Decision::Special {
                        class: SpecialClass::Tech,
                        index: *tech,
                        target,
                    })
                } else {
                    Some(Decision::Attack { target })
                }
            }
            Self::Caster {
                attack_spell,
                heal_spell,
                attack_percent,
            } => {
                let attacking = rng.chance(*attack_percent);
                let wounded_ally = if attacking {
                    None
                } else {
                    roster.lowest_hp(actor.side, Some(actor.id))
                };

                let (index, target) = match wounded_ally {
                    Some(ally) => (*heal_spell, ally),
                    None => (*attack_spell, pick_opponent(actor, roster, rng)?),
                };
                Some(cast_or_attack(actor, index, target))
            }
        }
    }
}

/// Casts the spell in `index` when it exists and is affordable, otherwise
/// falls back to a physical attack on the same target.
fn cast_or_attack(actor: &CombatEntity, index: usize, target: EntityId) -> Decision {
    match actor.loadout.get(SpecialClass::Spell, index) {
        Some(spell) if spell.cost < actor.hp() => Decision::Special {
            class: SpecialClass::Spell,
            index,
            target,
        },
        _ => Decision::Attack { target },
    }
}

/// Chooses a living opponent at random, honouring `Exposed` and `Obscure`.
///
/// The random pick happens first. Each exposed opponent then gets a chance
/// to draw the attack; failing that, a pick that landed on an obscured
/// opponent is redirected to one of the others.
pub fn pick_opponent<R: RngOracle + ?Sized>(
    actor: &CombatEntity,
    roster: &Roster,
    rng: &mut R,
) -> Option<EntityId> {
    let targets = roster.living_ids(actor.side.opposite());
    if targets.is_empty() {
        return None;
    }
    let selection = rng.range(0, targets.len() as u32 - 1) as usize;

    let has = |id: EntityId, kind: StatusKind| roster.get(id).is_some_and(|e| e.has_effect(kind));

    for &candidate in &targets {
        if has(candidate, StatusKind::Exposed) && rng.chance(EXPOSED_LURE_PERCENT) {
            return Some(candidate);
        }
    }

    let picked = targets[selection];
    if targets.len() > 1 && has(picked, StatusKind::Obscure) && rng.chance(OBSCURE_REDIRECT_PERCENT)
    {
        let others: Vec<_> = targets.into_iter().filter(|id| *id != picked).collect();
        let redirect = rng.range(0, others.len() as u32 - 1) as usize;
        return others.get(redirect).copied();
    }

    Some(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SequenceRng;
    use crate::state::{
        EntityTemplate, EntityType, Loadout, Side, Special, SpecialKind, StatBlock,
    };

    fn setup(policy: BehaviorPolicy) -> (Roster, EntityId, [EntityId; 2]) {
        let mut roster = Roster::new();
        let loadout = Loadout {
            spells: vec![
                Special::new("Ethereal Arrow", SpecialClass::Spell, SpecialKind::Attack)
                    .with_cost(2),
                Special::new("Mend", SpecialClass::Spell, SpecialKind::Heal).with_cost(2),
            ],
            techs: vec![Special::new("Shock", SpecialClass::Tech, SpecialKind::Attack)],
            ..Loadout::default()
        };
        let enemy = EntityTemplate::new("Foe", EntityType::ORGANIC, 20, StatBlock::default())
            .with_behavior(policy)
            .with_loadout(loadout);
        let hero = EntityTemplate::new("Hero", EntityType::ORGANIC, 20, StatBlock::default());

        let actor = roster.spawn(Side::Enemy, &enemy);
        let a = roster.spawn(Side::Player, &hero);
        let b = roster.spawn(Side::Player, &hero);
        (roster, actor, [a, b])
    }

    fn entity(roster: &Roster, id: EntityId) -> &CombatEntity {
        roster.get(id).expect("spawned")
    }

    #[test]
    fn player_policy_never_decides() {
        let (roster, actor, _) = setup(BehaviorPolicy::Player);
        let mut rng = SequenceRng::new([0]);
        assert_eq!(
            BehaviorPolicy::Player.decide(entity(&roster, actor), &roster, &mut rng),
            None
        );
    }

    #[test]
    fn brute_attacks_the_random_pick() {
        let policy = BehaviorPolicy::Brute;
        let (roster, actor, [_, b]) = setup(policy.clone());
        let mut rng = SequenceRng::new([1]);
        assert_eq!(
            policy.decide(entity(&roster, actor), &roster, &mut rng),
            Some(Decision::Attack { target: b })
        );
    }

    #[test]
    fn alternating_uses_tech_on_even_turns() {
        let policy = BehaviorPolicy::Alternating { tech: 0 };
        let (mut roster, actor, [a, _]) = setup(policy.clone());
        let mut rng = SequenceRng::new([0]);

        if let Some(e) = roster.get_mut(actor) {
            e.turns_taken = 1;
        }
        assert_eq!(
            policy.decide(entity(&roster, actor), &roster, &mut rng),
            Some(Decision::Attack { target: a })
        );

        if let Some(e) = roster.get_mut(actor) {
            e.turns_taken = 2;
        }
        assert_eq!(
            policy.decide(entity(&roster, actor), &roster, &mut rng),
            Some(Decision::Special {
                class: SpecialClass::Tech,
                index: 0,
                target: a
            })
        );
    }

    #[test]
    fn last_standing_caster_attacks_instead_of_healing() {
        let policy = BehaviorPolicy::Caster {
            attack_spell: 0,
            heal_spell: 1,
            attack_percent: 70,
        };
        let (roster, actor, [a, _]) = setup(policy.clone());

        // roll 90 misses the attack chance, no ally to heal, random pick 0
        let mut rng = SequenceRng::new([90, 0]);
        assert_eq!(
            policy.decide(entity(&roster, actor), &roster, &mut rng),
            Some(Decision::Special {
                class: SpecialClass::Spell,
                index: 0,
                target: a
            })
        );
    }

    #[test]
    fn caster_heals_the_most_wounded_ally() {
        let policy = BehaviorPolicy::Caster {
            attack_spell: 0,
            heal_spell: 1,
            attack_percent: 70,
        };
        let (mut roster, actor, _) = setup(policy.clone());
        let ally = roster.spawn(
            Side::Enemy,
            &EntityTemplate::new("Ally", EntityType::ORGANIC, 20, StatBlock::default()),
        );
        if let Some(e) = roster.get_mut(ally) {
            e.set_hp(5);
        }

        let mut rng = SequenceRng::new([95]);
        assert_eq!(
            policy.decide(entity(&roster, actor), &roster, &mut rng),
            Some(Decision::Special {
                class: SpecialClass::Spell,
                index: 1,
                target: ally
            })
        );
    }

    #[test]
    fn exposed_opponent_draws_the_attack() {
        let (mut roster, actor, [_, b]) = setup(BehaviorPolicy::Brute);
        if let Some(e) = roster.get_mut(b) {
            e.apply_effect(StatusKind::Exposed, 2);
        }
        // selection 0, lure roll 10 < 60
        let mut rng = SequenceRng::new([0, 10]);
        assert_eq!(pick_opponent(entity(&roster, actor), &roster, &mut rng), Some(b));
    }

    #[test]
    fn obscure_pick_is_redirected() {
        let (mut roster, actor, [a, b]) = setup(BehaviorPolicy::Brute);
        if let Some(e) = roster.get_mut(a) {
            e.apply_effect(StatusKind::Obscure, 2);
        }
        // selection 0 lands on the obscured hero, redirect roll 10 < 80,
        // then the only other candidate
        let mut rng = SequenceRng::new([0, 10, 0]);
        assert_eq!(pick_opponent(entity(&roster, actor), &roster, &mut rng), Some(b));
    }
}
