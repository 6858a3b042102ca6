//! Drives a battle to completion without a frontend.
use anyhow::{Result, bail};
use battle_content::ContentFactory;
use battle_core::{
    Battle, BattleEvent, BattleOutcome, BattlePhase, BehaviorPolicy, EntityTemplate, Roster,
    RngOracle, Side,
};
use serde::Serialize;

use crate::SimConfig;

/// Final state of a simulated battle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimReport {
    /// `None` when the tick limit ran out first.
    pub outcome: Option<BattleOutcome>,
    pub ticks: u64,
    pub survivors: Vec<Survivor>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Survivor {
    pub name: String,
    pub side: Side,
    pub level: u32,
    pub hp: i32,
    pub max_hp: i32,
}

/// Hands every input-driven member to the plain attack policy.
pub fn automate(members: &mut [EntityTemplate]) {
    for member in members.iter_mut().filter(|m| m.behavior.is_player()) {
        member.behavior = BehaviorPolicy::Brute;
    }
}

/// Loads the content directory and simulates one battle.
pub fn run(config: &SimConfig) -> Result<SimReport> {
    let factory = ContentFactory::new(&config.data_dir);
    let mut battle = factory.build_battle(|battle_config, party, enemies| {
        if let Some(seed) = config.seed {
            battle_config.seed = seed;
        }
        if let Some(multiplier) = config.speed_multiplier {
            battle_config.speed_multiplier = multiplier;
        }
        automate(party);
        automate(enemies);
    })?;

    tracing::info!(
        data_dir = %factory.data_dir().display(),
        seed = battle.config().seed,
        "starting simulation"
    );
    simulate(&mut battle, config.tick_seconds, config.max_ticks)
}

/// Ticks `battle` until it ends or `max_ticks` pass.
///
/// Stands in for the presentation layer: special animations complete
/// immediately and level-up screens are dismissed as soon as they open.
pub fn simulate<R: RngOracle>(
    battle: &mut Battle<R>,
    tick_seconds: f32,
    max_ticks: u64,
) -> Result<SimReport> {
    if !battle.is_over() && battle.phase() == BattlePhase::BattlePrep {
        battle.start()?;
    }

    let mut ticks = 0;
    while !battle.is_over() && ticks < max_ticks {
        battle.tick(tick_seconds);
        ticks += 1;

        match battle.phase() {
            BattlePhase::SpecialAnimating => battle.notify_animation_complete()?,
            BattlePhase::LevelUp => {
                battle.confirm()?;
            }
            BattlePhase::Normal if !battle.awaiting_input().is_empty() => {
                bail!(
                    "{} entities are waiting for player input",
                    battle.awaiting_input().len()
                );
            }
            _ => {}
        }

        for event in battle.drain_events() {
            log_event(battle.roster(), &event);
        }
    }

    if battle.outcome().is_none() {
        tracing::warn!(ticks, "tick limit reached before the battle ended");
    }

    Ok(SimReport {
        outcome: battle.outcome(),
        ticks,
        survivors: survivors(battle.roster()),
    })
}

fn survivors(roster: &Roster) -> Vec<Survivor> {
    roster
        .iter()
        .filter(|entity| entity.is_alive())
        .map(|entity| Survivor {
            name: entity.name.clone(),
            side: entity.side,
            level: entity.level,
            hp: entity.hp(),
            max_hp: entity.max_hp(),
        })
        .collect()
}

fn log_event(roster: &Roster, event: &BattleEvent) {
    let name = |id| roster.get(id).map_or("?", |e| e.name.as_str());

    match event {
        BattleEvent::GaugeChanged { .. } => {}
        BattleEvent::PhaseChanged { from, to } => {
            tracing::trace!(%from, %to, "phase changed");
        }
        BattleEvent::Ready { entity } => {
            tracing::debug!("{} is ready", name(*entity));
        }
        BattleEvent::Projection(summary) => {
            tracing::info!("{}", summary.description);
        }
        BattleEvent::Resolved {
            actor,
            target,
            hp_delta,
            hit,
            crit,
        } => {
            if *hit {
                tracing::info!(
                    crit,
                    "{} -> {}: {:+} HP",
                    name(*actor),
                    name(*target),
                    hp_delta
                );
            } else {
                tracing::info!("{} misses {}", name(*actor), name(*target));
            }
        }
        BattleEvent::EntityDied { entity } => {
            tracing::info!("{} falls", name(*entity));
        }
        BattleEvent::LevelUp { entity, report } => {
            tracing::info!(level = report.level, "{} levels up", name(*entity));
        }
        BattleEvent::OrderDiscarded { order, actor } => {
            tracing::warn!(%order, "{} could not pay for its order", name(*actor));
        }
        BattleEvent::BattleEnded { outcome } => {
            tracing::info!(%outcome, "battle ended");
        }
        other => tracing::debug!(?other, "event"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn automate_only_touches_player_policies() {
        let mut members = vec![
            EntityTemplate::default(),
            EntityTemplate::default().with_behavior(BehaviorPolicy::Alternating { tech: 0 }),
        ];
        automate(&mut members);
        assert_eq!(members[0].behavior, BehaviorPolicy::Brute);
        assert_eq!(
            members[1].behavior,
            BehaviorPolicy::Alternating { tech: 0 }
        );
    }
}
