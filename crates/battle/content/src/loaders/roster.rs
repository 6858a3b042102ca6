//! Party template loader.

use std::path::Path;

use battle_core::EntityTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Party file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyFile {
    pub members: Vec<EntityTemplate>,
}

/// Loader for party templates from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load the templates of one party from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<EntityTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EntityTemplate>> {
        let party: PartyFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse party RON: {}", e))?;

        if party.members.is_empty() {
            anyhow::bail!("party has no members");
        }
        for member in &party.members {
            if member.max_hp <= 0 {
                anyhow::bail!("{} has non-positive max_hp {}", member.name, member.max_hp);
            }
        }
        Ok(party.members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{BehaviorPolicy, EntityType, SpecialClass, SpecialEffect, StatusKind};

    const DRONE: &str = r#"(
        members: [
            (
                name: "Drone",
                kind: "DROID",
                max_hp: 24,
                stats: (atk: 6, vlt: 9, def: 4, stb: 3, spd: 18),
                level: 3,
                exp_reward: 35,
                behavior: Alternating(tech: 0),
                loadout: (
                    techs: [
                        (
                            name: "Tech Shock",
                            class: Tech,
                            kind: Effect,
                            cost: 2,
                            accuracy: 60,
                            effect: Some(Status(Slow)),
                            duration: 2,
                        ),
                    ],
                ),
            ),
        ],
    )"#;

    #[test]
    fn parses_templates_with_defaults() {
        let members = RosterLoader::parse(DRONE).unwrap();
        assert_eq!(members.len(), 1);

        let drone = &members[0];
        assert_eq!(drone.kind, EntityType::DROID);
        assert_eq!(drone.stats.vlt, 9);
        assert_eq!(drone.stats.mag, 0);
        assert_eq!(drone.behavior, BehaviorPolicy::Alternating { tech: 0 });

        let shock = drone.loadout.get(SpecialClass::Tech, 0).unwrap();
        assert_eq!(shock.effect, Some(SpecialEffect::Status(StatusKind::Slow)));
        assert_eq!(shock.crit, 1);
        assert_eq!(shock.power, 1.0);
    }

    #[test]
    fn rejects_empty_parties() {
        assert!(RosterLoader::parse("(members: [])").is_err());
        assert!(RosterLoader::parse("(members: [(name: \"Ghost\", max_hp: 0)])").is_err());
    }
}
