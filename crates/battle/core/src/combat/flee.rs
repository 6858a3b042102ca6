use crate::env::RngOracle;
use crate::state::{Roster, Side};

pub const BASE_FLEE_CHANCE: i32 = 75;

/// Chance for `side` to escape, clamped to `[0, 100]`.
///
/// Each living opponent costs twice its level; each living ally adds its
/// level.
pub fn flee_chance(roster: &Roster, side: Side) -> i32 {
    let opponents = roster.level_sum(side.opposite());
    let allies = roster.level_sum(side);
    (BASE_FLEE_CHANCE - opponents * 2 + allies).clamp(0, 100)
}

/// Single roll against a flee chance.
pub fn roll_flee<R: RngOracle + ?Sized>(chance: i32, rng: &mut R) -> bool {
    rng.chance(chance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SequenceRng;
    use crate::state::{EntityTemplate, EntityType, StatBlock};

    fn roster(enemy_levels: &[u32], ally_levels: &[u32]) -> Roster {
        let mut roster = Roster::new();
        for level in ally_levels {
            roster.spawn(
                Side::Player,
                &EntityTemplate::new("Ally", EntityType::ORGANIC, 10, StatBlock::default())
                    .with_level(*level),
            );
        }
        for level in enemy_levels {
            roster.spawn(
                Side::Enemy,
                &EntityTemplate::new("Foe", EntityType::ORGANIC, 10, StatBlock::default())
                    .with_level(*level),
            );
        }
        roster
    }

    #[test]
    fn level_ten_enemy_against_level_five_ally() {
        let roster = roster(&[10], &[5]);
        let chance = flee_chance(&roster, Side::Player);
        assert_eq!(chance, 60);

        assert!(roll_flee(chance, &mut SequenceRng::new([59])));
        assert!(!roll_flee(chance, &mut SequenceRng::new([61])));
    }

    #[test]
    fn chance_is_clamped() {
        assert_eq!(flee_chance(&roster(&[30, 30], &[1]), Side::Player), 0);
        assert_eq!(flee_chance(&roster(&[], &[40]), Side::Player), 100);
    }
}
