//! Stat triads.
//!
//! Every entity carries three offense stats (ATK, MAG, VLT), the three
//! matching defenses (DEF, RES, STB) and three performance stats
//! (SKL, LCK, SPD). Each exists twice on an entity: an immutable-in-battle
//! **base** value and a **current** value that Defend and status effects
//! modify temporarily.

/// Individual stat selector, used by level-up reports and stat mutation.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    /// Physical strength.
    Atk,
    /// Magical strength.
    Mag,
    /// Electrical strength.
    Vlt,
    /// Physical resistance.
    Def,
    /// Magical resistance.
    Res,
    /// Electrical resistance.
    Stb,
    /// Accuracy and critical rate.
    Skl,
    /// Evasion and critical avoidance.
    Lck,
    /// Gauge growth and evasion.
    Spd,
}

/// A full set of the nine stats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBlock {
    pub atk: i32,
    pub mag: i32,
    pub vlt: i32,
    pub def: i32,
    pub res: i32,
    pub stb: i32,
    pub skl: i32,
    pub lck: i32,
    pub spd: i32,
}

impl StatBlock {
    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Atk => self.atk,
            StatKind::Mag => self.mag,
            StatKind::Vlt => self.vlt,
            StatKind::Def => self.def,
            StatKind::Res => self.res,
            StatKind::Stb => self.stb,
            StatKind::Skl => self.skl,
            StatKind::Lck => self.lck,
            StatKind::Spd => self.spd,
        }
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut i32 {
        match kind {
            StatKind::Atk => &mut self.atk,
            StatKind::Mag => &mut self.mag,
            StatKind::Vlt => &mut self.vlt,
            StatKind::Def => &mut self.def,
            StatKind::Res => &mut self.res,
            StatKind::Stb => &mut self.stb,
            StatKind::Skl => &mut self.skl,
            StatKind::Lck => &mut self.lck,
            StatKind::Spd => &mut self.spd,
        }
    }

    /// Sets a stat, clamping negative values to zero.
    pub fn set(&mut self, kind: StatKind, value: i32) {
        *self.get_mut(kind) = value.max(0);
    }
}

/// Per-level growth chances, each a percentage in 0..=100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GrowthChances {
    pub hp: i32,
    pub stats: StatBlock,
}

/// What a single level-up granted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUpReport {
    /// Level reached.
    pub level: u32,
    /// Whether max HP grew by one.
    pub hp: bool,
    /// Stats that grew by one, in roll order.
    pub stats: Vec<StatKind>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn get_mut_and_get_address_the_same_field() {
        let mut block = StatBlock::default();
        for (value, kind) in StatKind::iter().enumerate() {
            *block.get_mut(kind) = value as i32 + 1;
        }
        for (value, kind) in StatKind::iter().enumerate() {
            assert_eq!(block.get(kind), value as i32 + 1);
        }
    }

    #[test]
    fn set_clamps_negative_values() {
        let mut block = StatBlock::default();
        block.set(StatKind::Def, -4);
        assert_eq!(block.def, 0);
    }

    #[test]
    fn stat_names_parse_case_insensitively() {
        assert_eq!("VLT".parse::<StatKind>(), Ok(StatKind::Vlt));
        assert_eq!(StatKind::Stb.to_string(), "stb");
    }
}
