//! Status effect system for combatants.
//!
//! Status effects are turn-counted buffs, debuffs and ailments. Each kind can
//! be active at most once on an entity: re-applying a kind replaces the old
//! instance, so the latest duration always wins.
//!
//! # Turn-based Duration
//!
//! Effects store the number of turns they have left. The counter is advanced
//! once per owner turn (when the owner's gauge resets); an effect whose
//! counter reaches zero expires.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

/// Types of status effects.
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
pub enum StatusKind {
    // ========================================================================
    // Ailments (periodic HP loss)
    // ========================================================================
    /// Loses 3 HP at the start of each turn. Droids are immune.
    Poison,

    /// Loses 4 HP at the start of each turn. Only droids are affected.
    Corrosion,

    // ========================================================================
    // Defensive buffs
    // ========================================================================
    /// Physical damage taken is zeroed.
    Armor,

    /// Physical damage taken is halved.
    Protect,

    /// Magic damage taken is halved.
    Barrier,

    /// Tech damage taken is halved.
    Ground,

    /// Opponents are likely to pick another target.
    Obscure,

    // ========================================================================
    // Tempo
    // ========================================================================
    /// Gauge grows 70% faster. Cancels `Slow`.
    Swift,

    /// Gauge grows at half speed. Cancels `Swift`.
    Slow,

    // ========================================================================
    // Offense modifiers
    // ========================================================================
    /// Accuracy -35, critical chance +35.
    Anger,

    /// Physical damage dealt is tripled.
    Intense,

    /// Offense stats are substituted in every damage formula.
    Swapped,

    /// Opponents are likely to pick this entity as their target.
    Exposed,
}

impl StatusKind {
    /// Whether the effect helps its bearer, which decides if a special
    /// carrying it is aimed at allies or opponents.
    pub const fn is_beneficial(self) -> bool {
        matches!(
            self,
            Self::Armor
                | Self::Protect
                | Self::Barrier
                | Self::Ground
                | Self::Obscure
                | Self::Swift
                | Self::Anger
                | Self::Intense
        )
    }

    /// HP lost each turn while the effect is active.
    pub const fn damage_per_turn(self) -> i32 {
        match self {
            Self::Poison => 3,
            Self::Corrosion => 4,
            _ => 0,
        }
    }

    /// The mutually exclusive kind removed when this one is applied.
    pub const fn counterpart(self) -> Option<StatusKind> {
        match self {
            Self::Swift => Some(Self::Slow),
            Self::Slow => Some(Self::Swift),
            _ => None,
        }
    }

    /// Ailments that put their bearer in the `Ill` condition.
    pub const fn is_ailment(self) -> bool {
        matches!(self, Self::Poison | Self::Corrosion)
    }
}

/// A single status effect with its remaining duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Owner turns left before the effect expires.
    pub turns: u32,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, turns: u32) -> Self {
        Self { kind, turns }
    }
}

/// Result of trying to apply a status effect to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectOutcome {
    /// The effect was added.
    Applied,
    /// An instance of the same kind was replaced with the new duration.
    Refreshed,
    /// The bearer is immune; nothing changed.
    Immune,
    /// All effect slots are taken; nothing changed.
    Full,
}

impl EffectOutcome {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Applied | Self::Refreshed)
    }
}

/// Active status effects on an entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Checks if a specific status effect is active.
    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Remaining turns of an effect, or None if it is not active.
    pub fn turns_left(&self, kind: StatusKind) -> Option<u32> {
        self.effects
            .iter()
            .find(|e| e.kind == kind)
            .map(|e| e.turns)
    }

    /// Adds a status effect, replacing any active instance of the same kind.
    pub fn insert(&mut self, effect: StatusEffect) -> EffectOutcome {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            existing.turns = effect.turns;
            return EffectOutcome::Refreshed;
        }

        match self.effects.try_push(effect) {
            Ok(()) => EffectOutcome::Applied,
            Err(_) => EffectOutcome::Full,
        }
    }

    /// Removes a status effect immediately. Returns true if it was active.
    pub fn remove(&mut self, kind: StatusKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        self.effects.len() != before
    }

    /// Advances every effect by one turn and removes those that ran out.
    ///
    /// Returns the kinds that expired, in the order they were applied.
    pub fn advance(&mut self) -> ArrayVec<StatusKind, { BattleConfig::MAX_STATUS_EFFECTS }> {
        let mut expired = ArrayVec::new();
        for effect in self.effects.iter_mut() {
            effect.turns = effect.turns.saturating_sub(1);
            if effect.turns == 0 {
                expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| e.turns > 0);
        expired
    }

    /// Drops every effect.
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Total HP lost per turn to ailments.
    pub fn damage_per_turn(&self) -> i32 {
        self.effects.iter().map(|e| e.kind.damage_per_turn()).sum()
    }

    pub fn has_ailment(&self) -> bool {
        self.effects.iter().any(|e| e.kind.is_ailment())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
