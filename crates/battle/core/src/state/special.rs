//! Special ability definitions.
//!
//! A [`Special`] is pure data: the resolver decides what it does from its
//! class (which stat and resource it draws on) and its kind (what it does to
//! the target).

use super::StatusKind;

/// Which ability list a special belongs to, and which resource it spends.
///
/// - `Skill`: free, always aimed at the caster.
/// - `Spell`: MAG-based, costs HP.
/// - `Tech`: VLT-based, costs recharge turns.
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SpecialClass {
    Skill,
    #[default]
    Spell,
    Tech,
}

/// What a special does to its target.
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SpecialKind {
    #[default]
    Attack,
    /// MAG-based healing; cannot restore droid-only targets.
    Heal,
    /// VLT-based healing; only restores droids.
    Repair,
    /// Status only, no HP change.
    Effect,
}

/// Side effect carried by an `Effect`-kind special.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialEffect {
    /// Applies a status effect for the special's duration.
    Status(StatusKind),
    /// Brings a dead target back with a third of its max HP.
    Revive,
    /// Clears every effect and returns current stats to base.
    Reset,
}

impl SpecialEffect {
    pub fn is_beneficial(self) -> bool {
        match self {
            Self::Status(kind) => kind.is_beneficial(),
            Self::Revive | Self::Reset => true,
        }
    }
}

/// A skill, spell or tech definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Special {
    pub name: String,
    pub class: SpecialClass,
    pub kind: SpecialKind,
    /// Multiplier applied to the caster's MAG or VLT.
    pub power: f32,
    /// HP for spells, recharge turns for techs.
    pub cost: i32,
    pub accuracy: i32,
    pub crit: i32,
    /// Affects every living member of the target side.
    pub hit_all: bool,
    /// Always aimed at the caster; ignores evasion and terrain accuracy.
    pub self_target: bool,
    /// A hit-all heal that leaves the caster out.
    pub spares_caster: bool,
    pub effect: Option<SpecialEffect>,
    /// Turns the status effect lasts.
    pub duration: u32,
    pub description: String,
}

impl Default for Special {
    fn default() -> Self {
        Self {
            name: String::new(),
            class: SpecialClass::Spell,
            kind: SpecialKind::Attack,
            power: 1.0,
            cost: 0,
            accuracy: 70,
            crit: 1,
            hit_all: false,
            self_target: false,
            spares_caster: false,
            effect: None,
            duration: 0,
            description: String::new(),
        }
    }
}

impl Special {
    pub fn new(name: impl Into<String>, class: SpecialClass, kind: SpecialKind) -> Self {
        Self {
            name: name.into(),
            class,
            kind,
            self_target: class == SpecialClass::Skill,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_power(mut self, power: f32) -> Self {
        self.power = power;
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: i32) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_accuracy(mut self, accuracy: i32, crit: i32) -> Self {
        self.accuracy = accuracy;
        self.crit = crit;
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: SpecialEffect, duration: u32) -> Self {
        self.effect = Some(effect);
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn hitting_all(mut self) -> Self {
        self.hit_all = true;
        self
    }

    /// Whether the special is aimed at the caster's own side.
    pub fn targets_allies(&self) -> bool {
        match self.kind {
            SpecialKind::Heal | SpecialKind::Repair => true,
            SpecialKind::Effect => self.effect.is_some_and(SpecialEffect::is_beneficial),
            SpecialKind::Attack => false,
        }
    }

    /// Whether the special restores HP rather than removing it.
    pub fn is_support(&self) -> bool {
        matches!(self.kind, SpecialKind::Heal | SpecialKind::Repair)
    }
}

/// The three ability lists of an entity.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Loadout {
    pub skills: Vec<Special>,
    pub spells: Vec<Special>,
    pub techs: Vec<Special>,
}

impl Loadout {
    pub fn list(&self, class: SpecialClass) -> &[Special] {
        match class {
            SpecialClass::Skill => &self.skills,
            SpecialClass::Spell => &self.spells,
            SpecialClass::Tech => &self.techs,
        }
    }

    pub fn get(&self, class: SpecialClass, index: usize) -> Option<&Special> {
        self.list(class).get(index)
    }
}
