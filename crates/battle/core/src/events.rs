//! Notifications for the presentation layer.
//!
//! The battle never calls back into its caller. Everything a renderer needs
//! (progress bars, preview panels, damage numbers, animation triggers) is
//! buffered as [`BattleEvent`]s and collected with
//! [`crate::engine::Battle::drain_events`].

use crate::engine::{BattleOutcome, BattlePhase, CommandKind, OrderId};
use crate::env::TileId;
use crate::state::{EntityId, LevelUpReport, StatusKind};

/// One target line of a projection preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetPreview {
    pub target: EntityId,
    pub hit_chance: i32,
    pub crit_chance: i32,
    /// Projected damage or healing before a critical.
    pub power: i32,
}

/// Preview of a prepared action, shown before it is confirmed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionSummary {
    pub actor: EntityId,
    pub command: CommandKind,
    /// Special or item name, when one is used.
    pub ability: Option<String>,
    pub targets: Vec<TargetPreview>,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    PhaseChanged {
        from: BattlePhase,
        to: BattlePhase,
    },

    // ===== scheduler =====
    GaugeChanged {
        entity: EntityId,
        ratio: f32,
    },
    Ready {
        entity: EntityId,
    },
    /// HP change from ailments and terrain at the start of a turn.
    Upkeep {
        entity: EntityId,
        hp_delta: i32,
    },

    // ===== resolution =====
    Projection(ProjectionSummary),
    Resolved {
        actor: EntityId,
        target: EntityId,
        hp_delta: i32,
        hit: bool,
        crit: bool,
    },
    StatusApplied {
        entity: EntityId,
        kind: StatusKind,
        turns: u32,
    },
    StatusExpired {
        entity: EntityId,
        kind: StatusKind,
    },
    EntityDied {
        entity: EntityId,
    },
    EntityRevived {
        entity: EntityId,
        hp: i32,
    },
    Defended {
        entity: EntityId,
    },
    Moved {
        entity: EntityId,
        tile: TileId,
    },
    ItemUsed {
        user: EntityId,
        target: EntityId,
        item: String,
    },
    FleeAttempt {
        chance: i32,
        success: bool,
    },
    LevelUp {
        entity: EntityId,
        report: LevelUpReport,
    },

    // ===== order queue =====
    OrderQueued {
        order: OrderId,
        actor: EntityId,
        kind: CommandKind,
    },
    OrderCancelled {
        order: OrderId,
        actor: EntityId,
    },
    /// The actor died before its order came up.
    OrderDiscarded {
        order: OrderId,
        actor: EntityId,
    },
    /// A special is travelling to its targets. The battle stays in
    /// `SpecialAnimating` until `notify_animation_complete` is called.
    AnimationStarted {
        order: OrderId,
        actor: EntityId,
        targets: Vec<EntityId>,
    },

    BattleEnded {
        outcome: BattleOutcome,
    },
}
