//! Error infrastructure for battle-core.
//!
//! Input operations on [`crate::engine::Battle`] return `Result<_, CommandError>`.
//! An `Err` always means the request was rejected **without any state change**,
//! so a presentation layer that only gates button availability may simply
//! discard it. Data invariant violations (HP out of range, negative stats) are
//! clamped where they happen and never surface as errors.

use crate::engine::{BattlePhase, CommandKind};
use crate::state::{EntityId, SpecialClass};

/// Severity level of a rejected command.
///
/// - **Ignored**: the input was not legal in the current phase; the UI should
///   not have offered it and nothing needs to be shown.
/// - **Recoverable**: the input was legal but pointed at something unusable
///   (dead target, empty slot, ability on cooldown); the selection stays open
///   so the player or AI can pick again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Ignored,
    Recoverable,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::Recoverable => "recoverable",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Reasons a command, selection, or confirmation was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    // ========================================================================
    // Invalid transitions
    // ========================================================================
    #[error("{action} is not available during {phase}")]
    InvalidPhase {
        action: &'static str,
        phase: BattlePhase,
    },

    #[error("no entity is currently selected")]
    NoActiveEntity,

    // ========================================================================
    // Invalid targets
    // ========================================================================
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),

    #[error("entity {0} is not ready to act")]
    NotReady(EntityId),

    #[error("entity {0} is not controlled by the player")]
    NotPlayerControlled(EntityId),

    #[error("entity {0} cannot be targeted")]
    InvalidTarget(EntityId),

    #[error("tile {0} does not exist or is occupied")]
    InvalidTile(u32),

    #[error("no {class} in slot {index}")]
    EmptySlot { class: SpecialClass, index: usize },

    #[error("no item in slot {0}")]
    EmptyItemSlot(usize),

    #[error("item in slot {0} is out of stock")]
    OutOfStock(usize),

    #[error("order {0} is not queued")]
    UnknownOrder(u64),

    // ========================================================================
    // Resource exhaustion
    // ========================================================================
    #[error("{0} has no abilities for {1}")]
    NoAbilities(EntityId, CommandKind),

    #[error("tech abilities recharge for {remaining} more turns")]
    TechRecharging { remaining: u32 },

    #[error("spell costs {cost} HP but only {hp} HP remain")]
    InsufficientHp { cost: i32, hp: i32 },

    #[error("inventory is empty")]
    EmptyInventory,
}

impl CommandError {
    pub fn invalid_phase(action: &'static str, phase: BattlePhase) -> Self {
        Self::InvalidPhase { action, phase }
    }

    /// Returns the severity level of this rejection.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidPhase { .. } | Self::NoActiveEntity => ErrorSeverity::Ignored,
            _ => ErrorSeverity::Recoverable,
        }
    }

    /// Returns a static identifier for this rejection, for logs and tests.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPhase { .. } => "invalid_phase",
            Self::NoActiveEntity => "no_active_entity",
            Self::UnknownEntity(_) => "unknown_entity",
            Self::NotReady(_) => "not_ready",
            Self::NotPlayerControlled(_) => "not_player_controlled",
            Self::InvalidTarget(_) => "invalid_target",
            Self::InvalidTile(_) => "invalid_tile",
            Self::EmptySlot { .. } => "empty_slot",
            Self::EmptyItemSlot(_) => "empty_item_slot",
            Self::OutOfStock(_) => "out_of_stock",
            Self::UnknownOrder(_) => "unknown_order",
            Self::NoAbilities(..) => "no_abilities",
            Self::TechRecharging { .. } => "tech_recharging",
            Self::InsufficientHp { .. } => "insufficient_hp",
            Self::EmptyInventory => "empty_inventory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_errors_are_ignored_and_target_errors_recoverable() {
        let phase = CommandError::invalid_phase("confirm", BattlePhase::Normal);
        assert_eq!(phase.severity(), ErrorSeverity::Ignored);
        assert!(!phase.severity().is_recoverable());

        let target = CommandError::InvalidTarget(EntityId(3));
        assert_eq!(target.severity(), ErrorSeverity::Recoverable);
        assert_eq!(target.error_code(), "invalid_target");
    }

    #[test]
    fn messages_name_the_phase() {
        let err = CommandError::invalid_phase("confirm", BattlePhase::Animating);
        assert_eq!(err.to_string(), "confirm is not available during animating");
    }
}
