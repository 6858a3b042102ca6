//! Deterministic turn-order battle engine.
//!
//! `battle-core` owns the rules of a tile-based RPG battle: the speed-gauge
//! clock that decides who acts next, the order queue that serializes actions,
//! and the resolver that turns an action into hit, critical and HP outcomes.
//! All state mutation flows through [`engine::Battle`]; presentation layers
//! drive it with `tick`, feed it player input, and drain [`BattleEvent`]s.
//!
//! The crate performs no I/O. Time only enters through [`engine::Battle::tick`]
//! and randomness only through [`env::RngOracle`].
pub mod behavior;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod state;

pub use behavior::{BehaviorPolicy, Decision};
pub use combat::{ActionResolver, Impact, Projection, Resolution, TargetOutcome};
pub use config::BattleConfig;
pub use engine::{
    Battle, BattleOutcome, BattlePhase, CommandKind, Order, OrderId, OrderPayload, OrderQueue,
    OrderTarget, TargetRef, TurnScheduler,
};
pub use env::{
    Board, BoardOracle, PcgRng, RngOracle, SequenceRng, TerrainTag, Tile, TileEffects, TileId,
};
pub use error::{CommandError, ErrorSeverity};
pub use events::{BattleEvent, ProjectionSummary, TargetPreview};
pub use state::{
    CombatEntity, Condition, EntityId, EntityTemplate, EntityType, GrowthChances, Inventory, Item,
    ItemEffect, LevelUpReport, Loadout, Roster, Side, Special, SpecialClass, SpecialEffect,
    SpecialKind, StatBlock, StatKind, StatusEffect, StatusEffects, StatusKind,
};
