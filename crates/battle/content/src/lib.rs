//! Data-driven battle content.
//!
//! Loads everything a battle is built from out of RON/TOML files:
//! - Battle configuration (TOML)
//! - Player party and enemy party templates (RON)
//! - Board layouts with starting tiles (RON)
//! - The shared item inventory (RON)
//!
//! All loaders deserialize battle-core types directly; only the board has a
//! file-specific shape that is converted on load.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    BoardLayout, BoardLoader, ConfigLoader, ContentFactory, InventoryLoader, LoadResult,
    RosterLoader, TileSpec,
};
