//! Collaborators the rules read from but never own.
//!
//! The board answers terrain queries and randomness comes from an
//! [`RngOracle`], so both can be replaced by scripted versions in tests.
mod board;
mod rng;

pub use board::{Board, BoardOracle, TerrainTag, Tile, TileEffects, TileId};
pub use rng::{PcgRng, RngOracle, SequenceRng};
