//! Headless battle simulator.
//!
//! Loads a content directory with `battle-content`, hands every combatant to
//! an AI policy and ticks the battle until one side wins, logging each event
//! through `tracing`.
mod config;
mod runner;

pub use config::SimConfig;
pub use runner::{SimReport, Survivor, automate, run, simulate};
