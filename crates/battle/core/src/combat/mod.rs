//! Combat math: chances, power formulas, flee odds and the two-step
//! prepare/commit resolver that ties them together.
pub mod damage;
pub mod flee;
pub mod hit;
mod resolver;

pub use damage::Impact;
pub use flee::{flee_chance, roll_flee};
pub use resolver::{ActionResolver, Projection, Resolution, TargetOutcome};
