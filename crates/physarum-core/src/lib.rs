//! Trail-following particle simulation in the style of a slime mold.
//!
//! Agents read a shared, decaying pheromone [`field::Field`] through two
//! forward sensors, turn toward the stronger reading, move, reflect off the
//! world edges and deposit trail back into the field. [`world::World`] owns
//! one field and its agents and drives the per-step pipeline.

pub mod agent;
pub mod config;
pub mod field;
pub mod vec2;
pub mod world;

pub use agent::{Agent, Sensors, StepParams, Turn};
pub use config::{SensorSampling, SimConfig, SimConfigError, StepMode};
pub use field::{Field, GridError};
pub use vec2::Vec2;
pub use world::{ExperimentError, RunSummary, StepMetrics, StepTimings, World, WorldInitError};
