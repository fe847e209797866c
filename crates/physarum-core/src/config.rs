use crate::field::{Field, GridError};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::{error::Error, fmt};

/// How a sensor reads the field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SensorSampling {
    /// Value of the nearest cell.
    Point,
    /// Mean over the square cell window covering `radius`.
    Area { radius: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMode {
    /// Agents sense, move and deposit one after another.
    Sequential,
    /// Agents sense and move in parallel against the post-decay field, then
    /// deposit serially.
    Parallel,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for agent spawning.
    pub seed: u64,
    /// World extent along X in world units.
    pub world_width: u32,
    /// World extent along Y in world units.
    pub world_height: u32,
    /// World units per field cell. Must divide both world extents.
    pub cell_size: u32,
    pub num_agents: usize,
    /// World units per unit time.
    pub agent_speed: f64,
    /// Radians per unit time available for steering.
    pub turn_rate: f64,
    /// Trail deposited per unit time.
    pub deposit_rate: f64,
    /// Per-step field multiplier.
    pub decay: f64,
    pub sensor_distance: f64,
    /// Sensor offset from the heading, radians.
    pub sensor_angle: f64,
    pub sensor_sampling: SensorSampling,
    /// Agents spawn within this distance of the world centre.
    pub spawn_radius: f64,
    /// Fixed simulation timestep.
    pub dt: f64,
    pub step_mode: StepMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            world_width: 800,
            world_height: 800,
            cell_size: 4,
            num_agents: 20_000,
            agent_speed: 100.0,
            turn_rate: 1.5,
            deposit_rate: 1.0,
            decay: 0.99,
            sensor_distance: 20.0,
            sensor_angle: PI / 5.0,
            sensor_sampling: SensorSampling::Point,
            spawn_radius: 200.0,
            dt: 1.0 / 60.0,
            step_mode: StepMode::Sequential,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    Grid(GridError),
    TooManyAgents { max: usize, actual: usize },
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::Grid(e) => write!(f, "{e}"),
            SimConfigError::TooManyAgents { max, actual } => {
                write!(f, "num_agents ({actual}) exceeds supported maximum ({max})")
            }
        }
    }
}

impl From<GridError> for SimConfigError {
    fn from(err: GridError) -> Self {
        SimConfigError::Grid(err)
    }
}

impl Error for SimConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SimConfigError::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl SimConfig {
    pub const MAX_TOTAL_AGENTS: usize = 5_000_000;

    /// Startup validation. Only the grid geometry and the agent cap are
    /// checked; numeric tuning parameters pass through unvalidated.
    pub fn validate(&self) -> Result<(), SimConfigError> {
        Field::check_dimensions(self.world_width, self.world_height, self.cell_size)?;
        if self.num_agents > Self::MAX_TOTAL_AGENTS {
            return Err(SimConfigError::TooManyAgents {
                max: Self::MAX_TOTAL_AGENTS,
                actual: self.num_agents,
            });
        }
        Ok(())
    }

    /// Parse a JSON config; missing keys take their default values.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Trail amount each agent adds per step.
    pub fn deposit_per_step(&self) -> f64 {
        self.deposit_rate * self.dt
    }
}
