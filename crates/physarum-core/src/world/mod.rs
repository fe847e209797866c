pub mod metrics;
mod step;
#[cfg(test)]
mod tests;

pub use metrics::*;

use crate::agent::{Agent, StepParams};
use crate::config::{SimConfig, SimConfigError};
use crate::field::Field;
use crate::vec2::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::f64::consts::PI;
use std::{error::Error, fmt};
use tracing::debug;

/// One simulation instance: the pheromone field plus every agent that reads
/// and writes it.
pub struct World {
    pub(crate) agents: Vec<Agent>,
    pub(crate) field: Field,
    pub(crate) config: SimConfig,
    pub(crate) params: StepParams,
    pub(crate) step_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(SimConfigError),
    AgentCountMismatch { expected: usize, actual: usize },
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
            WorldInitError::AgentCountMismatch { expected, actual } => write!(
                f,
                "agents.len() ({actual}) must match num_agents ({expected})"
            ),
        }
    }
}

impl From<SimConfigError> for WorldInitError {
    fn from(err: SimConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    InvalidSampleEvery,
    TooManySteps { max: usize, actual: usize },
    TooManySamples { max: usize, actual: usize },
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            ExperimentError::TooManySteps { max, actual } => {
                write!(f, "steps ({actual}) exceed supported maximum ({max})")
            }
            ExperimentError::TooManySamples { max, actual } => {
                write!(
                    f,
                    "sample count ({actual}) exceeds supported maximum ({max})"
                )
            }
        }
    }
}

impl Error for ExperimentError {}

impl World {
    pub const MAX_EXPERIMENT_STEPS: usize = 1_000_000;
    pub const MAX_EXPERIMENT_SAMPLES: usize = 50_000;

    /// Build a world with agents spawned from `config.seed`. Panics on an
    /// invalid config.
    pub fn new(config: SimConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        let agents = Self::spawn_agents(&config);
        Self::with_agents(config, agents)
    }

    /// Build a world around caller-supplied initial agents.
    pub fn with_agents(config: SimConfig, agents: Vec<Agent>) -> Result<Self, WorldInitError> {
        config.validate()?;
        if agents.len() != config.num_agents {
            return Err(WorldInitError::AgentCountMismatch {
                expected: config.num_agents,
                actual: agents.len(),
            });
        }
        let field = Field::try_new(config.world_width, config.world_height, config.cell_size)
            .map_err(SimConfigError::from)?;
        debug!(
            agents = agents.len(),
            columns = field.columns(),
            rows = field.rows(),
            step_mode = ?config.step_mode,
            "world initialised"
        );
        Ok(Self {
            agents,
            field,
            params: StepParams::from_config(&config),
            config,
            step_index: 0,
        })
    }

    /// Scatter `num_agents` agents within `spawn_radius` of the world centre,
    /// each with a uniformly random heading.
    pub fn spawn_agents(config: &SimConfig) -> Vec<Agent> {
        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);
        let centre = Vec2::new(config.world_width as f64, config.world_height as f64).scaled(0.5);
        (0..config.num_agents)
            .map(|_| {
                // Radius is drawn linearly, which concentrates agents near the centre.
                let offset = Vec2::new(rng.random::<f64>() * config.spawn_radius, 0.0)
                    .rotated(rng.random::<f64>() * 2.0 * PI);
                let heading = Vec2::new(0.0, 1.0).rotated(rng.random::<f64>() * 2.0 * PI);
                Agent::new(
                    centre + offset,
                    heading,
                    config.agent_speed,
                    config.turn_rate,
                )
            })
            .collect()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.agents.iter().map(|a| a.position)
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn run_experiment(&mut self, steps: usize, sample_every: usize) -> RunSummary {
        self.try_run_experiment(steps, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        self.try_run_experiment_with(steps, sample_every, |_, _| {})
    }

    /// Run an experiment like `try_run_experiment`, handing each step's index
    /// and timings to `on_step` as it completes.
    pub fn try_run_experiment_with<F>(
        &mut self,
        steps: usize,
        sample_every: usize,
        mut on_step: F,
    ) -> Result<RunSummary, ExperimentError>
    where
        F: FnMut(usize, &StepTimings),
    {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        let estimated_samples = if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        };
        if estimated_samples > Self::MAX_EXPERIMENT_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: Self::MAX_EXPERIMENT_SAMPLES,
                actual: estimated_samples,
            });
        }

        let mut samples = Vec::with_capacity(estimated_samples);
        let mut update_us = 0u64;
        for step in 1..=steps {
            let timings = self.step();
            update_us += timings.total_us;
            on_step(step, &timings);
            if step % sample_every == 0 || step == steps {
                samples.push(self.collect_step_metrics(step));
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            steps,
            sample_every,
            num_agents: self.agents.len(),
            step_mode: self.config.step_mode,
            mean_step_us: if steps > 0 { update_us / steps as u64 } else { 0 },
            samples,
        })
    }
}
