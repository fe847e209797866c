use super::World;
use crate::config::StepMode;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default)]
pub struct StepTimings {
    pub decay_us: u64,
    pub agent_update_us: u64,
    pub total_us: u64,
}

impl StepTimings {
    pub fn accumulate(&mut self, other: &StepTimings) {
        self.decay_us += other.decay_us;
        self.agent_update_us += other.agent_update_us;
        self.total_us += other.total_us;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StepMetrics {
    pub step: usize,
    pub field_total: f64,
    pub field_max: f64,
    pub occupied_cells: usize,
    /// Agents currently past a world edge, awaiting their reflected heading.
    pub agents_outside: usize,
    pub mean_heading_length: f64,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub sample_every: usize,
    pub num_agents: usize,
    pub step_mode: StepMode,
    #[serde(default)]
    pub mean_step_us: u64,
    pub samples: Vec<StepMetrics>,
}

impl RunSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl World {
    pub fn collect_step_metrics(&self, step: usize) -> StepMetrics {
        let extent = self.params.extent;
        let agents_outside = self.agents.iter().filter(|a| !a.is_inside(extent)).count();
        let mean_heading_length = if self.agents.is_empty() {
            0.0
        } else {
            self.agents.iter().map(|a| a.heading.length()).sum::<f64>() / self.agents.len() as f64
        };
        StepMetrics {
            step,
            field_total: self.field.total(),
            field_max: self.field.max_value(),
            occupied_cells: self.field.occupied_cells(),
            agents_outside,
            mean_heading_length,
        }
    }
}
