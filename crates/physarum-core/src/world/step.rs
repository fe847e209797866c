use super::metrics::StepTimings;
use super::World;
use crate::config::StepMode;
use rayon::prelude::*;
use std::time::Instant;
use tracing::trace;

impl World {
    fn step_decay_phase(&mut self) {
        self.field.decay(self.config.decay);
    }

    /// Reference ordering: each agent senses the field including deposits
    /// already made by agents earlier in this step.
    fn step_sequential_agent_phase(&mut self) {
        let deposit = self.config.deposit_per_step();
        let params = self.params;
        for agent in &mut self.agents {
            agent.update(&mut self.field, &params, deposit);
        }
    }

    /// Every agent senses the same post-decay field; deposits are applied
    /// afterwards in agent order so none can be lost.
    fn step_parallel_agent_phase(&mut self) {
        let deposit = self.config.deposit_per_step();
        let params = self.params;
        let field = &self.field;
        self.agents
            .par_iter_mut()
            .for_each(|agent| agent.plan(field, &params));

        for agent in &self.agents {
            self.field.deposit(agent.position, deposit);
        }
    }

    pub fn step(&mut self) -> StepTimings {
        let total_start = Instant::now();
        self.step_index = self.step_index.saturating_add(1);

        let t0 = Instant::now();
        self.step_decay_phase();
        let decay_us = t0.elapsed().as_micros() as u64;

        let t1 = Instant::now();
        match self.config.step_mode {
            StepMode::Sequential => self.step_sequential_agent_phase(),
            StepMode::Parallel => self.step_parallel_agent_phase(),
        }
        let agent_update_us = t1.elapsed().as_micros() as u64;

        let timings = StepTimings {
            decay_us,
            agent_update_us,
            total_us: total_start.elapsed().as_micros() as u64,
        };
        trace!(step = self.step_index, ?timings, "step complete");
        timings
    }
}
