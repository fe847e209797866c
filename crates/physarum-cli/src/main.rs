mod snapshot;

use anyhow::{Context, Result};
use clap::Parser;
use physarum_core::{SensorSampling, SimConfig, StepMode, StepTimings, World};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Steps per profiling window.
const PROFILE_WINDOW: usize = 120;

#[derive(Parser, Debug)]
#[command(name = "physarum", about = "Headless slime-mold trail simulation")]
struct Args {
    /// World size X
    #[arg(long, default_value_t = 800)]
    screen_x: u32,
    /// World size Y
    #[arg(long, default_value_t = 800)]
    screen_y: u32,
    /// Number of particles to simulate
    #[arg(long, default_value_t = 20_000)]
    num: usize,
    /// The speed of each particle
    #[arg(long, default_value_t = 100.0)]
    particle_speed: f64,
    /// The rotational speed of each particle
    #[arg(long, default_value_t = 1.5)]
    particle_rotation: f64,
    /// The size in world units of the pheromone chunks
    #[arg(long, default_value_t = 4)]
    chunk_size: u32,
    /// Rate of dropping pheromones
    #[arg(long, default_value_t = 1.0)]
    pher_rate: f64,
    /// Decay multiplier of pheromones per step
    #[arg(long, default_value_t = 0.99)]
    pher_decay: f64,
    /// Periodically log per-step timing averages
    #[arg(long)]
    prof: bool,
    /// Number of steps to run
    #[arg(long, default_value_t = 600)]
    steps: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Sense and move agents in parallel
    #[arg(long)]
    parallel: bool,
    /// Average sensor readings over this radius instead of a single cell
    #[arg(long)]
    sensor_radius: Option<f64>,
    #[arg(long, default_value_t = 60)]
    sample_every: usize,
    /// Write the run summary as JSON
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Write the final field as a PGM image
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

impl Args {
    fn to_config(&self) -> SimConfig {
        SimConfig {
            seed: self.seed,
            world_width: self.screen_x,
            world_height: self.screen_y,
            cell_size: self.chunk_size,
            num_agents: self.num,
            agent_speed: self.particle_speed,
            turn_rate: self.particle_rotation,
            deposit_rate: self.pher_rate,
            decay: self.pher_decay,
            sensor_sampling: match self.sensor_radius {
                Some(radius) => SensorSampling::Area { radius },
                None => SensorSampling::Point,
            },
            step_mode: if self.parallel {
                StepMode::Parallel
            } else {
                StepMode::Sequential
            },
            ..SimConfig::default()
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = args.to_config();
    let mut world = World::try_new(config).context("invalid simulation parameters")?;
    info!(
        agents = world.agents().len(),
        columns = world.field().columns(),
        rows = world.field().rows(),
        steps = args.steps,
        "starting simulation"
    );

    let mut window = StepTimings::default();
    let summary = world.try_run_experiment_with(args.steps, args.sample_every, |step, timings| {
        window.accumulate(timings);
        if step % PROFILE_WINDOW == 0 {
            if args.prof {
                let n = PROFILE_WINDOW as u64;
                info!(
                    step,
                    decay_us = window.decay_us / n,
                    update_us = window.agent_update_us / n,
                    total_us = window.total_us / n,
                    "per step"
                );
            }
            window = StepTimings::default();
        }
    })?;

    if let Some(last) = summary.samples.last() {
        info!(
            step = last.step,
            field_total = last.field_total,
            field_max = last.field_max,
            occupied_cells = last.occupied_cells,
            agents_outside = last.agents_outside,
            "finished"
        );
    }

    if let Some(path) = &args.summary {
        let json = summary.to_json().context("failed to serialize run summary")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
    }
    if let Some(path) = &args.snapshot {
        snapshot::write_pgm(world.field(), path)?;
    }
    Ok(())
}
