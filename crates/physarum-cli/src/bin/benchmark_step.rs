use physarum_core::{SimConfig, StepMode, World};
use std::time::Instant;

fn main() {
    let num_agents = 200_000;
    println!(
        "Benchmarking {} agents on a 1600x1600 world (cell size 4)",
        num_agents
    );

    let base = SimConfig {
        world_width: 1600,
        world_height: 1600,
        num_agents,
        spawn_radius: 600.0,
        seed: 42,
        ..SimConfig::default()
    };
    let mut sequential = World::new(SimConfig {
        step_mode: StepMode::Sequential,
        ..base.clone()
    });
    let mut parallel = World::new(SimConfig {
        step_mode: StepMode::Parallel,
        ..base
    });

    let steps = 120;

    let start = Instant::now();
    for _ in 0..steps {
        sequential.step();
    }
    let duration_sequential = start.elapsed();
    println!("Time for {} steps SEQUENTIAL: {:?}", steps, duration_sequential);
    println!(
        "Avg time per step (sequential): {:?}",
        duration_sequential / steps as u32
    );

    let start = Instant::now();
    for _ in 0..steps {
        parallel.step();
    }
    let duration_parallel = start.elapsed();
    println!("Time for {} steps PARALLEL: {:?}", steps, duration_parallel);
    println!(
        "Avg time per step (parallel): {:?}",
        duration_parallel / steps as u32
    );

    println!(
        "Speedup: {:.2}x",
        duration_sequential.as_secs_f64() / duration_parallel.as_secs_f64().max(f64::EPSILON)
    );
    println!(
        "Field totals: sequential {:.4}, parallel {:.4}",
        sequential.field().total(),
        parallel.field().total()
    );
}
