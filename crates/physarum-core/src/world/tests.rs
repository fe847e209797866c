use super::*;
use crate::config::{SensorSampling, StepMode};

fn single_agent_config() -> SimConfig {
    SimConfig {
        world_width: 800,
        world_height: 800,
        cell_size: 4,
        num_agents: 1,
        agent_speed: 100.0,
        turn_rate: 1.5,
        deposit_rate: 1.0,
        decay: 0.99,
        sensor_distance: 20.0,
        sensor_angle: PI / 5.0,
        sensor_sampling: SensorSampling::Area { radius: 0.1 },
        dt: 1.0 / 60.0,
        ..SimConfig::default()
    }
}

fn small_config(num_agents: usize, step_mode: StepMode) -> SimConfig {
    SimConfig {
        seed: 7,
        world_width: 200,
        world_height: 120,
        cell_size: 4,
        num_agents,
        spawn_radius: 50.0,
        step_mode,
        ..SimConfig::default()
    }
}

#[test]
fn single_agent_scenario_after_one_step() {
    let config = single_agent_config();
    let dt = config.dt;
    let agent = Agent::new(Vec2::new(400.0, 400.0), Vec2::new(0.0, 1.0), 100.0, 1.5);
    let mut world = World::with_agents(config, vec![agent]).unwrap();
    assert_eq!(world.field().columns(), 201);
    assert_eq!(world.field().rows(), 201);

    world.step();

    let moved = &world.agents()[0];
    assert_eq!(moved.heading, Vec2::new(0.0, 1.0));
    assert_eq!(moved.position.x, 400.0);
    assert!((moved.position.y - (400.0 + 100.0 / 60.0)).abs() < 1e-9);

    let (ix, iy) = world.field().cell_of(moved.position).unwrap();
    assert_eq!((ix, iy), (100, 100));
    assert_eq!(world.field().value(ix, iy), Some(dt));
    assert_eq!(world.field().occupied_cells(), 1);
    assert_eq!(world.field().total(), dt);
}

#[test]
fn spawned_agents_start_inside_spawn_disk() {
    let config = small_config(500, StepMode::Sequential);
    let world = World::new(config.clone());
    let centre = Vec2::new(100.0, 60.0);
    assert_eq!(world.agents().len(), 500);
    for agent in world.agents() {
        assert!((agent.position - centre).length() <= config.spawn_radius + 1e-9);
        assert!((agent.heading.length() - 1.0).abs() < 1e-12);
        assert_eq!(agent.speed, config.agent_speed);
        assert_eq!(agent.turn_rate, config.turn_rate);
    }
}

#[test]
fn runs_are_deterministic_for_fixed_seed() {
    for mode in [StepMode::Sequential, StepMode::Parallel] {
        let mut a = World::new(small_config(300, mode));
        let mut b = World::new(small_config(300, mode));
        for _ in 0..50 {
            a.step();
            b.step();
        }
        assert_eq!(a.agents(), b.agents());
        assert_eq!(a.field().values(), b.field().values());
    }
}

#[test]
fn field_stays_non_negative() {
    let mut world = World::new(small_config(400, StepMode::Sequential));
    for _ in 0..300 {
        world.step();
    }
    assert!(world.field().values().iter().all(|&v| v >= 0.0));
    assert!(world.field().total() > 0.0);
}

#[test]
fn decay_happens_before_deposits() {
    let config = SimConfig {
        num_agents: 0,
        decay: 0.5,
        ..single_agent_config()
    };
    let mut world = World::with_agents(config, Vec::new()).unwrap();
    world.field_mut().deposit(Vec2::new(40.0, 40.0), 2.0);
    world.step();
    assert_eq!(world.field().sample_at_point(Vec2::new(40.0, 40.0)), 1.0);
}

#[test]
fn agent_outside_left_edge_reflects_x_only() {
    let (hx, hy) = (0.6, 0.8);
    let config = SimConfig {
        sensor_sampling: SensorSampling::Point,
        ..single_agent_config()
    };
    let agent = Agent::new(Vec2::new(-1e-3, 300.0), Vec2::new(-hx, hy), 100.0, 1.5);
    let mut world = World::with_agents(config, vec![agent]).unwrap();
    world.step();
    let moved = world.agents()[0].clone();
    assert_eq!(moved.heading, Vec2::new(hx, hy));
    assert!(moved.position.x < 0.0);
    // x / cell_size rounds to -0.0, which still lands in column 0.
    let row = (moved.position.y / 4.0).round() as usize;
    assert_eq!(world.field().value(0, row), Some(world.config().deposit_per_step()));

    world.step();
    assert!(world.agents()[0].position.x > moved.position.x);
}

#[test]
fn parallel_step_senses_post_decay_snapshot() {
    let config = small_config(200, StepMode::Parallel);
    let mut world = World::new(config.clone());
    for _ in 0..20 {
        world.step();
    }

    let mut expected_field = world.field().clone();
    expected_field.decay(config.decay);
    let snapshot = expected_field.clone();
    let params = StepParams::from_config(&config);
    let mut expected_agents = world.agents().to_vec();
    for agent in &mut expected_agents {
        agent.plan(&snapshot, &params);
    }
    for agent in &expected_agents {
        expected_field.deposit(agent.position, config.deposit_per_step());
    }

    world.step();
    assert_eq!(world.agents(), expected_agents.as_slice());
    assert_eq!(world.field().values(), expected_field.values());
}

#[test]
fn parallel_step_keeps_every_deposit() {
    let config = small_config(1_000, StepMode::Parallel);
    let mut world = World::new(config.clone());
    world.step();
    assert_eq!(world.collect_step_metrics(1).agents_outside, 0);
    let expected = 1_000.0 * config.deposit_per_step();
    assert!((world.field().total() - expected).abs() < 1e-9);
}

#[test]
fn with_agents_rejects_count_mismatch() {
    let err = World::with_agents(single_agent_config(), Vec::new())
        .err()
        .unwrap();
    assert_eq!(
        err,
        WorldInitError::AgentCountMismatch {
            expected: 1,
            actual: 0
        }
    );
}

#[test]
fn try_new_surfaces_config_errors() {
    let config = SimConfig {
        world_height: 801,
        ..SimConfig::default()
    };
    let err = World::try_new(config).err().unwrap();
    assert!(matches!(err, WorldInitError::Config(_)));
    assert!(err.to_string().contains("not divisible"));
}

#[test]
#[should_panic(expected = "not divisible")]
fn new_panics_on_invalid_grid() {
    let _ = World::new(SimConfig {
        cell_size: 7,
        ..SimConfig::default()
    });
}

#[test]
fn experiment_samples_on_schedule_and_final_step() {
    let mut world = World::new(small_config(50, StepMode::Sequential));
    let summary = world.try_run_experiment(10, 3).unwrap();
    let steps: Vec<usize> = summary.samples.iter().map(|s| s.step).collect();
    assert_eq!(steps, vec![3, 6, 9, 10]);
    assert_eq!(summary.num_agents, 50);
    assert_eq!(world.step_index(), 10);
    assert!(summary.samples.iter().all(|s| s.field_total > 0.0));
}

#[test]
fn experiment_rejects_bad_arguments() {
    let mut world = World::new(small_config(10, StepMode::Sequential));
    assert_eq!(
        world.try_run_experiment(10, 0).unwrap_err(),
        ExperimentError::InvalidSampleEvery
    );
    assert!(matches!(
        world.try_run_experiment(World::MAX_EXPERIMENT_STEPS + 1, 1),
        Err(ExperimentError::TooManySteps { .. })
    ));
    assert!(matches!(
        world.try_run_experiment(World::MAX_EXPERIMENT_SAMPLES + 1, 1),
        Err(ExperimentError::TooManySamples { .. })
    ));
    assert_eq!(world.step_index(), 0);
}

#[test]
fn run_summary_serializes_to_json() {
    let mut world = World::new(small_config(20, StepMode::Parallel));
    let summary = world.run_experiment(4, 2);
    let json = summary.to_json().unwrap();
    let parsed: RunSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.schema_version, 1);
    assert_eq!(parsed.samples.len(), 2);
    assert_eq!(parsed.step_mode, StepMode::Parallel);
}

#[test]
fn positions_view_matches_agents() {
    let world = World::new(small_config(25, StepMode::Sequential));
    let positions: Vec<Vec2> = world.positions().collect();
    assert_eq!(positions.len(), 25);
    assert_eq!(positions[3], world.agents()[3].position);
}

#[test]
fn experiment_callback_sees_every_step() {
    let mut world = World::new(small_config(10, StepMode::Sequential));
    let mut seen = Vec::new();
    world
        .try_run_experiment_with(5, 5, |step, _| seen.push(step))
        .unwrap();
    assert_eq!(seen, vec![1, 2, 3, 4, 5]);
}
