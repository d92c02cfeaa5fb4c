use anyhow::Result;
use log::{debug, error, info, trace, warn};
use particle_universe::{
    pointer_stats, Pointer, PointerAction, ParticleState, SimulationConfig, Snapshot, Universe,
    UniverseModifier, Vec2,
};
use rand::distr::Uniform;
use rand::prelude::*;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting Particle Universe...");

    // --- Load Configuration ---
    let config = SimulationConfig::load("config.toml")?;

    // --- Build Universe ---
    let mut universe = Universe::new(
        config.universe.width,
        config.universe.height,
        config.universe.force_factor,
        config.universe.gravity,
    );
    let mut rng = StdRng::seed_from_u64(config.seed);
    place_initial_particles(&mut universe, &config, &mut rng)?;
    info!("Universe initialized with {} particles.", universe.len());

    // --- Scripted Pointer (stands in for the interactive input device) ---
    let (pointer, spawn_type) = match &config.pointer {
        Some(script) => {
            let mut p = Pointer::new(script.action);
            p.set_position(script.x, script.y);
            p.radius = script.radius;
            p.sign = script.sign;
            (p, script.spawn_type)
        }
        None => (Pointer::new(PointerAction::Heat), 0),
    };
    debug!("Pointer script: {:?} (spawn type {})", pointer, spawn_type);

    let mut modifier = UniverseModifier::new(config.modifier.clone(), config.seed);

    // --- Simulation Loop ---
    let dt = config.timing.dt;
    let total_steps = (config.timing.total_time / dt).ceil() as u64;
    let interval_ratio = config.timing.record_interval.max(0.0) / dt;
    if interval_ratio < 1.0 {
        warn!(
            "Record interval ({:.3} s) is smaller than the timestep ({:.3} s). Recording every step.",
            config.timing.record_interval, dt
        );
    }
    let record_interval_steps = interval_ratio.max(1.0).round() as u64;
    info!(
        "Running {} steps, recording every {} steps ({:.3} s).",
        total_steps,
        record_interval_steps,
        record_interval_steps as f64 * dt
    );

    let mut snapshots: Vec<Snapshot> = Vec::new();
    record(&mut snapshots, &universe, &pointer, 0.0, &config);

    let start_time = Instant::now();
    let mut previous_print_time = start_time;

    for step in 0..total_steps {
        let step_start_time = Instant::now();

        modifier.apply(&mut universe, &pointer, dt, spawn_type)?;
        universe.advance(dt);

        let step_duration = step_start_time.elapsed();
        let sim_time = (step + 1) as f64 * dt;

        let now = Instant::now();
        let should_print = now.duration_since(previous_print_time).as_secs_f64() >= 5.0;
        let is_record_step = (step + 1) % record_interval_steps == 0;
        let is_last_step = step == total_steps - 1;

        if should_print || is_record_step || is_last_step {
            info!(
                "Step [{}/{}] ({:.2} s) | Particles: {} | Step Time: {:6.2} ms | Elapsed: {:.2} s",
                step + 1,
                total_steps,
                sim_time,
                universe.len(),
                step_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = now;

            if is_record_step || is_last_step {
                record(&mut snapshots, &universe, &pointer, sim_time, &config);
            }
        } else {
            trace!(
                "Step [{}/{}] completed in {:.2} ms",
                step + 1,
                total_steps,
                step_duration.as_secs_f64() * 1000.0
            );
        }
    }

    info!(
        "Simulation finished in {:.3} seconds.",
        start_time.elapsed().as_secs_f64()
    );

    // --- Save Recorded Data ---
    if config.output.save_stats {
        let filename = format!("{}_snapshots.json", config.output.base_filename);
        match File::create(&filename) {
            Ok(mut file) => match serde_json::to_string(&snapshots) {
                Ok(json_string) => {
                    if let Err(e) = file.write_all(json_string.as_bytes()) {
                        error!("Error writing snapshot JSON to '{}': {}", filename, e);
                    } else {
                        info!("{} snapshots saved to {}", snapshots.len(), filename);
                    }
                }
                Err(e) => error!("Error serializing snapshots to JSON: {}", e),
            },
            Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
        }
    } else {
        info!("Skipping snapshot output as per config (save_stats is false).");
    }

    if config.output.save_positions {
        let filename = format!("{}_final_positions.csv", config.output.base_filename);
        match csv::Writer::from_path(&filename) {
            Ok(mut writer) => {
                writer.write_record(["type", "x", "y", "vx", "vy"])?;
                for (ptype, state) in universe.particles() {
                    writer.write_record(&[
                        ptype.name.clone(),
                        format!("{:.4}", state.pos.x),
                        format!("{:.4}", state.pos.y),
                        format!("{:.4}", state.v.x),
                        format!("{:.4}", state.v.y),
                    ])?;
                }
                writer.flush()?;
                info!("Final positions saved to {}", filename);
            }
            Err(e) => error!("Error saving CSV file '{}': {}", filename, e),
        }
    } else {
        info!("Skipping final positions as per config.");
    }

    info!("Done.");
    Ok(())
}

/// Registers every configured type and scatters its initial population
/// uniformly inside the world bounds.
fn place_initial_particles(
    universe: &mut Universe,
    config: &SimulationConfig,
    rng: &mut StdRng,
) -> Result<()> {
    let dist_x = Uniform::new(0.0, config.universe.width)?;
    let dist_y = Uniform::new(0.0, config.universe.height)?;

    for type_config in &config.particle_types {
        let type_id = universe.register_type(type_config.to_particle_type());
        for _ in 0..type_config.initial_count {
            let pos = Vec2::new(rng.sample(dist_x), rng.sample(dist_y));
            universe.add_particle(type_id, ParticleState::new(type_id, pos));
        }
        debug!(
            "Registered type '{}' with {} initial particles.",
            type_config.name, type_config.initial_count
        );
    }
    Ok(())
}

/// Appends one stats snapshot for the current state.
fn record(
    snapshots: &mut Vec<Snapshot>,
    universe: &Universe,
    pointer: &Pointer,
    time: f64,
    config: &SimulationConfig,
) {
    let positions = if config.output.save_positions_in_snapshot {
        Some(
            universe
                .particles()
                .map(|(_, s)| (s.pos.x, s.pos.y))
                .collect(),
        )
    } else {
        None
    };
    snapshots.push(Snapshot {
        time,
        total_particle_count: universe.len() as u32,
        pointer_stats: pointer_stats(universe, pointer),
        positions,
    });
}
