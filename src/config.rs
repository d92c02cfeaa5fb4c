use crate::particle::ParticleType;
use crate::pointer::PointerAction;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Configuration for world bounds and global force constants
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UniverseConfig {
    pub width: f64,
    pub height: f64,
    /// Coefficient of the quartic soft-wall boundary force.
    pub force_factor: f64,
    /// Uniform gravity along +y (screen coordinates).
    pub gravity: f64,
}

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    /// Fixed integration step (seconds).
    pub dt: f64,
    /// Total simulated time (seconds).
    pub total_time: f64,
    /// How often to record a stats snapshot (seconds).
    pub record_interval: f64,
}

// One species in the type catalog, plus how many particles of it to seed
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ParticleTypeConfig {
    pub name: String,
    pub mass: f64,
    pub radius: f64,
    pub exclusion: f64,
    pub dipole: f64,
    pub range: f64,
    #[serde(default = "default_color")]
    pub color: [u8; 3],
    #[serde(default)]
    pub initial_count: u32,
}

fn default_color() -> [u8; 3] {
    [255, 255, 255]
}

impl ParticleTypeConfig {
    pub fn to_particle_type(&self) -> ParticleType {
        ParticleType {
            name: self.name.clone(),
            mass: self.mass,
            radius: self.radius,
            exclusion: self.exclusion,
            dipole: self.dipole,
            range: self.range,
            color: self.color,
        }
    }
}

/// Rates and coefficients of the interactive modifier. Defaults match the
/// reference tuning.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModifierParams {
    /// Relative velocity change per second under heat mode.
    #[serde(default = "default_heat_rate")]
    pub heat_rate: f64,
    /// Outward radial velocity gain per second under push mode.
    #[serde(default = "default_push_rate")]
    pub push_rate: f64,
    /// Inward radial velocity gain per second under pull.
    #[serde(default = "default_pull_rate")]
    pub pull_rate: f64,
    /// Per-second removal probability under create/spray erase.
    #[serde(default = "default_remove_rate")]
    pub remove_rate: f64,
    /// Particles spawned per step and per unit of pointer radius.
    #[serde(default = "default_spawn_density")]
    pub spawn_density: f64,
    /// Creation ring outer edge as a fraction of the pointer radius.
    #[serde(default = "default_creation_radius_factor")]
    pub creation_radius_factor: f64,
    /// Spray speed as a fraction of the pointer radius per second.
    #[serde(default = "default_spray_speed_factor")]
    pub spray_speed_factor: f64,
}

fn default_heat_rate() -> f64 {
    0.1
}

fn default_push_rate() -> f64 {
    0.5
}

fn default_pull_rate() -> f64 {
    0.2
}

fn default_remove_rate() -> f64 {
    0.5
}

fn default_spawn_density() -> f64 {
    0.04
}

fn default_creation_radius_factor() -> f64 {
    0.8
}

fn default_spray_speed_factor() -> f64 {
    0.08
}

impl Default for ModifierParams {
    fn default() -> Self {
        ModifierParams {
            heat_rate: default_heat_rate(),
            push_rate: default_push_rate(),
            pull_rate: default_pull_rate(),
            remove_rate: default_remove_rate(),
            spawn_density: default_spawn_density(),
            creation_radius_factor: default_creation_radius_factor(),
            spray_speed_factor: default_spray_speed_factor(),
        }
    }
}

// A fixed pointer applied every step of a headless run; stands in for the
// interactive input device.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PointerScript {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// -1, 0 or +1.
    pub sign: i32,
    pub action: PointerAction,
    /// Index into `particle_types` used for spawned particles.
    #[serde(default)]
    pub spawn_type: usize,
}

// Configuration for output settings
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    pub save_stats: bool,
    pub save_positions: bool,
    #[serde(default)]
    pub save_positions_in_snapshot: bool,
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    #[serde(default)]
    pub seed: u64,
    pub universe: UniverseConfig,
    pub timing: TimingConfig,
    pub particle_types: Vec<ParticleTypeConfig>,
    #[serde(default)]
    pub modifier: ModifierParams,
    pub pointer: Option<PointerScript>,
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e)
        })?;
        let config: SimulationConfig = toml::from_str(&config_str).map_err(|e| {
            anyhow::anyhow!("Failed to parse TOML from '{}': {}", path_ref.display(), e)
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the core assumes instead of guarding for them
    /// in the hot path.
    pub fn validate(&self) -> Result<()> {
        if self.universe.width <= 0.0 || self.universe.height <= 0.0 {
            anyhow::bail!("universe dimensions must be positive.");
        }
        if self.timing.dt <= 0.0 {
            anyhow::bail!("timing.dt must be positive.");
        }
        if self.particle_types.is_empty() {
            anyhow::bail!("at least one particle type must be defined.");
        }
        for t in &self.particle_types {
            if t.mass <= 0.0 {
                anyhow::bail!("particle type '{}': mass must be positive.", t.name);
            }
            if t.radius < 0.0 {
                anyhow::bail!("particle type '{}': radius must not be negative.", t.name);
            }
            if t.exclusion < 0.0 {
                anyhow::bail!("particle type '{}': exclusion must not be negative.", t.name);
            }
            if t.range <= 0.0 {
                anyhow::bail!("particle type '{}': range must be positive.", t.name);
            }
        }
        if let Some(pointer) = &self.pointer {
            if pointer.radius <= 0.0 {
                anyhow::bail!("pointer.radius must be positive.");
            }
            if !(-1..=1).contains(&pointer.sign) {
                anyhow::bail!("pointer.sign must be -1, 0 or 1.");
            }
            if pointer.spawn_type >= self.particle_types.len() {
                anyhow::bail!(
                    "pointer.spawn_type {} is out of range ({} types defined).",
                    pointer.spawn_type,
                    self.particle_types.len()
                );
            }
        }
        Ok(())
    }
}
