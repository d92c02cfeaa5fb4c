pub mod config;
pub mod integrator;
pub mod modifier;
pub mod particle;
pub mod pointer;
pub mod stats;
pub mod universe;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{ModifierParams, OutputConfig, PointerScript, SimulationConfig, TimingConfig, UniverseConfig};
pub use integrator::advance_rk4;
pub use modifier::UniverseModifier;
pub use particle::{ParticleState, ParticleType, TypeId};
pub use pointer::{Pointer, PointerAction};
pub use stats::{pointer_stats, region_stats, RegionStats, Snapshot};
pub use universe::{Universe, UniverseDifferentiator, UniverseState};
pub use vecmath::{angle_to_vec, clamp, Vec2};
