use crate::pointer::Pointer;
use crate::universe::Universe;
use crate::vecmath::Vec2;
use serde::{Deserialize, Serialize};

/// Aggregate statistics over the particles inside one influence circle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    /// Number of particle centers inside the circle.
    pub count: u32,
    /// Magnitude of the mass-weighted mean velocity.
    pub mean_velocity: f64,
    /// Kinetic energy relative to the local mean velocity, per particle
    /// (E = kT with two degrees of freedom and k = 1 in natural units).
    pub temperature: f64,
}

/// Computes [`RegionStats`] over the particles within `radius` of `center`.
///
/// An empty region reports all zeros rather than dividing by the zero count.
pub fn region_stats(universe: &Universe, center: Vec2, radius: f64) -> RegionStats {
    let radius_sq = radius * radius;

    let mut count = 0u32;
    let mut mass = 0.0;
    let mut momentum = Vec2::zero();
    for (ptype, state) in universe.particles() {
        if state.pos.distance_squared(center) < radius_sq {
            count += 1;
            mass += ptype.mass;
            momentum += state.v * ptype.mass;
        }
    }
    if count == 0 {
        return RegionStats::default();
    }
    let mean_velocity = momentum / mass;

    let mut energy = 0.0;
    for (ptype, state) in universe.particles() {
        if state.pos.distance_squared(center) < radius_sq {
            energy += (state.v - mean_velocity).length_squared() * ptype.mass / 2.0;
        }
    }

    RegionStats {
        count,
        mean_velocity: mean_velocity.length(),
        temperature: energy / count as f64,
    }
}

/// Statistics over the pointer's current influence circle, as handed to the
/// rendering side each frame.
pub fn pointer_stats(universe: &Universe, pointer: &Pointer) -> RegionStats {
    region_stats(universe, pointer.pos, pointer.radius)
}

/// One recorded data point of a headless run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Simulation time (seconds) at which the snapshot was taken.
    pub time: f64,
    /// Total number of particles in the universe.
    pub total_particle_count: u32,
    /// Statistics over the pointer's influence circle at snapshot time.
    pub pointer_stats: RegionStats,
    /// Optional raw particle positions, included only when configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<(f64, f64)>>,
}
