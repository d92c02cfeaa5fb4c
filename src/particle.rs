use crate::vecmath::Vec2;
use serde::{Deserialize, Serialize};

/// Stable identifier of a [`ParticleType`] in the universe's type catalog.
///
/// Particles reference their species through this index instead of holding a
/// pointer into the catalog; the catalog never removes entries, so the index
/// stays valid for the lifetime of the universe.
pub type TypeId = usize;

/// Immutable species descriptor: physical parameters shared by every particle
/// of one type, plus the color the rendering side draws it with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleType {
    pub name: String,
    /// Mass, must be positive.
    pub mass: f64,
    /// Hard-core radius; repulsion ramps up once two particles are closer
    /// than the sum of their radii.
    pub radius: f64,
    /// Short-range repulsion strength. The pair force uses the product of
    /// both types' exclusion constants.
    pub exclusion: f64,
    /// Long-range (dipole) interaction strength; the pair force uses the
    /// product of both moments, positive product attracts.
    pub dipole: f64,
    /// Outer edge of the dipole window, must be positive.
    pub range: f64,
    /// Display color as RGB.
    pub color: [u8; 3],
}

impl ParticleType {
    pub fn new(
        name: impl Into<String>,
        mass: f64,
        radius: f64,
        exclusion: f64,
        dipole: f64,
        range: f64,
    ) -> Self {
        Self {
            name: name.into(),
            mass,
            radius,
            exclusion,
            dipole,
            range,
            color: [255, 255, 255],
        }
    }

    /// Force exerted on a particle of this type by `other`, evaluated from
    /// the two positions. Positive scalar magnitude repels, so the returned
    /// vector points from `other_state` toward `my_state` when the pair is
    /// inside the repulsive core.
    ///
    /// Coincident positions yield the zero vector; the direction is undefined
    /// there and the repulsive term dominates that limit in practice.
    pub fn force_on(
        &self,
        other: &ParticleType,
        my_state: &ParticleState,
        other_state: &ParticleState,
    ) -> Vec2 {
        let delta = my_state.pos - other_state.pos;
        let dist = delta.length();
        if dist == 0.0 {
            return Vec2::zero();
        }

        let total_radius = self.radius + other.radius;
        let outer_range = self.range.max(other.range);
        let magnitude = self.force_magnitude(other, total_radius, outer_range, dist);
        delta * (magnitude / dist)
    }

    /// Scalar force along the separation axis. The magnitude is symmetric in
    /// the two types, which is what makes the pair forces obey Newton's
    /// third law exactly.
    fn force_magnitude(
        &self,
        other: &ParticleType,
        total_radius: f64,
        outer_range: f64,
        dist: f64,
    ) -> f64 {
        let mut magnitude = 0.0;

        // Hard-core exclusion: zero with zero slope at contact, divergent
        // as the separation goes to zero.
        if dist < total_radius {
            let overlap = total_radius / dist - 1.0;
            magnitude += self.exclusion * other.exclusion * overlap * overlap;
        }

        // Dipole window between contact and the outer range, gated to zero
        // at both ends so the curve stays C1 across the window boundaries.
        if dist > total_radius && dist < outer_range {
            let t = (dist - total_radius) / (outer_range - total_radius);
            magnitude -= self.dipole * other.dipole * smooth_bump(t);
        }

        magnitude
    }
}

/// Quintic smootherstep: 0 below 0, 1 above 1, C1-continuous blend between.
fn super_smooth_zero_to_one(x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else if x >= 1.0 {
        1.0
    } else {
        x * x * x * (x * (x * 6.0 - 15.0) + 10.0)
    }
}

/// Smooth trapezoid on [0, 1]: rises over the first half, falls over the
/// second, zero slope at both ends.
fn smooth_bump(t: f64) -> f64 {
    super_smooth_zero_to_one(2.0 * t) * super_smooth_zero_to_one(2.0 - 2.0 * t)
}

/// Per-particle dynamic state: position and velocity, plus the index of its
/// species in the type catalog.
///
/// The numeric part forms a vector space (`add`/`scale`), which is what the
/// integrator advances; the type index rides along unchanged and is never
/// part of the integrated quantity.
#[derive(Debug, Clone, Copy)]
pub struct ParticleState {
    pub type_id: TypeId,
    pub pos: Vec2,
    pub v: Vec2,
}

impl ParticleState {
    pub fn new(type_id: TypeId, pos: Vec2) -> Self {
        Self { type_id, pos, v: Vec2::zero() }
    }

    pub fn with_velocity(type_id: TypeId, pos: Vec2, v: Vec2) -> Self {
        Self { type_id, pos, v }
    }

    /// Element-wise sum; the type index is taken from `self`.
    pub fn add(&self, other: &ParticleState) -> ParticleState {
        ParticleState {
            type_id: self.type_id,
            pos: self.pos + other.pos,
            v: self.v + other.v,
        }
    }

    /// Element-wise scalar multiply.
    pub fn scale(&self, scalar: f64) -> ParticleState {
        ParticleState {
            type_id: self.type_id,
            pos: self.pos * scalar,
            v: self.v * scalar,
        }
    }

    /// Phase-space derivative under the given accumulated force:
    /// d(pos)/dt = v, d(v)/dt = force / mass.
    pub fn derivative(&self, force: Vec2, mass: f64) -> ParticleState {
        ParticleState {
            type_id: self.type_id,
            pos: self.v,
            v: force / mass,
        }
    }
}
