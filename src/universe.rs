use crate::integrator::advance_rk4;
use crate::particle::{ParticleState, ParticleType, TypeId};
use crate::vecmath::{clamp, Vec2};

/// One point in the phase space of the whole population: the ordered
/// collection of every particle's dynamic state.
///
/// Supports element-wise `add` and `scale` so the integrator can treat the
/// population as a single numeric vector.
#[derive(Debug, Clone, Default)]
pub struct UniverseState {
    pub particles: Vec<ParticleState>,
}

impl UniverseState {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Element-wise sum. Mismatched lengths are a caller defect, not a
    /// recoverable condition.
    pub fn add(&self, other: &UniverseState) -> UniverseState {
        debug_assert_eq!(self.particles.len(), other.particles.len());
        let particles = self
            .particles
            .iter()
            .zip(other.particles.iter())
            .map(|(a, b)| a.add(b))
            .collect();
        UniverseState { particles }
    }

    /// Element-wise scalar multiply.
    pub fn scale(&self, scalar: f64) -> UniverseState {
        let particles = self.particles.iter().map(|p| p.scale(scalar)).collect();
        UniverseState { particles }
    }
}

/// The right-hand side of the ODE system: maps a [`UniverseState`] to its
/// time derivative under pairwise forces, the soft boundary walls, and
/// uniform gravity.
///
/// Owns the type catalog and the per-particle type sequence, which is kept
/// index-aligned with the universe's state sequence at all times.
#[derive(Debug, Clone)]
pub struct UniverseDifferentiator {
    pub size_x: f64,
    pub size_y: f64,
    /// Coefficient of the quartic boundary penalty.
    pub force_factor: f64,
    /// Uniform gravity along +y (screen coordinates, y grows downward).
    pub gravity: f64,
    catalog: Vec<ParticleType>,
    types: Vec<TypeId>,
}

impl UniverseDifferentiator {
    pub fn new(size_x: f64, size_y: f64, force_factor: f64, gravity: f64) -> Self {
        Self {
            size_x,
            size_y,
            force_factor,
            gravity,
            catalog: Vec::new(),
            types: Vec::new(),
        }
    }

    /// Adds a species to the catalog and returns its stable id. Catalog
    /// entries are never removed, so ids stay valid while particles
    /// reference them.
    pub fn register_type(&mut self, particle_type: ParticleType) -> TypeId {
        self.catalog.push(particle_type);
        self.catalog.len() - 1
    }

    pub fn particle_type(&self, id: TypeId) -> &ParticleType {
        &self.catalog[id]
    }

    pub fn type_count(&self) -> usize {
        self.catalog.len()
    }

    /// Computes the derivative state: same length and order as the input.
    ///
    /// Every unordered pair is evaluated exactly once and accumulated with
    /// opposite signs (Newton's third law); evaluation is exhaustive O(n^2).
    pub fn derivative(&self, state: &UniverseState) -> UniverseState {
        let n = state.particles.len();
        debug_assert_eq!(n, self.types.len());

        let mut forces = vec![Vec2::zero(); n];
        for i in 0..n {
            let type_i = &self.catalog[self.types[i]];
            for j in 0..i {
                let type_j = &self.catalog[self.types[j]];
                let f = type_i.force_on(type_j, &state.particles[i], &state.particles[j]);
                forces[i] += f;
                forces[j] -= f;
            }

            // Soft walls: zero inside the domain, quartic in the
            // penetration depth outside, always pointing inward.
            let pos = state.particles[i].pos;
            forces[i].x += self.bound_force(-pos.x);
            forces[i].x -= self.bound_force(pos.x - self.size_x);
            forces[i].y += self.bound_force(-pos.y);
            forces[i].y -= self.bound_force(pos.y - self.size_y);

            forces[i].y += self.gravity * type_i.mass;
        }

        let particles = state
            .particles
            .iter()
            .enumerate()
            .map(|(i, p)| p.derivative(forces[i], self.catalog[self.types[i]].mass))
            .collect();
        UniverseState { particles }
    }

    /// Restoring force for a wall crossed by `over_edge` (negative or zero
    /// means the particle is still inside and feels nothing).
    fn bound_force(&self, over_edge: f64) -> f64 {
        if over_edge < 0.0 {
            return 0.0;
        }
        self.force_factor * over_edge * over_edge * over_edge * over_edge
    }
}

/// Owns the current phase-space point and its differentiator, and is the
/// sole mutator of the population.
///
/// Invariant: the per-particle type sequence (held by the differentiator) and
/// the state sequence always have equal length; `add_particle` and
/// `remove_particle` update both as one logical operation.
#[derive(Debug, Clone)]
pub struct Universe {
    state: UniverseState,
    diff: UniverseDifferentiator,
}

impl Universe {
    pub fn new(size_x: f64, size_y: f64, force_factor: f64, gravity: f64) -> Self {
        Self {
            state: UniverseState::default(),
            diff: UniverseDifferentiator::new(size_x, size_y, force_factor, gravity),
        }
    }

    /// Adds a species to the type catalog.
    pub fn register_type(&mut self, particle_type: ParticleType) -> TypeId {
        self.diff.register_type(particle_type)
    }

    pub fn particle_type(&self, id: TypeId) -> &ParticleType {
        self.diff.particle_type(id)
    }

    /// Appends one particle: type sequence and state sequence grow together.
    pub fn add_particle(&mut self, type_id: TypeId, mut state: ParticleState) {
        assert!(type_id < self.diff.type_count(), "unknown particle type id {}", type_id);
        state.type_id = type_id;
        self.diff.types.push(type_id);
        self.state.particles.push(state);
    }

    /// Erases the particle at `index` from both parallel sequences, shifting
    /// every index above it. Out-of-range indices are a caller defect and
    /// panic.
    pub fn remove_particle(&mut self, index: usize) {
        self.diff.types.remove(index);
        self.state.particles.remove(index);
    }

    pub fn len(&self) -> usize {
        self.state.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.particles.is_empty()
    }

    pub fn state(&self, index: usize) -> &ParticleState {
        &self.state.particles[index]
    }

    pub fn state_mut(&mut self, index: usize) -> &mut ParticleState {
        &mut self.state.particles[index]
    }

    /// Iterates over `(type, state)` pairs, e.g. for handing off to a
    /// rendering collaborator.
    pub fn particles(&self) -> impl Iterator<Item = (&ParticleType, &ParticleState)> {
        self.state
            .particles
            .iter()
            .map(|p| (self.diff.particle_type(p.type_id), p))
    }

    pub fn differentiator(&self) -> &UniverseDifferentiator {
        &self.diff
    }

    /// Advances the universe by one fixed RK4 step of size `dt`.
    pub fn advance(&mut self, dt: f64) {
        advance_rk4(&mut self.state, &self.diff, dt);
    }

    /// Clamps a position into `[0, size_x] x [0, size_y]`. Used to keep
    /// interactively spawned particles inside the world; independent of
    /// (and weaker than) the soft boundary force used during integration.
    pub fn clamp_into(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            clamp(pos.x, 0.0, self.diff.size_x),
            clamp(pos.y, 0.0, self.diff.size_y),
        )
    }
}
