use crate::config::ModifierParams;
use crate::particle::{ParticleState, TypeId};
use crate::pointer::{Pointer, PointerAction};
use crate::universe::Universe;
use crate::vecmath::angle_to_vec;
use anyhow::Result;
use rand::distr::Uniform;
use rand::prelude::*;
use rand_distr::Triangular;
use std::f64::consts::TAU;

/// Translates the per-frame pointer snapshot into physical perturbations:
/// heating, pushing/pulling, stochastic removal, and spawning.
///
/// Owns its own seeded RNG so runs are reproducible and tests don't share
/// process-wide random state.
pub struct UniverseModifier {
    params: ModifierParams,
    rng: StdRng,
}

impl UniverseModifier {
    pub fn new(params: ModifierParams, seed: u64) -> Self {
        Self {
            params,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Applies one frame of interactive modification. A neutral pointer
    /// (`sign == 0`) short-circuits everything; otherwise existing particles
    /// are perturbed first, then new ones are spawned, so a create-mode pull
    /// only acts on particles that were present before this step's spawns.
    pub fn apply(
        &mut self,
        universe: &mut Universe,
        pointer: &Pointer,
        dt: f64,
        spawn_type: TypeId,
    ) -> Result<()> {
        if pointer.sign == 0 {
            return Ok(());
        }

        self.modify_existing(universe, pointer, dt);
        self.spawn_new(universe, pointer, spawn_type)
    }

    /// Per-mode effect on every particle inside the influence circle.
    /// Removal shifts indices, so the loop only advances when the particle
    /// at `i` survived.
    fn modify_existing(&mut self, universe: &mut Universe, pointer: &Pointer, dt: f64) {
        let radius_sq = pointer.radius * pointer.radius;
        let mut i = 0;
        while i < universe.len() {
            if universe.state(i).pos.distance_squared(pointer.pos) >= radius_sq {
                i += 1;
                continue;
            }

            match pointer.action {
                PointerAction::Heat => {
                    // sign < 0 makes the factor shrink velocities: cooling.
                    let factor = 1.0 + pointer.sign as f64 * self.params.heat_rate * dt;
                    universe.state_mut(i).v *= factor;
                }
                PointerAction::Push => {
                    if pointer.sign > 0 {
                        let outward = (universe.state(i).pos - pointer.pos)
                            * (self.params.push_rate * dt / pointer.radius);
                        universe.state_mut(i).v += outward;
                    } else {
                        self.pull_and_damp(universe, i, pointer, dt);
                    }
                }
                PointerAction::Create => {
                    if pointer.sign < 0 {
                        self.pull_and_damp(universe, i, pointer, dt);
                        if self.roll_removal(dt) {
                            universe.remove_particle(i);
                            continue;
                        }
                    }
                }
                PointerAction::Spray => {
                    if pointer.sign < 0 && self.roll_removal(dt) {
                        universe.remove_particle(i);
                        continue;
                    }
                }
            }

            i += 1;
        }
    }

    /// Inward radial pull followed by mild damping; shared by the negative
    /// branches of push and create.
    fn pull_and_damp(&self, universe: &mut Universe, index: usize, pointer: &Pointer, dt: f64) {
        let inward = (universe.state(index).pos - pointer.pos)
            * (self.params.pull_rate * dt / pointer.radius);
        let state = universe.state_mut(index);
        state.v -= inward;
        state.v *= 1.0 - self.params.heat_rate * dt;
    }

    /// Shared create/spray erase branch: one independent trial per in-radius
    /// particle per step with probability `remove_rate * dt`.
    fn roll_removal(&mut self, dt: f64) -> bool {
        self.rng.random::<f64>() < self.params.remove_rate * dt
    }

    /// Spawn pass, only active while the primary button is held.
    fn spawn_new(
        &mut self,
        universe: &mut Universe,
        pointer: &Pointer,
        spawn_type: TypeId,
    ) -> Result<()> {
        if pointer.sign <= 0 {
            return Ok(());
        }

        let angle_dist = Uniform::new(0.0, TAU)?;
        match pointer.action {
            PointerAction::Create => {
                // Radial density rises linearly from the center, so new
                // particles concentrate toward the ring's outer edge.
                let outer = self.params.creation_radius_factor * pointer.radius;
                let radial = Triangular::new(0.0, outer, outer)?;
                let count = (self.params.spawn_density * pointer.radius) as usize + 1;
                for _ in 0..count {
                    let phi = self.rng.sample(angle_dist);
                    let r = self.rng.sample(radial);
                    let pos = universe.clamp_into(pointer.pos + angle_to_vec(phi) * r);
                    universe.add_particle(spawn_type, ParticleState::new(spawn_type, pos));
                }
            }
            PointerAction::Spray => {
                let phi = self.rng.sample(angle_dist);
                let v = angle_to_vec(phi) * (self.params.spray_speed_factor * pointer.radius);
                let state = ParticleState::with_velocity(spawn_type, pointer.pos, v);
                universe.add_particle(spawn_type, state);
            }
            PointerAction::Heat | PointerAction::Push => {}
        }
        Ok(())
    }
}
