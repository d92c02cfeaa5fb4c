//! Fixed-step time integration for the universe.
//!
//! A single classical fourth-order Runge–Kutta scheme over the vector space
//! of [`UniverseState`]; the caller supplies `dt` each step and no adaptation
//! or stability detection is performed.

use crate::universe::{UniverseDifferentiator, UniverseState};

/// Advance `state` in place by one RK4 step of size `dt`, using four
/// derivative evaluations:
///
/// ```text
/// k1 = f(s)
/// k2 = f(s + k1 * dt/2)
/// k3 = f(s + k2 * dt/2)
/// k4 = f(s + k3 * dt)
/// s' = s + (k1 + 2 k2 + 2 k3 + k4) * dt/6
/// ```
pub fn advance_rk4(state: &mut UniverseState, diff: &UniverseDifferentiator, dt: f64) {
    if state.is_empty() {
        return;
    }

    let k1 = diff.derivative(state);
    let k2 = diff.derivative(&state.add(&k1.scale(dt / 2.0)));
    let k3 = diff.derivative(&state.add(&k2.scale(dt / 2.0)));
    let k4 = diff.derivative(&state.add(&k3.scale(dt)));

    let weighted = k1.add(&k2.scale(2.0)).add(&k3.scale(2.0)).add(&k4);
    *state = state.add(&weighted.scale(dt / 6.0));
}
