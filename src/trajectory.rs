//! Multi-axis phase synchronization and sampling.
//!
//! Generalizes the teacher's `synchronised::Segment` — which finds the
//! axis with the largest displacement, derives its duration, then rescales
//! every other axis's velocity limit to match — from a fixed 3-DOF
//! `Coord3` to an arbitrary number of jerk-limited axes. The rescaling
//! trick itself doesn't carry over (Step 2's case library already handles
//! an axis finishing early by hitting a non-velocity-saturated case), so
//! synchronization here is simpler: every axis just solves Step 2 at the
//! slowest axis's minimum-time duration.

use log::{debug, info, trace, warn};

use crate::error::TrajectoryError;
use crate::profile::Profile;
use crate::step1::{BangBangStep1, MinimumTimeSolver};
use crate::step2::Step2;
use crate::{validate, AxisLimits, AxisState};

/// How much to stretch `tf` by on each relaxation retry if the dispatcher
/// fails to find an accepting case for some axis at the current duration.
/// This should essentially never trigger per axis monotone feasibility,
/// but guards against the rare case where floating-point slop at the
/// boundary of a case's precondition rejects a candidate that a slightly
/// larger `tf` accepts.
const RELAXATION_FACTOR: f64 = 1.05;
const MAX_RELAXATION_ATTEMPTS: usize = 5;

/// A synchronized multi-axis trajectory: one seven-segment [`Profile`] per
/// axis, all sharing the same total duration `tf`.
#[derive(Debug, Clone)]
pub struct Trajectory {
    profiles: Vec<Profile>,
    tf: f64,
    elapsed: f64,
}

impl Trajectory {
    /// Synchronize a batch of axes: compute each axis's own minimum-time
    /// duration via Step 1, take the maximum across axes as the shared
    /// `tf` (the phase-synchronization rule), then solve Step 2 for every
    /// axis at that `tf`. Retries with a relaxed `tf` if any axis's
    /// dispatcher unexpectedly fails to find an accepting case.
    pub fn synchronize(states: &[AxisState], limits: &[AxisLimits]) -> Result<Self, TrajectoryError> {
        assert_eq!(states.len(), limits.len(), "states and limits must have matching length");

        for (axis, (state, lim)) in states.iter().zip(limits).enumerate() {
            validate(axis, state, lim)?;
        }

        let solver = BangBangStep1;
        let mut tf: f64 = 0.0;
        for (axis, (state, lim)) in states.iter().zip(limits).enumerate() {
            let t_min = solver
                .minimum_time(
                    state.p, state.v, state.a, state.target_p, state.target_v, state.target_a, lim.v_max, lim.a_max,
                    lim.j_max,
                )
                .ok_or(TrajectoryError::NoFeasibleDuration)?;
            trace!("axis {axis}: minimum time {t_min}");
            tf = tf.max(t_min);
        }

        if tf <= 0.0 {
            return Err(TrajectoryError::NoFeasibleDuration);
        }
        info!("synchronized duration tf = {tf}");

        for attempt in 0..=MAX_RELAXATION_ATTEMPTS {
            match Self::solve_all_axes(states, limits, tf) {
                Ok(profiles) => return Ok(Self { profiles, tf, elapsed: 0.0 }),
                Err(axis) if attempt < MAX_RELAXATION_ATTEMPTS => {
                    warn!("axis {axis} infeasible at tf = {tf}, relaxing (attempt {attempt})");
                    tf *= RELAXATION_FACTOR;
                }
                Err(axis) => {
                    return Err(TrajectoryError::Unreachable {
                        axis,
                        tf,
                        attempts: MAX_RELAXATION_ATTEMPTS,
                    })
                }
            }
        }

        unreachable!("loop always returns on the final attempt")
    }

    fn solve_all_axes(states: &[AxisState], limits: &[AxisLimits], tf: f64) -> Result<Vec<Profile>, usize> {
        let mut profiles = Vec::with_capacity(states.len());
        for (axis, (state, lim)) in states.iter().zip(limits).enumerate() {
            let step2 = Step2::new(tf, state.p, state.v, state.a, state.target_p, state.target_v, state.target_a);
            let mut profile = Profile::new(state.p, state.v, state.a);
            if !step2.get_profile(&mut profile, lim.v_max, lim.a_max, lim.j_max) {
                return Err(axis);
            }
            debug!("axis {axis}: profile duration {}", profile.duration());
            profiles.push(profile);
        }
        Ok(profiles)
    }

    /// Shared trajectory duration.
    pub fn tf(&self) -> f64 {
        self.tf
    }

    /// Number of axes in this trajectory.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Sample every axis's state at elapsed time `t` since the start of the
    /// trajectory, clamped to `[0, tf]`.
    pub fn sample(&self, t: f64) -> Vec<AxisState> {
        let t = t.clamp(0.0, self.tf);
        self.profiles
            .iter()
            .map(|p| {
                let (p_, v_, a_) = p.at_time(t);
                AxisState { p: p_, v: v_, a: a_, target_p: 0.0, target_v: 0.0, target_a: 0.0 }
            })
            .collect()
    }

    /// Advance the trajectory's internal clock by `delta_time` and return
    /// the resulting per-axis state, mirroring the control-cycle update
    /// loop described in the spec's external interfaces section. Returns
    /// `(states, finished)` where `finished` is `true` once the internal
    /// clock has reached `tf`.
    pub fn update(&mut self, delta_time: f64) -> (Vec<AxisState>, bool) {
        self.elapsed = (self.elapsed + delta_time).min(self.tf);
        let finished = self.elapsed >= self.tf - 1e-12;
        (self.sample(self.elapsed), finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn rest_state(p: f64, target_p: f64) -> AxisState {
        AxisState { p, v: 0.0, a: 0.0, target_p, target_v: 0.0, target_a: 0.0 }
    }

    fn limits(v_max: f64, a_max: f64, j_max: f64) -> AxisLimits {
        AxisLimits { v_max, a_max, j_max }
    }

    #[test]
    fn synchronizes_to_slowest_axis() {
        let states = vec![rest_state(0.0, 1.0), rest_state(0.0, 20.0)];
        let lims = vec![limits(10.0, 10.0, 40.0), limits(10.0, 10.0, 40.0)];

        let trajectory = Trajectory::synchronize(&states, &lims).expect("feasible");

        // Both axes share the slower axis's duration.
        let fast_axis_state = &trajectory.sample(trajectory.tf())[0];
        assert_approx_eq!(f64, fast_axis_state.p, 1.0, epsilon = 1e-4);
        let slow_axis_state = &trajectory.sample(trajectory.tf())[1];
        assert_approx_eq!(f64, slow_axis_state.p, 20.0, epsilon = 1e-4);
    }

    #[test]
    fn update_reports_finished_at_tf() {
        let states = vec![rest_state(0.0, 5.0)];
        let lims = vec![limits(10.0, 10.0, 40.0)];
        let mut trajectory = Trajectory::synchronize(&states, &lims).expect("feasible");

        let tf = trajectory.tf();
        let (_, finished_early) = trajectory.update(tf / 2.0);
        assert!(!finished_early);

        let (final_states, finished) = trajectory.update(tf);
        assert!(finished);
        assert_approx_eq!(f64, final_states[0].p, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn rejects_mismatched_input_lengths() {
        let states = vec![rest_state(0.0, 1.0)];
        let lims = vec![limits(10.0, 10.0, 40.0), limits(10.0, 10.0, 40.0)];
        let result = std::panic::catch_unwind(|| Trajectory::synchronize(&states, &lims));
        assert!(result.is_err());
    }
}
