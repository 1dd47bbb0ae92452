//! Time-optimal, jerk-limited trajectory generation for multi-DOF
//! mechanisms.
//!
//! The core is the Step 2 solver ([`step2::Step2`]): given a fixed
//! synchronization duration and one axis's boundary conditions and
//! limits, it synthesizes a seven-segment bang-bang jerk [`profile::Profile`]
//! reaching the target in exactly that duration. [`step1`] estimates each
//! axis's own minimum feasible duration; [`trajectory::Trajectory`]
//! synchronizes a batch of axes onto the slowest one's duration and drives
//! the per-cycle sampling loop.
//!
//! ```
//! use float_cmp::assert_approx_eq;
//! use trajgen::{synchronize, AxisState, AxisLimits};
//!
//! let states = [AxisState { p: 0.0, v: 0.0, a: 0.0, target_p: 10.0, target_v: 0.0, target_a: 0.0 }];
//! let limits = [AxisLimits { v_max: 5.0, a_max: 10.0, j_max: 40.0 }];
//!
//! let trajectory = synchronize(&states, &limits).unwrap();
//! let at_start = &trajectory.sample(0.0)[0];
//! assert_approx_eq!(f64, at_start.p, 0.0, epsilon = 1e-9);
//! ```

pub mod error;
pub mod profile;
pub mod roots;
pub mod step1;
pub mod step2;
pub mod trajectory;

pub use error::TrajectoryError;
pub use profile::{ControlSigns, Profile};
pub use step1::{BangBangStep1, MinimumTimeSolver};
pub use step2::Step2;
pub use trajectory::Trajectory;

/// One axis's current kinematic state and target boundary state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisState {
    pub p: f64,
    pub v: f64,
    pub a: f64,
    pub target_p: f64,
    pub target_v: f64,
    pub target_a: f64,
}

/// One axis's kinematic limits. All three fields must be finite and
/// strictly positive; see [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisLimits {
    pub v_max: f64,
    pub a_max: f64,
    pub j_max: f64,
}

/// Validate one axis's boundary state and limits before any solver runs.
///
/// Checks finiteness of every state component and finiteness-and-positivity
/// of every limit, per the distilled spec's "ill-posed input" section.
/// Step 2 itself does not perform these checks — by contract it assumes
/// well-posed input and returns a plain `bool` for feasibility at a given
/// `tf`, not for input sanity.
pub fn validate(axis: usize, state: &AxisState, limits: &AxisLimits) -> Result<(), TrajectoryError> {
    for (field, value) in [
        ("p", state.p),
        ("v", state.v),
        ("a", state.a),
        ("target_p", state.target_p),
        ("target_v", state.target_v),
        ("target_a", state.target_a),
    ] {
        if !value.is_finite() {
            return Err(TrajectoryError::NonFiniteState { axis, field, value });
        }
    }

    for (field, value) in [("v_max", limits.v_max), ("a_max", limits.a_max), ("j_max", limits.j_max)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(TrajectoryError::InvalidLimit { axis, field, value });
        }
    }

    if state.v.abs() > limits.v_max + 1e-9 {
        return Err(TrajectoryError::InvalidLimit { axis, field: "v_max", value: limits.v_max });
    }
    if state.a.abs() > limits.a_max + 1e-9 {
        return Err(TrajectoryError::InvalidLimit { axis, field: "a_max", value: limits.a_max });
    }

    Ok(())
}

/// Synchronize a batch of axes into one shared-duration [`Trajectory`].
/// Thin wrapper over [`Trajectory::synchronize`] kept at the crate root so
/// callers don't need to import the `trajectory` module directly.
pub fn synchronize(states: &[AxisState], limits: &[AxisLimits]) -> Result<Trajectory, TrajectoryError> {
    Trajectory::synchronize(states, limits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_non_finite_state() {
        let state = AxisState { p: f64::NAN, ..Default::default() };
        let limits = AxisLimits { v_max: 1.0, a_max: 1.0, j_max: 1.0 };
        assert!(validate(0, &state, &limits).is_err());
    }

    #[test]
    fn validate_rejects_zero_limit() {
        let state = AxisState::default();
        let limits = AxisLimits { v_max: 0.0, a_max: 1.0, j_max: 1.0 };
        assert!(validate(0, &state, &limits).is_err());
    }

    #[test]
    fn validate_accepts_well_posed_input() {
        let state = AxisState { target_p: 10.0, ..Default::default() };
        let limits = AxisLimits { v_max: 5.0, a_max: 10.0, j_max: 40.0 };
        assert!(validate(0, &state, &limits).is_ok());
    }
}
