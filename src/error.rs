//! Crate-level error types.
//!
//! Step 2 itself never returns a [`TrajectoryError`] — its contract is the
//! plain `bool` accept/reject described in the module docs, and ill-posed
//! input is explicitly not guarded inside the core. Validation lives at the
//! crate boundary instead, where callers assemble an [`AxisState`] /
//! [`AxisLimits`] pair before ever constructing a solver.
//!
//! [`AxisState`]: crate::AxisState
//! [`AxisLimits`]: crate::AxisLimits

use thiserror::Error;

/// Errors raised while validating input or synchronizing a trajectory.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrajectoryError {
    /// A kinematic limit was non-finite, negative, or zero where positive
    /// is required.
    #[error("axis {axis}: {field} must be finite and greater than zero, got {value}")]
    InvalidLimit {
        axis: usize,
        field: &'static str,
        value: f64,
    },

    /// A boundary state component (position, velocity, or acceleration)
    /// was not finite.
    #[error("axis {axis}: {field} must be a finite number, got {value}")]
    NonFiniteState {
        axis: usize,
        field: &'static str,
        value: f64,
    },

    /// No axis produced a feasible minimum-time estimate, so there is no
    /// duration to synchronize against.
    #[error("no axis produced a feasible trajectory")]
    NoFeasibleDuration,

    /// The dispatcher could not find an accepting case at the synchronized
    /// duration for the given axis, even after the bounded relaxation
    /// retries in [`crate::trajectory::synchronize`].
    #[error("axis {axis}: unreachable at tf = {tf} after {attempts} relaxation attempts")]
    Unreachable {
        axis: usize,
        tf: f64,
        attempts: usize,
    },
}
