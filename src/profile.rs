//! The seven-segment profile and its validator.
//!
//! A [`Profile`] is allocated by the caller (here: by [`crate::step2::Step2`]
//! on the stack) and mutated in place by each case constructor. It is only
//! considered committed once [`Profile::check`] returns `true` — until then
//! the same storage is freely overwritten by the next candidate.

/// Jerk sign pattern across the seven segments.
///
/// `Uddu` applies `(+j, 0, -j, 0, -j, 0, +j)`; `Udud` applies
/// `(+j, 0, -j, 0, +j, 0, -j)`. `j` itself carries the up/down direction
/// (it is negated wholesale for the "down" family of cases), so these
/// patterns are the only two shapes needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSigns {
    Uddu,
    Udud,
}

impl ControlSigns {
    /// Per-segment multiplier applied to the case's `j` to get that
    /// segment's actual constant jerk.
    const fn signs(self) -> [f64; 7] {
        match self {
            ControlSigns::Uddu => [1.0, 0.0, -1.0, 0.0, -1.0, 0.0, 1.0],
            ControlSigns::Udud => [1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0],
        }
    }
}

/// Tolerance for treating a small negative segment duration as exactly
/// zero (invariant 1: `t[i] >= -epsilon`).
pub const T_CLAMP_EPSILON: f64 = 1e-12;

/// Relative tolerance on `sum(t) == tf` (invariant 2).
pub const TIME_SUM_EPSILON: f64 = 1e-8;

/// Relative tolerance on the terminal `p, v, a` match and the `v`/`a`
/// bound checks (invariants 3 and 4).
pub const KINEMATIC_EPSILON: f64 = 1e-8;

fn relative_eps(base_eps: f64, scale: f64) -> f64 {
    base_eps * (1.0 + scale.abs())
}

/// A seven-segment, piecewise-constant-jerk motion profile for one axis.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Durations of the seven segments. Non-negative, sums to `tf`.
    pub t: [f64; 7],
    /// Position at the start of each segment, plus the terminal value at
    /// index 7.
    pub p: [f64; 8],
    /// Velocity at the start of each segment, plus the terminal value.
    pub v: [f64; 8],
    /// Acceleration at the start of each segment, plus the terminal value.
    pub a: [f64; 8],
    /// Constant jerk actually applied during each segment (`sign * j`).
    pub j: [f64; 7],
    /// Which sign pattern this profile uses.
    pub control_signs: ControlSigns,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            t: [0.0; 7],
            p: [0.0; 8],
            v: [0.0; 8],
            a: [0.0; 8],
            j: [0.0; 7],
            control_signs: ControlSigns::Uddu,
        }
    }
}

impl Profile {
    /// Construct an uninitialized profile seeded with the axis's initial
    /// kinematic state. `t`, `j`, and the interior/terminal `p`/`v`/`a`
    /// entries are meaningless until a case constructor runs and
    /// [`Profile::check`] accepts the result.
    pub fn new(p0: f64, v0: f64, a0: f64) -> Self {
        let mut profile = Self::default();
        profile.p[0] = p0;
        profile.v[0] = v0;
        profile.a[0] = a0;
        profile
    }

    /// Forward-integrate the seven segments with the given family and
    /// base jerk `j`, filling in `self.j` and the interior/terminal
    /// `p`/`v`/`a` entries from `self.t` and the seeded initial state.
    fn integrate(&mut self, control_signs: ControlSigns, j: f64) {
        self.control_signs = control_signs;
        let signs = control_signs.signs();

        for i in 0..7 {
            let jerk = signs[i] * j;
            let dt = self.t[i];
            let p0 = self.p[i];
            let v0 = self.v[i];
            let a0 = self.a[i];

            self.j[i] = jerk;
            self.p[i + 1] = p0 + v0 * dt + 0.5 * a0 * dt * dt + jerk * dt * dt * dt / 6.0;
            self.v[i + 1] = v0 + a0 * dt + 0.5 * jerk * dt * dt;
            self.a[i + 1] = a0 + jerk * dt;
        }
    }

    /// The largest `|v|` attained anywhere in segment `i`, including the
    /// interior extremum where acceleration crosses zero (a quadratic
    /// velocity extremum at `t* = -a0/j` when that lies inside the
    /// segment).
    fn segment_v_extreme(&self, i: usize) -> f64 {
        let dt = self.t[i];
        let v0 = self.v[i];
        let a0 = self.a[i];
        let j = self.j[i];

        let mut extreme = v0.abs().max(self.v[i + 1].abs());
        if j.abs() > f64::EPSILON {
            let t_star = -a0 / j;
            if t_star > 0.0 && t_star < dt {
                let v_star = v0 - a0 * a0 / (2.0 * j);
                extreme = extreme.max(v_star.abs());
            }
        }
        extreme
    }

    /// Check a candidate profile against the full set of constraints from
    /// the distilled spec's section 4.1. Returns `true` iff the candidate
    /// is accepted; in that case `self` is the committed result.
    ///
    /// `j_original`, when provided, additionally requires `|j| <= |j_original|`
    /// — used by the `none`/`acc0_acc1` degenerate cases that downgrade the
    /// jerk magnitude to fit `tf`.
    #[allow(clippy::too_many_arguments)]
    pub fn check(
        &mut self,
        control_signs: ControlSigns,
        tf: f64,
        pf: f64,
        vf: f64,
        af: f64,
        j: f64,
        v_max: f64,
        a_max: f64,
        j_original: Option<f64>,
    ) -> bool {
        if let Some(j_orig) = j_original {
            if j.abs() > j_orig.abs() + relative_eps(KINEMATIC_EPSILON, j_orig) {
                return false;
            }
        }

        // Invariant 1: non-negativity, tolerating small negative noise.
        for t in self.t.iter_mut() {
            if *t < -T_CLAMP_EPSILON {
                return false;
            }
            if *t < 0.0 {
                *t = 0.0;
            }
            if !t.is_finite() {
                return false;
            }
        }

        // Invariant 2: total duration matches tf.
        let total: f64 = self.t.iter().sum();
        if (total - tf).abs() > relative_eps(TIME_SUM_EPSILON, tf) {
            return false;
        }

        self.integrate(control_signs, j);

        // Invariant 3: terminal state matches within tolerance.
        let p_err = (self.p[7] - pf).abs();
        let v_err = (self.v[7] - vf).abs();
        let a_err = (self.a[7] - af).abs();
        let p_scale = relative_eps(KINEMATIC_EPSILON, pf.abs().max(self.p[7].abs()));
        let v_scale = relative_eps(KINEMATIC_EPSILON, vf.abs().max(v_max.abs()));
        let a_scale = relative_eps(KINEMATIC_EPSILON, af.abs().max(a_max.abs()));
        if p_err > p_scale || v_err > v_scale || a_err > a_scale {
            return false;
        }

        // Invariant 4: velocity and acceleration bounds throughout.
        let v_limit = v_max.abs() + relative_eps(KINEMATIC_EPSILON, v_max);
        let a_limit = a_max.abs() + relative_eps(KINEMATIC_EPSILON, a_max);
        for i in 0..7 {
            if self.segment_v_extreme(i) > v_limit {
                return false;
            }
            if self.a[i].abs() > a_limit || self.a[i + 1].abs() > a_limit {
                return false;
            }
        }

        // Invariant 5: the family's prescribed sign pattern actually held
        // (guards against accidental family swaps from numerical slip in
        // the case constructors).
        let signs = control_signs.signs();
        for i in 0..7 {
            if signs[i] != 0.0 && self.t[i] > T_CLAMP_EPSILON {
                let expected_sign = signs[i] * j;
                if expected_sign * self.j[i] < 0.0 {
                    return false;
                }
            }
        }

        true
    }

    /// Sample this profile's kinematic state at elapsed time `t` since the
    /// start of segment 0. Clamps to the terminal state outside `[0, tf]`.
    pub fn at_time(&self, t: f64) -> (f64, f64, f64) {
        if t <= 0.0 {
            return (self.p[0], self.v[0], self.a[0]);
        }

        let mut elapsed = 0.0;
        for i in 0..7 {
            let dt = self.t[i];
            if t < elapsed + dt || i == 6 {
                let local = (t - elapsed).min(dt).max(0.0);
                let p0 = self.p[i];
                let v0 = self.v[i];
                let a0 = self.a[i];
                let j = self.j[i];
                let p = p0 + v0 * local + 0.5 * a0 * local * local + j * local * local * local / 6.0;
                let v = v0 + a0 * local + 0.5 * j * local * local;
                let a = a0 + j * local;
                return (p, v, a);
            }
            elapsed += dt;
        }

        (self.p[7], self.v[7], self.a[7])
    }

    /// Total duration of this profile (`sum(t)`).
    pub fn duration(&self) -> f64 {
        self.t.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn triangular_jerk_ramp_integrates_correctly() {
        // Pure UD (jerk +1 then -1, each for 1s) from rest: a ramps 0->1->0,
        // v ramps 0->0.5->1.0, p ends at 1.0. Hand-computed reference values.
        let mut profile = Profile::new(0.0, 0.0, 0.0);
        profile.t = [1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0];
        let accepted = profile.check(ControlSigns::Uddu, 2.0, 1.0, 1.0, 0.0, 1.0, 10.0, 10.0, None);
        assert!(accepted);
        assert_approx_eq!(f64, profile.p[7], 1.0, epsilon = 1e-8);
        assert_approx_eq!(f64, profile.v[7], 1.0, epsilon = 1e-8);
        assert_approx_eq!(f64, profile.a[7], 0.0, epsilon = 1e-8);
    }

    #[test]
    fn rejects_time_sum_mismatch() {
        let mut profile = Profile::new(0.0, 0.0, 0.0);
        profile.t = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        assert!(!profile.check(ControlSigns::Uddu, 3.0, 0.0, 0.0, 0.0, 1.0, 10.0, 10.0, None));
    }

    #[test]
    fn rejects_negative_time_beyond_tolerance() {
        let mut profile = Profile::new(0.0, 0.0, 0.0);
        profile.t = [-0.5, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert!(!profile.check(ControlSigns::Uddu, 0.0, 0.0, 0.0, 0.0, 1.0, 10.0, 10.0, None));
    }

    #[test]
    fn clamps_tiny_negative_time_to_zero() {
        let mut profile = Profile::new(0.0, 1.0, 0.0);
        profile.t = [-1e-13, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let accepted = profile.check(ControlSigns::Uddu, 1.0, 1.0, 1.0, 0.0, 0.0, 10.0, 10.0, None);
        assert!(accepted);
        assert_eq!(profile.t[0], 0.0);
    }
}
