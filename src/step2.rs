//! Step 2: synthesize a seven-segment profile for a fixed `tf`.
//!
//! This is the core of the crate. Given one axis's boundary conditions,
//! its kinematic limits, and a *fixed* synchronization duration `tf`, the
//! case library below constructs every combinatorial profile shape that
//! could plausibly fit, validates each candidate through [`Profile::check`],
//! and the dispatcher in [`Step2::get_profile`] returns the first accepted
//! one.
//!
//! The polynomial coefficient expressions in the case constructors are
//! reproduced from their symbolic derivation exactly as grouped — per the
//! distilled spec's design notes, refactoring them into "nicer" algebraic
//! forms risks reintroducing cancellation error in boundary regimes that
//! the original grouping was chosen to avoid. Do not simplify them.

use crate::profile::{ControlSigns, Profile};
use crate::roots::{poly_eval, shrink_interval, solve_quart_monic};

/// Step 2 solver instance for one axis at one candidate `tf`.
///
/// Holds the boundary conditions and a set of precomputed powers/products
/// used to compactify the case library's polynomial coefficients. These
/// scalars carry no invariants of their own — they are pure memoization.
pub struct Step2 {
    tf: f64,
    p0: f64,
    v0: f64,
    a0: f64,
    pf: f64,
    vf: f64,
    af: f64,

    pd: f64,
    tf_tf: f64,

    vd: f64,
    vd_vd: f64,
    v0_v0: f64,
    vf_vf: f64,

    ad: f64,
    ad_ad: f64,
    a0_a0: f64,
    af_af: f64,

    a0_p3: f64,
    a0_p4: f64,
    af_p3: f64,
    af_p4: f64,
}

#[inline]
fn pw(x: f64, n: i32) -> f64 {
    x.powi(n)
}

impl Step2 {
    /// Build a Step 2 instance for boundary conditions `(p0,v0,a0) ->
    /// (pf,vf,af)` at fixed duration `tf`.
    pub fn new(tf: f64, p0: f64, v0: f64, a0: f64, pf: f64, vf: f64, af: f64) -> Self {
        let pd = pf - p0;
        let tf_tf = tf * tf;

        let vd = vf - v0;
        let vd_vd = vd * vd;
        let v0_v0 = v0 * v0;
        let vf_vf = vf * vf;

        let ad = af - a0;
        let ad_ad = ad * ad;
        let a0_a0 = a0 * a0;
        let af_af = af * af;

        let a0_p3 = a0 * a0 * a0;
        let a0_p4 = a0_a0 * a0_a0;
        let af_p3 = af * af * af;
        let af_p4 = af_af * af_af;

        Self {
            tf,
            p0,
            v0,
            a0,
            pf,
            vf,
            af,
            pd,
            tf_tf,
            vd,
            vd_vd,
            v0_v0,
            vf_vf,
            ad,
            ad_ad,
            a0_a0,
            af_af,
            a0_p3,
            a0_p4,
            af_p3,
            af_p4,
        }
    }

    // ---- acc0_acc1_vel -----------------------------------------------

    fn time_up_acc0_acc1_vel(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        if self.tf < 2.0 * a_max / j_max {
            return false;
        }
        let (a0, af, vd, tf, pd, v0, vf) = (self.a0, self.af, self.vd, self.tf, self.pd, self.v0, self.vf);
        let (a0_p3, af_p3, a0_p4, af_p4) = (self.a0_p3, self.af_p3, self.a0_p4, self.af_p4);
        let (vd_vd, tf_tf) = (self.vd_vd, self.tf_tf);
        let aMax = a_max;
        let aMax_aMax = aMax * aMax;
        let jMax = j_max;
        let jMax_jMax = jMax * jMax;

        // Profile UDDU
        {
            let h0b = aMax_aMax + jMax * (vd - aMax * tf);
            let h0a = af * af + 2.0 * (af * aMax + aMax_aMax - aMax * jMax * tf - jMax * vd);
            let h1 = (-a0_p4 - af_p4 + 4.0 / 3.0 * aMax * (a0_p3 - af_p3) + 2.0 * a0 * h0a * (a0 - 2.0 * aMax)
                + 4.0 * af * h0b * (af + 2.0 * aMax)
                + 4.0 * (pw(aMax, 4) - 2.0 * pw(aMax, 3) * jMax * tf + aMax_aMax * jMax_jMax * tf_tf
                    - jMax_jMax * vd_vd
                    + 2.0 * aMax * jMax_jMax * (-2.0 * pd + tf * (v0 + vf))))
                .sqrt();
            let h2 = 2.0 * aMax * (self.ad + 3.0 * aMax - jMax * tf) + h1;
            let h3 = -4.0 * aMax * jMax;
            let h4 = a0 * a0 - af * af + 2.0 * jMax * vd;

            profile.t[0] = (-a0 + aMax) / jMax;
            profile.t[1] = (h2 - h4) / h3;
            profile.t[2] = profile.t[0] + a0 / jMax;
            profile.t[3] = -aMax / jMax - 2.0 * h1 / h3;
            profile.t[4] = profile.t[2];
            profile.t[5] = (h2 + h4) / h3;
            profile.t[6] = profile.t[4] + af / jMax;

            if profile.check(ControlSigns::Uddu, tf, self.pf, vf, af, jMax, v_max, a_max, None) {
                return true;
            }
        }

        // Profile UDUD
        {
            let h1 = 12.0 * aMax * jMax
                * (a0 * a0 + af * af - 2.0 * (a0 + af) * aMax + 2.0 * (aMax_aMax - aMax * jMax * tf + jMax * vd));
            let h2 = 3.0 * a0_p4 + 3.0 * af_p4 - 4.0 * a0_p3 * aMax - 4.0 * af_p3 * aMax;
            let h3 = -4.0 * af_p3 * aMax + 24.0 * (a0 + af) * pw(aMax, 3) - 24.0 * af * aMax * jMax * vd
                - 6.0 * af * af * (aMax_aMax - 2.0 * jMax * vd)
                + 6.0 * a0 * a0 * (af * af - 2.0 * af * aMax - aMax_aMax - 2.0 * aMax * jMax * tf + 2.0 * jMax * vd)
                - 12.0 * (2.0 * pw(aMax, 4) - 2.0 * pw(aMax, 3) * jMax * tf
                    - 2.0 * aMax * jMax_jMax * (-pd + tf * v0)
                    - jMax_jMax * vd_vd
                    + aMax_aMax * jMax * vd);

            profile.t[0] = (-a0 + aMax) / jMax;
            profile.t[1] = (h2 + h3) / h1;
            profile.t[2] = profile.t[0] + a0 / jMax;
            profile.t[3] = -(a0 * a0 + af * af - 2.0 * aMax * (a0 + af + jMax * tf) + 4.0 * aMax_aMax + 2.0 * jMax * vd)
                / (2.0 * aMax * jMax);
            profile.t[4] = profile.t[2];
            profile.t[5] = tf - (profile.t[0] + profile.t[1] + profile.t[2] + profile.t[3] + 2.0 * profile.t[4] + af / jMax);
            profile.t[6] = profile.t[4] - af / jMax;

            if profile.check(ControlSigns::Udud, tf, self.pf, vf, af, jMax, v_max, a_max, None) {
                return true;
            }
        }

        false
    }

    // ---- acc1_vel ------------------------------------------------------

    fn time_up_acc1_vel(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        if self.tf < a_max / j_max {
            return false;
        }
        let (a0, af, vd, tf, pd, v0) = (self.a0, self.af, self.vd, self.tf, self.pd, self.v0);
        let (a0_p4, af_p3, af_p4) = (self.a0_p4, self.af_p3, self.af_p4);
        let (vd_vd, tf_tf) = (self.vd_vd, self.tf_tf);
        let aMax = a_max;
        let aMax_aMax = aMax * aMax;
        let jMax = j_max;
        let jMax_jMax = jMax * jMax;
        let a0_a0 = a0 * a0;
        let af_af = af * af;

        // Profile UDDU
        {
            let ph1 = a0_a0 + af_af + aMax * (a0 + 2.0 * af) + aMax_aMax - 2.0 * jMax * (vd + aMax * tf);
            let ph2 = -2.0 * aMax * jMax * (-pd + tf * v0) - aMax_aMax * vd + jMax * vd_vd;

            let b = (2.0 * (2.0 * a0 + aMax)) / jMax;
            let c = (4.0 * a0_a0 + ph1 + 3.0 * a0 * aMax) / jMax_jMax;
            let d = (2.0 * a0 * ph1) / pw(jMax, 3);
            let e = (3.0 * a0_p4 + 3.0 * af_p4 + 4.0 * self.a0_p3 * aMax + 8.0 * af_p3 * aMax
                + 6.0 * af_af * (aMax_aMax - 2.0 * jMax * vd)
                + 12.0 * jMax * ph2
                - 24.0 * af * aMax * jMax * vd
                + 6.0 * a0_a0 * (af_af + 2.0 * af * aMax + aMax_aMax - 2.0 * jMax * (vd + aMax * tf)))
                / (12.0 * pw(jMax, 4));

            for t in solve_quart_monic(b, c, d, e) {
                if t < 0.0 || t > tf - aMax / jMax {
                    continue;
                }

                let h1 = ((a0_a0 + af_af) / 2.0 + jMax * (v0 - self.vf + 2.0 * a0 * t + jMax * pw(t, 2))) / aMax;

                profile.t[0] = t;
                profile.t[1] = 0.0;
                profile.t[2] = profile.t[0] + a0 / jMax;
                profile.t[3] = -(h1 + aMax + a0 + af) / jMax - (2.0 * t - tf);
                profile.t[4] = aMax / jMax;
                profile.t[5] = (h1 - aMax) / jMax;
                profile.t[6] = profile.t[4] + af / jMax;

                if profile.check(ControlSigns::Uddu, tf, self.pf, self.vf, af, jMax, v_max, a_max, None) {
                    return true;
                }
            }
        }

        // Profile UDUD
        {
            let ph1 = a0_a0 - af_af + (2.0 * af - a0) * aMax - aMax_aMax - 2.0 * jMax * (vd - aMax * tf);
            let ph4 = aMax_aMax + 2.0 * jMax * vd;
            let ph2 = af_af + ph4 - 2.0 * aMax * (af + jMax * tf);
            let ph3 = 2.0 * aMax * jMax * (-pd + tf * v0) + jMax * vd_vd + aMax_aMax * vd;

            let b = (4.0 * a0 - 2.0 * aMax) / jMax;
            let c = (4.0 * a0_a0 - 3.0 * a0 * aMax + ph1) / jMax_jMax;
            let d = (2.0 * a0 * ph1) / pw(jMax, 3);
            let e = (3.0 * a0_p4 + 3.0 * af_p4 - 4.0 * self.a0_p3 * aMax - 8.0 * af_p3 * aMax
                - 24.0 * af * aMax * jMax * vd
                + 12.0 * jMax * ph3
                - 6.0 * a0_a0 * ph2
                + 6.0 * af_af * ph4)
                / (12.0 * pw(jMax, 4));

            for t in solve_quart_monic(b, c, d, e) {
                if t < 0.0 || t > tf - aMax / jMax {
                    continue;
                }

                let h1 = ((a0_a0 - af_af) / 2.0 + jMax_jMax * pw(t, 2) - jMax * (vd - 2.0 * a0 * t)) / aMax;

                profile.t[0] = t;
                profile.t[1] = 0.0;
                profile.t[2] = a0 / jMax + t;
                profile.t[3] = (h1 + af - a0 - aMax) / jMax - (2.0 * t - tf);
                profile.t[4] = aMax / jMax;
                profile.t[5] = -(h1 + aMax) / jMax;
                profile.t[6] = profile.t[4] - af / jMax;

                if profile.check(ControlSigns::Udud, tf, self.pf, self.vf, af, jMax, v_max, a_max, None) {
                    return true;
                }
            }
        }

        false
    }

    // ---- acc0_vel ------------------------------------------------------

    fn time_up_acc0_vel(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        if self.tf < a_max / j_max {
            return false;
        }
        let (a0, af, vd, tf, pd, vf) = (self.a0, self.af, self.vd, self.tf, self.pd, self.vf);
        let (a0_p3, a0_p4, af_p3, af_p4) = (self.a0_p3, self.a0_p4, self.af_p3, self.af_p4);
        let vd_vd = self.vd_vd;
        let aMax = a_max;
        let aMax_aMax = aMax * aMax;
        let jMax = j_max;
        let jMax_jMax = jMax * jMax;
        let a0_a0 = a0 * a0;
        let af_af = af * af;

        let ph1 = 12.0 * jMax * (-aMax_aMax * vd - jMax * vd_vd + 2.0 * aMax * jMax * (-pd + tf * vf));

        // Profile UDDU
        {
            let b = (2.0 * aMax) / jMax;
            let c = (a0_a0 - af_af + 2.0 * self.ad * aMax + aMax_aMax + 2.0 * jMax * (vd - aMax * tf)) / jMax_jMax;
            let d = 0.0;
            let e = -(-3.0 * a0_p4 - 3.0 * af_p4 + 8.0 * a0_p3 * aMax + 4.0 * af_p3 * aMax
                - 12.0 * a0 * aMax * (af_af - 2.0 * jMax * vd)
                + 6.0 * a0_a0 * (af_af - aMax_aMax + 2.0 * jMax * self.v0 - 2.0 * jMax * vf)
                + 6.0 * af_af * (aMax_aMax - 2.0 * aMax * jMax * tf + 2.0 * jMax * vd)
                + ph1)
                / (12.0 * pw(jMax, 4));

            for t in solve_quart_monic(b, c, d, e) {
                if t < 0.0 || t > tf - aMax / jMax {
                    continue;
                }

                let h1 = ((a0_a0 - af_af) / 2.0 + jMax * (jMax * pw(t, 2) + vd)) / aMax;

                profile.t[0] = (-a0 + aMax) / jMax;
                profile.t[1] = (h1 - aMax) / jMax;
                profile.t[2] = aMax / jMax;
                profile.t[3] = -(h1 - a0 + af + aMax) / jMax - (2.0 * t - tf);
                profile.t[4] = t;
                profile.t[5] = 0.0;
                profile.t[6] = af / jMax + t;

                if profile.check(ControlSigns::Uddu, tf, self.pf, vf, af, jMax, v_max, a_max, None) {
                    return true;
                }
            }
        }

        // Profile UDUD
        {
            let b = (-2.0 * aMax) / jMax;
            let c = -(a0_a0 + af_af - 2.0 * (a0 + af) * aMax + aMax_aMax + 2.0 * jMax * (vd - aMax * tf)) / jMax_jMax;
            let d = 0.0;
            let e = (3.0 * a0_p4 + 3.0 * af_p4 - 8.0 * a0_p3 * aMax - 4.0 * af_p3 * aMax
                + 6.0 * a0_a0 * (af_af + aMax_aMax - 2.0 * jMax * self.v0 + 2.0 * jMax * vf)
                - 12.0 * a0 * aMax * (af_af + 2.0 * jMax * vd)
                + 6.0 * af_af * (aMax_aMax - 2.0 * aMax * jMax * tf + 2.0 * jMax * vd)
                - ph1)
                / (12.0 * pw(jMax, 4));

            for t in solve_quart_monic(b, c, d, e) {
                if t < 0.0 || t > tf - aMax / jMax {
                    continue;
                }

                let h1 = ((a0_a0 + af_af) / 2.0 + jMax * (vd - jMax * pw(t, 2))) / aMax;

                profile.t[0] = (-a0 + aMax) / jMax;
                profile.t[1] = (h1 - aMax) / jMax;
                profile.t[2] = aMax / jMax;
                profile.t[3] = -(h1 - a0 - af + aMax) / jMax - (2.0 * t - tf);
                profile.t[4] = t;
                profile.t[5] = 0.0;
                profile.t[6] = -(af / jMax) + t;

                if profile.check(ControlSigns::Udud, tf, self.pf, vf, af, jMax, v_max, a_max, None) {
                    return true;
                }
            }
        }

        false
    }

    // ---- vel (quintic/sextic) ------------------------------------------

    fn time_up_vel(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        let (a0, af, vd, tf, pd, v0, vf) = (self.a0, self.af, self.vd, self.tf, self.pd, self.v0, self.vf);
        let (vd_vd, tf_tf) = (self.vd_vd, self.tf_tf);
        let jMax = j_max;
        let jMax_jMax = jMax * jMax;
        let a0_a0 = a0 * a0;
        let af_af = af * af;

        // Profile UDDU: quintic in t.
        {
            let denom = 4.0 * jMax * (a0 - af + jMax * tf);
            let p1 = (15.0 * a0_a0 + af_af + 4.0 * af * jMax * tf - 16.0 * a0 * (af - jMax * tf)
                - 2.0 * jMax * (jMax * tf_tf - 3.0 * v0 + 3.0 * vf))
                / denom;
            let p2 = (29.0 * pw(a0, 3) - 2.0 * pw(af, 3) - 33.0 * a0_a0 * (af - jMax * tf)
                + 6.0 * jMax_jMax * (-pd + tf * v0)
                + 6.0 * af * jMax * vd
                + 6.0 * a0 * (af_af + 4.0 * af * jMax * tf - 2.0 * jMax * (jMax * tf_tf - 3.0 * v0 + 3.0 * vf)))
                / (6.0 * jMax_jMax * (a0 - af + jMax * tf));
            let p3 = (61.0 * pw(a0, 4) + pw(af, 4) + 8.0 * pw(af, 3) * jMax * tf
                - 76.0 * pw(a0, 3) * (af - jMax * tf)
                - 24.0 * pw(jMax, 3) * tf * (-pd + tf * v0)
                - 16.0 * a0 * (pw(af, 3) - 3.0 * jMax_jMax * (-pd + tf * v0) - 3.0 * af * jMax * vd)
                - 12.0 * af_af * jMax * vd
                + 36.0 * jMax_jMax * vd_vd
                + 24.0 * af * jMax_jMax * (-pd + 2.0 * tf * v0 - tf * vf)
                + 30.0 * a0_a0 * (af_af + 4.0 * af * jMax * tf - 2.0 * jMax * (jMax * tf_tf - 3.0 * v0 + 3.0 * vf)))
                / (24.0 * pw(jMax, 3) * (a0 - af + jMax * tf));
            let p4 = (a0 * (7.0 * pw(a0, 4) + pw(af, 4) + 8.0 * pw(af, 3) * jMax * tf
                - 10.0 * pw(a0, 3) * (af - jMax * tf)
                - 24.0 * pw(jMax, 3) * tf * (-pd + tf * v0)
                - 4.0 * a0 * (pw(af, 3) - 3.0 * jMax_jMax * (-pd + tf * v0) - 3.0 * af * jMax * vd)
                - 12.0 * af_af * jMax * vd
                + 36.0 * jMax_jMax * vd_vd
                + 24.0 * af * jMax_jMax * (-pd + 2.0 * tf * v0 - tf * vf)
                + 6.0 * a0_a0 * (af_af + 4.0 * af * jMax * tf - 2.0 * jMax * (jMax * tf_tf - 3.0 * v0 + 3.0 * vf))))
                / (12.0 * pw(jMax, 4) * (a0 - af + jMax * tf));
            let p5 = (7.0 * pw(a0, 6) + pw(af, 6) - 12.0 * pw(a0, 5) * (af - jMax * tf)
                + 48.0 * pw(af, 3) * jMax_jMax * (-pd + tf * v0)
                - 8.0 * pw(a0, 3) * (pw(af, 3) - 3.0 * jMax_jMax * (-pd + tf * v0) - 3.0 * af * jMax * vd)
                - 72.0 * pw(jMax, 3) * (jMax * pw(-pd + tf * v0, 2) - pw(v0 - vf, 3))
                - 6.0 * pw(af, 4) * jMax * vd
                - 144.0 * af * pw(jMax, 3) * (-pd + tf * v0) * vd
                + 36.0 * af_af * jMax_jMax * vd_vd
                + 9.0 * pw(a0, 4) * (af_af + 4.0 * af * jMax * tf - 2.0 * jMax * (jMax * tf_tf - 3.0 * v0 + 3.0 * vf))
                + 3.0 * a0_a0
                    * (pw(af, 4) + 8.0 * pw(af, 3) * jMax * tf - 24.0 * pw(jMax, 3) * tf * (-pd + tf * v0)
                        - 12.0 * af_af * jMax * vd
                        + 36.0 * jMax_jMax * vd_vd
                        + 24.0 * af * jMax_jMax * (-pd + 2.0 * tf * v0 - tf * vf)))
                / (144.0 * pw(jMax, 5) * (a0 - af + jMax * tf));

            let polynom = [1.0, p1, p2, p3, p4, p5];

            let tz_max = tf.min((tf - a0 / jMax) / 2.0);
            let critical_points = find_sorted_roots_of_derivative(&polynom, tz_max);
            let intervals = bracket_sign_changes(&polynom, &critical_points, 0.0, tz_max);

            for (lo, hi) in intervals {
                let mut t = shrink_interval(&polynom, lo, hi, 1e-16);

                // Single Newton polishing step with the h2-dependent
                // derivative formula from the reference derivation.
                let h2 = (2.0 * (a0_a0 + af_af + 4.0 * a0 * jMax * t + 2.0 * jMax * (jMax * pw(t, 2) - vd))).sqrt()
                    / jMax.abs();
                let orig = -pd
                    - (2.0 * pw(a0, 3) + 4.0 * pw(af, 3)
                        + 24.0 * a0 * jMax * t * (af + jMax * (t - tf) + jMax * h2 / 2.0)
                        + 6.0 * a0_a0 * (af + jMax * (2.0 * t - tf) + jMax * h2 / 2.0)
                        + 6.0 * af_af * jMax * h2 / 2.0
                        + 12.0 * af * jMax * (jMax * pw(t, 2) - vd)
                        + 12.0 * jMax_jMax
                            * (jMax * pw(t, 2) * (t - tf) - tf * v0 - h2 / 2.0 * (vd - jMax * pw(t, 2))))
                    / (12.0 * jMax_jMax);
                let deriv = -(a0 + jMax * t)
                    * (3.0 * ((a0_a0 + af_af) + 2.0 * jMax_jMax * pw(t, 2) + 2.0 * jMax * (2.0 * a0 * t - vd))
                        / (h2 * jMax_jMax)
                        + (a0 + 2.0 * af) / jMax
                        + (3.0 * t - 2.0 * tf));

                if deriv.abs() > f64::EPSILON {
                    t -= orig / deriv;
                }

                if t < 0.0 || t > tf {
                    continue;
                }

                profile.t[0] = t;
                profile.t[1] = 0.0;
                profile.t[2] = profile.t[0] + a0 / jMax;
                profile.t[4] = (a0_a0 / 2.0 + af_af / 2.0 + jMax * (2.0 * a0 * t + jMax * pw(t, 2) - vd)).sqrt()
                    / jMax.abs();
                profile.t[5] = 0.0;
                profile.t[6] = profile.t[4] + af / jMax;
                profile.t[3] = tf - (profile.t[0] + profile.t[2] + profile.t[4] + profile.t[6]);

                if profile.check(ControlSigns::Uddu, tf, self.pf, vf, af, jMax, v_max, a_max, None) {
                    return true;
                }
            }
        }

        // Profile UDUD: sextic in t.
        {
            let ph1 = af_af - 4.0 * af * jMax * tf - 2.0 * jMax * (jMax * tf_tf - 3.0 * vd);
            let ph2 = pw(af, 3) - 3.0 * jMax_jMax * (-pd + tf * v0) + 3.0 * af * jMax * vd;
            let ph3 = 2.0 * jMax * tf * (-pd + tf * v0) + 3.0 * vd_vd;

            let p1 = -((-5.0 * a0 + af + jMax * tf) / jMax);
            let p2 = (39.0 * a0_a0 - ph1 - 16.0 * a0 * (af + jMax * tf)) / (4.0 * jMax_jMax);
            let p3 = (55.0 * pw(a0, 3) - 33.0 * a0_a0 * (af + jMax * tf) - 6.0 * a0 * ph1 + 2.0 * ph2)
                / (6.0 * pw(jMax, 3));
            let p4 = (101.0 * pw(a0, 4) + pw(af, 4) - 8.0 * pw(af, 3) * jMax * tf
                - 76.0 * pw(a0, 3) * (af + jMax * tf)
                - 30.0 * a0_a0 * ph1
                + 12.0 * jMax_jMax * ph3
                + 12.0 * af_af * jMax * vd
                + 24.0 * af * jMax_jMax * (-pd + 2.0 * tf * v0 - tf * vf)
                + 16.0 * a0 * ph2)
                / (24.0 * pw(jMax, 4));
            let p5 = (a0 * (11.0 * pw(a0, 4) + pw(af, 4) - 8.0 * pw(af, 3) * jMax * tf
                - 10.0 * pw(a0, 3) * (af + jMax * tf)
                - 6.0 * a0_a0 * ph1
                + 12.0 * jMax_jMax * ph3
                + 12.0 * af_af * jMax * vd
                + 24.0 * af * jMax_jMax * (-pd + 2.0 * tf * v0 - tf * vf)
                + 4.0 * a0 * ph2))
                / (12.0 * pw(jMax, 5));
            let p6 = (11.0 * pw(a0, 6) - pw(af, 6) - 12.0 * pw(a0, 5) * (af + jMax * tf)
                - 48.0 * pw(af, 3) * jMax_jMax * (-pd + tf * v0)
                - 9.0 * pw(a0, 4) * ph1
                + 72.0 * pw(jMax, 3) * (jMax * pw(-pd + tf * v0, 2) + pw(v0 - vf, 3))
                - 6.0 * pw(af, 4) * jMax * vd
                - 144.0 * af * pw(jMax, 3) * (-pd + tf * v0) * vd
                - 36.0 * af_af * jMax_jMax * vd_vd
                + 8.0 * pw(a0, 3) * ph2
                + 3.0 * a0_a0
                    * (pw(af, 4) - 8.0 * pw(af, 3) * jMax * tf + 12.0 * jMax_jMax * ph3 + 12.0 * af_af * jMax * vd
                        + 24.0 * af * jMax_jMax * (-pd + 2.0 * tf * v0 - tf * vf)))
                / (144.0 * pw(jMax, 6));

            let polynom = [1.0, p1, p2, p3, p4, p5, p6];
            // First derivative (degree 5): coefficients scaled by
            // descending-power weights, per the reference construction.
            let deriv = [
                1.0,
                5.0 / 6.0 * p1,
                4.0 / 6.0 * p2,
                3.0 / 6.0 * p3,
                2.0 / 6.0 * p4,
                1.0 / 6.0 * p5,
            ];

            let tz_max = tf.min((tf - a0 / jMax) / 2.0);

            // Critical points of `deriv` (degree 5) come from its own
            // derivative (degree 4), solved analytically.
            let dd_extremas = solve_quart_monic(
                4.0 / 5.0 * deriv[1],
                3.0 / 5.0 * deriv[2],
                2.0 / 5.0 * deriv[3],
                1.0 / 5.0 * deriv[4],
            );
            let deriv_intervals = bracket_sign_changes(&deriv, &dd_extremas, 0.0, tz_max);

            let mut tz_roots = Vec::new();
            for (lo, hi) in deriv_intervals {
                let tz = shrink_interval(&deriv, lo, hi, 1e-14);
                if tz > 0.0 && tz < tz_max {
                    tz_roots.push(tz);
                }
            }

            let intervals = bracket_sign_changes(&polynom, &tz_roots, 0.0, tz_max);

            for (lo, hi) in intervals {
                let t = shrink_interval(&polynom, lo, hi, 1e-14);

                profile.t[0] = t;
                profile.t[1] = 0.0;
                profile.t[2] = profile.t[0] + a0 / jMax;
                profile.t[4] = (af_af / 2.0 - a0_a0 / 2.0 - jMax * (2.0 * a0 * t + jMax * pw(t, 2) - vd)).sqrt()
                    / jMax.abs();
                profile.t[5] = 0.0;
                profile.t[6] = profile.t[4] - af / jMax;
                profile.t[3] = tf - (profile.t[0] + profile.t[2] + profile.t[4] + profile.t[6]);

                if profile.check(ControlSigns::Udud, tf, self.pf, vf, af, jMax, v_max, a_max, None) {
                    return true;
                }
            }
        }

        false
    }

    // ---- acc0_acc1 (cruise time free) -----------------------------------

    fn time_up_acc0_acc1(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        let (a0, af, vd, ad, tf, pd, v0, vf) = (self.a0, self.af, self.vd, self.ad, self.tf, self.pd, self.v0, self.vf);
        let aMax = a_max;
        let aMax_aMax = aMax * aMax;

        if a0.abs() < f64::EPSILON && af.abs() < f64::EPSILON {
            let h1 = (self.vd_vd + 4.0 * aMax * pd) / (2.0 * aMax_aMax * tf);

            profile.t[0] = tf / 2.0 - h1 + (v0 + vf) / aMax;
            profile.t[1] = -(tf - 4.0 * h1 + (5.0 * v0 + 3.0 * vf) / aMax) / 2.0;
            profile.t[2] = profile.t[0];
            profile.t[3] = 0.0;
            profile.t[4] = profile.t[0];
            profile.t[5] = -(tf - 4.0 * h1 + (3.0 * v0 + 5.0 * vf) / aMax) / 2.0;
            profile.t[6] = profile.t[0];
            let j_max_new = aMax / profile.t[0];

            return profile.check(ControlSigns::Uddu, tf, self.pf, vf, af, j_max_new, v_max, a_max, Some(j_max));
        }

        let a0_a0 = a0 * a0;
        let af_af = af * af;
        let tf_tf = self.tf_tf;
        let jMax = j_max;

        let h0a = af_af * (-2.0 * pd + tf * (v0 + vf)) + 2.0 * af * aMax * (-2.0 * pd + tf * (v0 + vf));
        let h1 = (6.0 * aMax
            * (6.0 * pw(aMax, 5) * tf_tf + 3.0 * self.af_p4 * (-2.0 * pd + tf * (aMax * tf + 2.0 * v0))
                + 3.0 * self.a0_p4 * (-2.0 * pd + tf * (aMax * tf + 2.0 * vf))
                + 6.0 * af_af * aMax * (aMax_aMax * tf_tf + 2.0 * self.vd_vd + aMax * (4.0 * pd + tf * v0 - 5.0 * tf * vf))
                + 4.0 * self.af_p3
                    * (2.0 * aMax_aMax * tf_tf + self.vd_vd + 2.0 * aMax * (-pd + 2.0 * tf * v0 - tf * vf))
                - 4.0 * self.a0_p3
                    * (2.0 * aMax_aMax * tf_tf + self.vd_vd + 2.0 * aMax * (-pd - tf * v0 + 2.0 * tf * vf))
                - 12.0 * af * aMax_aMax * (-self.vd_vd + aMax * (-4.0 * pd + tf * v0 + 3.0 * tf * vf))
                - 6.0 * a0_a0
                    * (h0a - aMax * (aMax_aMax * tf_tf + 2.0 * self.vd_vd + aMax * (4.0 * pd - 5.0 * tf * v0 + tf * vf)))
                + 12.0 * a0 * aMax * (h0a + aMax * (-self.vd_vd + aMax * (-4.0 * pd + 3.0 * tf * v0 + tf * vf)))))
            .sqrt();
        let h2 = -2.0 * ad
            * (3.0 * self.a0_p3 - 3.0 * self.af_p3 + a0_a0 * (3.0 * af - 4.0 * aMax) - 4.0 * af_af * aMax
                + 12.0 * af * aMax_aMax
                + 24.0 * pw(aMax, 3)
                - a0 * (3.0 * af_af + 16.0 * af * aMax + 12.0 * aMax_aMax));
        let h3 = (-6.0 * a0_a0 * af_af * tf + 6.0 * self.af_p4 * tf - 4.0 * self.a0_p3 * aMax * tf
            - 12.0 * a0_a0 * af * aMax * tf
            + 16.0 * self.af_p3 * aMax * tf
            + 18.0 * a0_a0 * aMax_aMax * tf
            + 30.0 * af_af * aMax_aMax * tf
            + 36.0 * ad * pw(aMax, 3) * tf
            + 48.0 * pw(aMax, 4) * tf
            - 4.0 * self.a0_p3 * vd
            + 12.0 * a0 * af_af * vd
            - 8.0 * self.af_p3 * vd
            + 24.0 * a0_a0 * aMax * vd
            + 24.0 * a0 * af * aMax * vd
            - 48.0 * af_af * aMax * vd
            - 24.0 * a0 * aMax_aMax * vd
            - 72.0 * af * aMax_aMax * vd);
        let h4 = aMax_aMax * tf_tf - self.vd_vd + 2.0 * aMax * (-2.0 * pd + tf * (v0 + vf));
        let h5 = 2.0 * pw(aMax, 3) * tf + (af_af + 2.0 * af * aMax) * (aMax * tf - vd)
            + (a0_a0 - 2.0 * a0 * aMax) * (aMax * tf + vd);
        let j_max_new = (3.0 * aMax * tf * (a0_a0 + af_af + 2.0 * ad * aMax + 2.0 * aMax_aMax) + 3.0 * a0_a0 * vd
            - 3.0 * af_af * vd
            - 6.0 * (a0 + af) * aMax * vd
            + (9.0 * h5 * h5 - 3.0 * ad * h2 * h4).sqrt())
            / (6.0 * h4);

        profile.t[0] = (-a0 + aMax) / j_max_new;
        profile.t[1] = (h3 + h1 * (a0_a0 - af_af - 2.0 * ad * aMax - 8.0 * aMax_aMax) / aMax) / h2;
        profile.t[2] = profile.t[0] + a0 / j_max_new;
        profile.t[3] = 0.0;
        profile.t[4] = profile.t[2];
        profile.t[5] = tf - (profile.t[0] + profile.t[1] + profile.t[2] + profile.t[3] + 2.0 * profile.t[4] + af / j_max_new);
        profile.t[6] = profile.t[4] + af / j_max_new;

        profile.check(ControlSigns::Uddu, tf, self.pf, vf, af, j_max_new, v_max, a_max, Some(jMax))
    }

    // ---- acc1 (exit acc saturated, v not) -------------------------------

    fn time_up_acc1(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        let (a0, af, vd, pd, tf, vf) = (self.a0, self.af, self.vd, self.pd, self.tf, self.vf);
        let aMax = a_max;
        let aMax_aMax = aMax * aMax;
        let jMax = j_max;
        let a0_a0 = a0 * a0;
        let af_af = af * af;
        let tf_tf = self.tf_tf;

        // Case UDDU, Solution 2
        {
            let h0a = self.a0_p3 - self.af_p3 + 3.0 * a0_a0 * aMax + 3.0 * a0 * aMax_aMax
                + 3.0 * aMax_aMax * jMax * tf
                - 3.0 * af * aMax * (aMax - 2.0 * jMax * tf)
                - 3.0 * af_af * (aMax - jMax * tf)
                - 3.0 * jMax * jMax * (-2.0 * pd + aMax * tf_tf + 2.0 * tf * vf);
            let h0b = a0_a0 + af_af + 2.0 * (a0 + af) * aMax + 2.0 * (aMax_aMax - jMax * (aMax * tf + vd));
            let h0c = self.a0_p4 + 3.0 * self.af_p4 + 4.0 * self.a0_p3 * aMax + 8.0 * self.af_p3 * aMax
                + 6.0 * a0_a0 * aMax_aMax
                + 6.0 * af_af * (aMax_aMax - 2.0 * jMax * vd)
                + 12.0 * jMax * (-2.0 * aMax * jMax * (-pd + tf * self.v0) - aMax_aMax * vd + jMax * self.vd_vd)
                - 24.0 * af * aMax * jMax * vd
                - 4.0 * a0
                    * (self.af_p3 + 3.0 * af * aMax * (aMax - 2.0 * jMax * tf)
                        + 3.0 * af_af * (aMax - jMax * tf)
                        + 3.0 * jMax * (-(aMax_aMax * tf) + jMax * (-2.0 * pd + aMax * tf_tf + 2.0 * tf * vf)));
            let h1 = jMax.abs() / jMax * (4.0 * h0a * h0a - 6.0 * h0b * h0c).sqrt();
            let h2 = 6.0 * jMax * h0b;
            let h3 = 4.0 * self.a0_p3 + 6.0 * a0 * af_af + 2.0 * self.af_p3 + 12.0 * a0_a0 * aMax
                + 12.0 * (a0 + af) * af * aMax
                + 18.0 * (a0 + af) * aMax_aMax
                + 12.0 * pw(aMax, 3)
                - 12.0 * jMax * jMax * pd
                - 6.0 * af_af * jMax * tf
                - 12.0 * (a0 + af) * aMax * jMax * tf
                - 18.0 * aMax_aMax * jMax * tf
                + 6.0 * aMax * jMax * jMax * tf_tf
                - 12.0 * (a0 + aMax) * jMax * vd
                + 12.0 * jMax * jMax * tf * vf;

            profile.t[0] = 0.0;
            profile.t[1] = 0.0;
            profile.t[2] = (2.0 * h0a + h1) / h2;
            profile.t[3] = -(h3 + h1) / h2;
            profile.t[4] = (aMax + a0) / jMax - profile.t[2];
            profile.t[5] = tf - (profile.t[2] + profile.t[3] + profile.t[4] + (af + aMax) / jMax);
            profile.t[6] = (af + aMax) / jMax;

            if profile.check(ControlSigns::Uddu, tf, self.pf, vf, af, jMax, v_max, a_max, None) {
                return true;
            }
        }

        // Case UDUD, Solution 1
        {
            let h0a = -self.a0_p3 + self.af_p3 + 3.0 * a0_a0 * aMax - 3.0 * a0 * aMax_aMax
                + 3.0 * af * aMax * (aMax - 2.0 * jMax * tf)
                - 3.0 * af_af * (aMax - jMax * tf)
                + 3.0 * jMax * (aMax_aMax * tf + jMax * (-2.0 * pd - aMax * tf_tf + 2.0 * tf * vf));
            let h0b = a0_a0 - af_af + 2.0 * self.ad * aMax + 2.0 * jMax * (aMax * tf - vd);
            let h0c = self.a0_p4 + 3.0 * self.af_p4 - 4.0 * self.a0_p3 * aMax - 8.0 * self.af_p3 * aMax
                + 6.0 * a0_a0 * aMax_aMax
                - 24.0 * af * aMax * jMax * vd
                + 12.0 * jMax * (2.0 * aMax * jMax * (-pd + tf * self.v0) + jMax * self.vd_vd + aMax_aMax * vd)
                + 6.0 * af_af * (aMax_aMax + 2.0 * jMax * vd)
                - 4.0 * a0
                    * (self.af_p3 + 3.0 * af * aMax * (aMax - 2.0 * jMax * tf)
                        - 3.0 * af_af * (aMax - jMax * tf)
                        + 3.0 * jMax * (aMax_aMax * tf + jMax * (-2.0 * pd - aMax * tf_tf + 2.0 * tf * vf)));
            let h1 = jMax.abs() / jMax * (4.0 * h0a * h0a - 6.0 * h0b * h0c).sqrt();
            let h2 = 3.0 * jMax * h0b;

            profile.t[0] = 0.0;
            profile.t[1] = 0.0;
            profile.t[2] = -(h0a + h1 / 2.0) / h2;
            profile.t[3] = h1 / h2;
            profile.t[4] = (aMax - a0) / jMax + profile.t[2];
            profile.t[5] = tf - (profile.t[2] + profile.t[3] + profile.t[4] + (-af + aMax) / jMax);
            profile.t[6] = (-af + aMax) / jMax;

            if profile.check(ControlSigns::Udud, tf, self.pf, vf, af, jMax, v_max, a_max, None) {
                return true;
            }
        }

        false
    }

    // ---- acc0 (entry acc saturated, v not) ------------------------------

    fn time_up_acc0(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        let (a0, af, vd, pd, tf, v0) = (self.a0, self.af, self.vd, self.pd, self.tf, self.v0);
        let aMax = a_max;
        let aMax_aMax = aMax * aMax;
        let jMax = j_max;
        let a0_a0 = a0 * a0;
        let af_af = af * af;
        let tf_tf = self.tf_tf;

        let h0a = self.a0_p3 + 2.0 * self.af_p3 - 6.0 * af_af * aMax - 6.0 * pw(aMax, 3)
            - 6.0 * (a0 + af) * aMax * jMax * tf
            + 9.0 * aMax_aMax * (af + jMax * tf)
            + 3.0 * a0 * aMax * (-2.0 * af + 3.0 * aMax)
            + 3.0 * a0_a0 * (af - 2.0 * aMax + jMax * tf)
            - 6.0 * jMax * jMax * (-pd + tf * v0)
            + 6.0 * af * jMax * vd
            - 3.0 * aMax * jMax * (jMax * tf_tf + 2.0 * vd);
        let h0b = a0_a0 + af_af - 2.0 * (a0 + af) * aMax + 2.0 * (aMax_aMax - aMax * jMax * tf + jMax * vd);
        let h1 = jMax.abs() / jMax * (4.0 * h0a * h0a - 18.0 * pw(h0b, 3)).sqrt();
        let h2 = 6.0 * jMax * (a0_a0 + af_af + 2.0 * (aMax_aMax - (a0 + af) * aMax - aMax * jMax * tf + jMax * vd));
        let h3 = 2.0 * self.a0_p3 + 6.0 * a0_a0 * af + 4.0 * self.af_p3 - 12.0 * af_af * aMax
            + (18.0 * aMax - 12.0 * a0) * (a0 + af) * aMax
            - 12.0 * pw(aMax, 3)
            + 12.0 * jMax * jMax * pd
            + 6.0 * a0_a0 * jMax * tf
            + (18.0 * aMax - 12.0 * (a0 + af)) * aMax * jMax * tf
            - 6.0 * jMax * jMax * tf * (aMax * tf + 2.0 * v0)
            + 12.0 * (af - aMax) * jMax * vd;

        profile.t[0] = (-a0 + aMax) / jMax;
        profile.t[2] = -(h3 + h1) / h2;
        profile.t[3] = (h3 - h1) / h2;
        profile.t[1] = self.ad / jMax - 2.0 * profile.t[0] - profile.t[3] + tf;
        profile.t[4] = tf - (profile.t[0] + profile.t[1] + profile.t[2] + profile.t[3]);
        profile.t[5] = 0.0;
        profile.t[6] = 0.0;

        profile.check(ControlSigns::Uddu, tf, self.pf, self.vf, af, jMax, v_max, a_max, None)
    }

    // ---- none (nothing saturates) ---------------------------------------

    fn time_up_none(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        let (a0, af, vd, pd, tf, v0, vf, ad) = (self.a0, self.af, self.vd, self.pd, self.tf, self.v0, self.vf, self.ad);
        let jMax = j_max;
        let jMax_jMax = jMax * jMax;
        let a0_a0 = a0 * a0;
        let af_af = af * af;
        let tf_tf = self.tf_tf;
        let vd_vd = self.vd_vd;

        // Degenerate subfamilies are tried first: numerically stable where
        // the generic polynomial paths below are singular near rest.
        if v0.abs() < f64::EPSILON && a0.abs() < f64::EPSILON && vf.abs() < f64::EPSILON && af.abs() < f64::EPSILON {
            let j_max_new = 32.0 * pd / pw(tf, 3);

            profile.t[0] = tf / 4.0;
            profile.t[1] = 0.0;
            profile.t[2] = profile.t[0];
            profile.t[3] = 0.0;
            profile.t[4] = profile.t[0];
            profile.t[5] = 0.0;
            profile.t[6] = profile.t[0];

            return profile.check(ControlSigns::Uddu, tf, self.pf, vf, af, j_max_new, v_max, a_max, Some(jMax));
        }

        if v0.abs() < f64::EPSILON && a0.abs() < f64::EPSILON {
            let h1 = (tf_tf * vf * vf + pw(4.0 * pd - tf * vf, 2)).sqrt();
            let j_max_new = 4.0 * (4.0 * pd - 2.0 * tf * vf + h1) / pw(tf, 3);

            profile.t[0] = (-4.0 * pd + 3.0 * tf * vf + h1) / (4.0 * vf);
            profile.t[1] = 0.0;
            profile.t[2] = profile.t[0];
            profile.t[3] = 0.0;
            profile.t[4] = profile.t[0];
            profile.t[5] = 0.0;
            profile.t[6] = profile.t[0];

            if profile.check(ControlSigns::Uddu, tf, self.pf, vf, af, j_max_new, v_max, a_max, Some(jMax)) {
                return true;
            }
        }

        // The reference source disables an analogous `a0 = 0 ∧ vf = 0`
        // branch ("Solution 1") via a block comment with no justification.
        // We do not reinstate it without re-derivation (see DESIGN.md).

        if a0.abs() < f64::EPSILON && af.abs() < f64::EPSILON {
            let h1 = (tf_tf * vd_vd + 4.0 * pw(2.0 * pd - tf * (v0 + vf), 2)).sqrt();
            let j_max_new = 4.0
                * (4.0 * pd - 2.0 * tf * (v0 + vf)
                    - (16.0 * (pd * pd - pd * tf * (v0 + vf)) + tf_tf * (5.0 * v0 * v0 + 6.0 * v0 * vf + 5.0 * vf * vf))
                        .sqrt())
                / pw(tf, 3);

            profile.t[0] = (-4.0 * pd + tf * (v0 + 3.0 * vf) - h1) / (4.0 * vd);
            profile.t[1] = 0.0;
            profile.t[2] = profile.t[0];
            profile.t[3] = 0.0;
            profile.t[4] = -(-4.0 * pd + tf * (3.0 * v0 + vf) - h1) / (4.0 * vd);
            profile.t[5] = 0.0;
            profile.t[6] = profile.t[4];

            if profile.check(ControlSigns::Uddu, tf, self.pf, vf, af, j_max_new, v_max, a_max, Some(jMax)) {
                return true;
            }
        }

        // Profiles with a3 != 0, Solution UDDU
        {
            // First acc, then constant.
            {
                let b = (-2.0 * (-a0 + af + jMax * tf)) / jMax;
                let c = (2.0 * a0_a0 + 2.0 * af_af + 2.0 * af * jMax * tf - 4.0 * a0 * (af + jMax * tf)
                    + jMax * (jMax * tf_tf + 2.0 * vd))
                    / jMax_jMax;
                let d = (2.0
                    * (self.a0_p3 - self.af_p3 - 3.0 * af_af * jMax * tf - 3.0 * a0_a0 * (af + jMax * tf)
                        + 3.0 * a0 * pw(af + jMax * tf, 2)
                        - 6.0 * jMax_jMax * (-pd + tf * vf)))
                    / (3.0 * pw(jMax, 3));
                let e = (self.a0_p4 + self.af_p4 + 4.0 * self.af_p3 * jMax * tf + 6.0 * af_af * jMax_jMax * tf_tf
                    - 4.0 * self.a0_p3 * (af + jMax * tf)
                    + 6.0 * a0_a0 * pw(af + jMax * tf, 2)
                    + 24.0 * af * jMax_jMax * (-pd + tf * v0)
                    - 4.0 * a0 * (self.af_p3 + 3.0 * af_af * jMax * tf + 6.0 * jMax_jMax * (-pd + tf * vf))
                    + 12.0 * jMax_jMax * (vd_vd + jMax * tf * (-2.0 * pd + tf * (v0 + vf))))
                    / (12.0 * pw(jMax, 4));

                for t in solve_quart_monic(b, c, d, e) {
                    if t < 0.0 || t > tf {
                        continue;
                    }

                    profile.t[0] = t;
                    profile.t[1] = 0.0;
                    profile.t[2] = (a0_a0 + af_af - 2.0 * af * jMax * t - 2.0 * a0 * (af + jMax * (-t + tf))
                        + 2.0 * jMax * (jMax * t * (t - tf) + vd))
                        / (2.0 * jMax * (a0 - af + 2.0 * jMax * t - jMax * tf));
                    profile.t[3] = ad / jMax + (tf - 2.0 * t);
                    profile.t[4] = tf - (t + profile.t[2] + profile.t[3]);
                    profile.t[5] = 0.0;
                    profile.t[6] = 0.0;

                    if profile.check(ControlSigns::Uddu, tf, self.pf, vf, af, jMax, v_max, a_max, None) {
                        return true;
                    }
                }
            }

            // First constant, then acc.
            {
                let ph1 = self.ad_ad + 2.0 * (af + a0) * jMax * tf - jMax * (jMax * tf_tf + 4.0 * vd);
                let ph2 = jMax * tf_tf * (-pd + tf * v0) - vd * (-2.0 * pd - tf * v0 + 3.0 * tf * vf);
                let ph3 = 5.0 * af_af - 8.0 * af * jMax * tf + 2.0 * jMax * (2.0 * jMax * tf_tf - vd);
                let ph4 = jMax_jMax * pw(tf, 4) - 2.0 * vd_vd + 8.0 * jMax * tf * (-pd + tf * vf);
                let ph5 = 5.0 * pw(af, 4) - 8.0 * pw(af, 3) * jMax * tf - 12.0 * af_af * jMax * (jMax * tf_tf + vd)
                    + 24.0 * af * jMax_jMax * (-2.0 * pd + jMax * pw(tf, 3) + 2.0 * tf * vf)
                    - 6.0 * jMax_jMax * ph4;

                let b = -(4.0 * self.a0_p3 - 4.0 * self.af_p3 - 12.0 * a0_a0 * (af - jMax * tf)
                    + 6.0 * a0 * (2.0 * af_af - 2.0 * af * jMax * tf + jMax * (jMax * tf_tf - 2.0 * vd))
                    + 6.0 * af * jMax * (3.0 * jMax * tf_tf + 2.0 * vd)
                    - 6.0 * jMax_jMax * (-4.0 * pd + jMax * pw(tf, 3) - 2.0 * tf * v0 + 6.0 * tf * vf))
                    / (3.0 * jMax * ph1);
                let c = -(-a0_a0 * a0_a0 - pw(af, 4) + 4.0 * self.a0_p3 * (af - jMax * tf)
                    + a0_a0 * (-6.0 * af_af + 8.0 * af * jMax * tf - 4.0 * jMax * (jMax * tf_tf - vd))
                    + 2.0 * af_af * jMax * (jMax * tf_tf + 2.0 * vd)
                    - 4.0 * af * jMax_jMax * (-3.0 * pd + jMax * pw(tf, 3) + 2.0 * tf * v0 + tf * vf)
                    + jMax_jMax * (jMax_jMax * pw(tf, 4) - 8.0 * vd_vd + 4.0 * jMax * tf * (-3.0 * pd + tf * v0 + 2.0 * tf * vf))
                    + 2.0 * a0
                        * (2.0 * pw(af, 3) - 2.0 * af_af * jMax * tf + af * jMax * (-3.0 * jMax * tf_tf + 4.0 * v0 - 4.0 * vf)
                            + jMax_jMax * (-6.0 * pd + jMax * pw(tf, 3) - 4.0 * tf * v0 + 10.0 * tf * vf)))
                    / (jMax_jMax * ph1);
                let d = -(pw(a0, 5) - pw(af, 5) + pw(af, 4) * jMax * tf - 5.0 * self.a0_p4 * (af - jMax * tf)
                    + 2.0 * self.a0_p3 * ph3
                    + 4.0 * pw(af, 3) * jMax * (jMax * tf_tf + vd)
                    - 12.0 * af_af * jMax_jMax * (-2.0 * pd + tf * (v0 + vf))
                    + 12.0 * af * jMax_jMax * (-vd_vd + jMax * tf * (-2.0 * pd + 3.0 * tf * v0 - tf * vf))
                    - 2.0 * a0_a0
                        * (5.0 * pw(af, 3) - 9.0 * af_af * jMax * tf - 6.0 * af * jMax * vd
                            + 6.0 * jMax_jMax * (-2.0 * pd - tf * v0 + 3.0 * tf * vf))
                    - 12.0 * pw(jMax, 3) * ph2
                    + a0 * ph5)
                    / (3.0 * pw(jMax, 3) * ph1);
                let e = -(-pw(a0, 6) - pw(af, 6) + 6.0 * pw(a0, 5) * (af - jMax * tf)
                    - 48.0 * pw(af, 3) * jMax_jMax * (-pd + tf * v0)
                    + 72.0 * pw(jMax, 3) * (jMax * pw(-pd + tf * v0, 2) - pw(v0 - vf, 3))
                    - 3.0 * self.a0_p4 * ph3
                    + 144.0 * af * pw(jMax, 3) * (-pd + tf * v0) * vd
                    - 36.0 * af_af * jMax_jMax * vd_vd
                    + 6.0 * pw(af, 4) * jMax * vd
                    + 4.0 * self.a0_p3
                        * (5.0 * pw(af, 3) - 9.0 * af_af * jMax * tf - 6.0 * af * jMax * vd
                            + 6.0 * jMax_jMax * (-2.0 * pd - tf * v0 + 3.0 * tf * vf))
                    - 3.0 * a0_a0 * ph5
                    + 6.0 * a0
                        * (pw(af, 5) - pw(af, 4) * jMax * tf - 4.0 * pw(af, 3) * jMax * (jMax * tf_tf + vd)
                            + 12.0 * af_af * jMax_jMax * (-2.0 * pd + tf * (v0 + vf))
                            - 12.0 * af * jMax_jMax * (-vd_vd + jMax * tf * (-2.0 * pd + 3.0 * tf * v0 - tf * vf))
                            + 12.0 * pw(jMax, 3) * ph2))
                    / (18.0 * pw(jMax, 4) * ph1);

                for t in solve_quart_monic(b, c, d, e) {
                    if t < 0.0 || t > tf {
                        continue;
                    }

                    profile.t[0] = 0.0;
                    profile.t[1] = 0.0;
                    profile.t[2] = t;
                    profile.t[3] = tf
                        - 2.0 * t
                        - ad / jMax
                        - (2.0 * (a0_a0 + af_af + 2.0 * af * jMax * t - 2.0 * a0 * (af + jMax * (t - tf))
                            + 2.0 * jMax * (jMax * t * (t - tf) - vd)))
                            .sqrt()
                            / jMax.abs();
                    profile.t[4] = -ad / (2.0 * jMax) - (2.0 * t + profile.t[3] - tf) / 2.0;
                    profile.t[5] = 0.0;
                    profile.t[6] = tf - (t + profile.t[3] + profile.t[4]);

                    if profile.check(ControlSigns::Uddu, tf, self.pf, vf, af, jMax, v_max, a_max, None) {
                        return true;
                    }
                }
            }
        }

        // Profiles with a3 != 0, Solution UDUD: first constant, then acc.
        {
            let ph2 = jMax * tf_tf * (-pd + tf * v0) - vd * (-2.0 * pd - tf * v0 + 3.0 * tf * vf);
            let ph3 = 5.0 * af_af - 8.0 * af * jMax * tf + 2.0 * jMax * (2.0 * jMax * tf_tf - vd);
            let ph4 = jMax_jMax * pw(tf, 4) - 2.0 * vd_vd + 8.0 * jMax * tf * (-pd + tf * vf);
            let ph5 = 5.0 * pw(af, 4) - 8.0 * pw(af, 3) * jMax * tf - 12.0 * af_af * jMax * (jMax * tf_tf + vd)
                + 24.0 * af * jMax_jMax * (-2.0 * pd + jMax * pw(tf, 3) + 2.0 * tf * vf)
                - 6.0 * jMax_jMax * ph4;
            let ph6 = -vd_vd + jMax * tf * (-2.0 * pd + 3.0 * tf * v0 - tf * vf);

            let denom = a0 - af + jMax * tf;
            let b = (4.0 * af * tf - 2.0 * jMax * tf_tf - 4.0 * vd) / denom;
            let c = (-2.0 * a0_a0 * a0_a0 - 2.0 * pw(af, 4) + 8.0 * pw(af, 3) * jMax * tf
                + 6.0 * af_af * jMax_jMax * tf_tf
                + 8.0 * self.a0_p3 * (af - jMax * tf)
                - 12.0 * a0_a0 * pw(af - jMax * tf, 2)
                - 12.0 * af * jMax_jMax * (-pd + jMax * pw(tf, 3) - 2.0 * tf * v0 + 3.0 * tf * vf)
                + 2.0 * a0
                    * (4.0 * pw(af, 3) - 12.0 * af_af * jMax * tf + 9.0 * af * jMax_jMax * tf_tf
                        - 3.0 * jMax_jMax * (2.0 * pd + jMax * pw(tf, 3) - 2.0 * tf * vf))
                + 3.0 * jMax_jMax * (jMax_jMax * pw(tf, 4) + 4.0 * vd_vd - 4.0 * jMax * tf * (pd + tf * v0 - 2.0 * tf * vf)))
                / (3.0 * jMax_jMax * denom * denom);
            let d = (-pw(a0, 5) + pw(af, 5) - pw(af, 4) * jMax * tf + 5.0 * self.a0_p4 * (af - jMax * tf)
                - 2.0 * self.a0_p3 * ph3
                - 4.0 * pw(af, 3) * jMax * (jMax * tf_tf + vd)
                + 12.0 * af_af * jMax_jMax * (-2.0 * pd + tf * (v0 + vf))
                - 12.0 * af * jMax_jMax * ph6
                + 2.0 * a0_a0
                    * (5.0 * pw(af, 3) - 9.0 * af_af * jMax * tf - 6.0 * af * jMax * vd
                        + 6.0 * jMax_jMax * (-2.0 * pd - tf * v0 + 3.0 * tf * vf))
                + 12.0 * pw(jMax, 3) * ph2
                + a0 * (-5.0 * pw(af, 4) + 8.0 * pw(af, 3) * jMax * tf + 12.0 * af_af * jMax * (jMax * tf_tf + vd)
                    - 24.0 * af * jMax_jMax * (-2.0 * pd + jMax * pw(tf, 3) + 2.0 * tf * vf)
                    + 6.0 * jMax_jMax * ph4))
                / (3.0 * pw(jMax, 3) * denom * denom);
            let e = -(pw(a0, 6) + pw(af, 6) - 6.0 * pw(a0, 5) * (af - jMax * tf)
                + 48.0 * pw(af, 3) * jMax_jMax * (-pd + tf * v0)
                - 72.0 * pw(jMax, 3) * (jMax * pw(-pd + tf * v0, 2) - pw(v0 - vf, 3))
                + 3.0 * self.a0_p4 * ph3
                - 6.0 * pw(af, 4) * jMax * vd
                - 144.0 * af * pw(jMax, 3) * (-pd + tf * v0) * vd
                + 36.0 * af_af * jMax_jMax * vd_vd
                - 4.0 * self.a0_p3
                    * (5.0 * pw(af, 3) - 9.0 * af_af * jMax * tf - 6.0 * af * jMax * vd
                        + 6.0 * jMax_jMax * (-2.0 * pd - tf * v0 + 3.0 * tf * vf))
                + 3.0 * a0_a0 * ph5
                - 6.0 * a0
                    * (pw(af, 5) - pw(af, 4) * jMax * tf - 4.0 * pw(af, 3) * jMax * (jMax * tf_tf + vd)
                        + 12.0 * af_af * jMax_jMax * (-2.0 * pd + tf * (v0 + vf))
                        - 12.0 * af * jMax_jMax * ph6
                        + 12.0 * pw(jMax, 3) * ph2))
                / (18.0 * pw(jMax, 4) * denom * denom);

            for t in solve_quart_monic(b, c, d, e) {
                if t < 0.0 || t > tf {
                    continue;
                }

                let h1 = ((a0_a0 + af_af) / 2.0 - af * (a0 + jMax * t) + a0 * jMax * (t + tf) + jMax * (jMax * t * tf - vd))
                    .sqrt()
                    / jMax.abs();

                profile.t[0] = t;
                profile.t[1] = -ad / jMax + tf - 2.0 * h1;
                profile.t[2] = h1;
                profile.t[3] = 0.0;
                profile.t[4] = ad / jMax + h1 - t;
                profile.t[5] = 0.0;
                profile.t[6] = 0.0;

                if profile.check(ControlSigns::Udud, tf, self.pf, vf, af, jMax, v_max, a_max, None) {
                    return true;
                }
            }
        }

        false
    }

    // ---- down-family: negate limits and delegate to the up case --------

    fn time_down_acc0_acc1_vel(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        self.time_up_acc0_acc1_vel(profile, -v_max, -a_max, -j_max)
    }
    fn time_down_acc1_vel(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        self.time_up_acc1_vel(profile, -v_max, -a_max, -j_max)
    }
    fn time_down_acc0_vel(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        self.time_up_acc0_vel(profile, -v_max, -a_max, -j_max)
    }
    fn time_down_vel(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        self.time_up_vel(profile, -v_max, -a_max, -j_max)
    }
    fn time_down_acc0_acc1(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        self.time_up_acc0_acc1(profile, -v_max, -a_max, -j_max)
    }
    fn time_down_acc1(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        self.time_up_acc1(profile, -v_max, -a_max, -j_max)
    }
    fn time_down_acc0(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        self.time_up_acc0(profile, -v_max, -a_max, -j_max)
    }
    fn time_down_none(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        self.time_up_none(profile, -v_max, -a_max, -j_max)
    }

    /// Dispatcher: try every case in the direction-dependent order from
    /// the distilled spec's section 4.4, returning on the first accepted
    /// candidate.
    pub fn get_profile(&self, profile: &mut Profile, v_max: f64, a_max: f64, j_max: f64) -> bool {
        profile.a[0] = self.a0;
        profile.v[0] = self.v0;
        profile.p[0] = self.p0;

        macro_rules! try_case {
            ($case:ident) => {
                if self.$case(profile, v_max, a_max, j_max) {
                    return true;
                }
            };
        }

        if self.pd > 0.0 {
            try_case!(time_up_acc0_acc1_vel);
            try_case!(time_down_acc0_acc1_vel);
            try_case!(time_up_acc0_vel);
            try_case!(time_down_acc0_vel);
            try_case!(time_up_acc1_vel);
            try_case!(time_down_acc1_vel);
            try_case!(time_up_vel);
            try_case!(time_down_vel);
            try_case!(time_up_none);
            try_case!(time_up_acc0);
            try_case!(time_up_acc1);
            try_case!(time_up_acc0_acc1);
            try_case!(time_down_acc0);
            try_case!(time_down_acc1);
            try_case!(time_down_acc0_acc1);
            try_case!(time_down_none);
        } else {
            try_case!(time_down_acc0_acc1_vel);
            try_case!(time_up_acc0_acc1_vel);
            try_case!(time_down_acc0_vel);
            try_case!(time_up_acc0_vel);
            try_case!(time_down_acc1_vel);
            try_case!(time_up_acc1_vel);
            try_case!(time_down_vel);
            try_case!(time_up_vel);
            try_case!(time_down_none);
            try_case!(time_down_acc0);
            try_case!(time_down_acc1);
            try_case!(time_down_acc0_acc1);
            try_case!(time_up_acc0);
            try_case!(time_up_acc1);
            try_case!(time_up_acc0_acc1);
            try_case!(time_up_none);
        }

        false
    }
}

/// Critical points (roots of `poly`'s derivative) inside `(0, tz_max)`,
/// sorted ascending — used to partition the domain into monotone
/// intervals for [`bracket_sign_changes`].
fn find_sorted_roots_of_derivative(polynom: &[f64], tz_max: f64) -> Vec<f64> {
    let degree = polynom.len() - 1;
    // Build the derivative in the same "monic-first" convention.
    let mut deriv = Vec::with_capacity(degree);
    deriv.push(1.0);
    for (i, &c) in polynom.iter().enumerate().skip(1).take(degree - 1) {
        let power = (degree - i) as f64;
        deriv.push(power / (degree as f64) * c);
    }

    match deriv.len() {
        5 => solve_quart_monic(deriv[1], deriv[2], deriv[3], deriv[4]),
        _ => Vec::new(),
    }
    .into_iter()
    .filter(|t| *t > 0.0 && *t < tz_max)
    .collect::<Vec<_>>()
    .tap_sort()
}

trait TapSort {
    fn tap_sort(self) -> Self;
}

impl TapSort for Vec<f64> {
    fn tap_sort(mut self) -> Self {
        self.sort_by(|a, b| a.partial_cmp(b).unwrap());
        self
    }
}

/// Walk `0 -> critical_points -> tz_max` and keep only the sub-intervals
/// where `poly` actually changes sign, mirroring the reference's
/// `tz_intervals` construction (including the near-zero-crossing
/// double-root widening).
fn bracket_sign_changes(polynom: &[f64], critical_points: &[f64], lo_bound: f64, hi_bound: f64) -> Vec<(f64, f64)> {
    let mut intervals = Vec::new();
    let mut current = lo_bound;

    for &cp in critical_points {
        if cp <= lo_bound || cp >= hi_bound {
            continue;
        }
        let val_current = poly_eval(polynom, current);
        let val_new = poly_eval(polynom, cp);
        if val_new.abs() < 1e-15 {
            intervals.push((cp - 2e-16, cp + 2e-16));
        } else if val_current * val_new < 0.0 {
            intervals.push((current, cp));
        }
        current = cp;
    }

    if poly_eval(polynom, current) * poly_eval(polynom, hi_bound) < 0.0 {
        intervals.push((current, hi_bound));
    }

    intervals
}
