//! Polynomial root finding for the Step 2 case library.
//!
//! Two tiers, matching the distilled spec's section 4.3:
//! - [`solve_quart_monic`]: a closed-form (Ferrari-style) solver for monic
//!   quartics, used directly by several cases and as the critical-point
//!   finder for the quintic/sextic `vel` cases.
//! - [`shrink_interval`]: a safe hybrid bisection/Newton refiner for a
//!   polynomial of any degree, given a bracket with a sign change. Used to
//!   refine both the quartic's own near-degenerate roots (rarely needed,
//!   since Ferrari is closed-form) and the higher-degree `vel`-case
//!   polynomials via their derivative chains.
//!
//! Coefficients are always stored highest-degree-first is NOT the
//! convention here — to match the case library's construction (which
//! fills `polynom[0] = 1.0` for the leading monic term and increasing
//! indices for decreasing powers, exactly as the reference coefficient
//! derivation does), `polyEval` and friends treat `coeffs[0]` as the
//! coefficient of the highest power and the last entry as the constant
//! term, consistent with a monic polynomial of degree `coeffs.len() - 1`.

/// Evaluate a polynomial given in the case library's convention:
/// `coeffs[0]` is the (implicitly 1.0, monic) leading coefficient down to
/// `coeffs[coeffs.len() - 1]`, the constant term, evaluated via Horner's
/// method.
pub fn poly_eval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Evaluate the derivative of a polynomial given in the same convention.
pub fn poly_eval_derivative(coeffs: &[f64], x: f64) -> f64 {
    let degree = coeffs.len() - 1;
    let mut acc = 0.0;
    for (i, &c) in coeffs.iter().enumerate().take(degree) {
        let power = degree - i;
        acc = acc * x + (power as f64) * c;
    }
    acc
}

/// Safe root refinement on `[lo, hi]` where `poly(lo)` and `poly(hi)` have
/// opposite signs: bisection guarantees progress every step, with a Newton
/// step taken whenever it stays inside the current bracket (for
/// superlinear convergence). Mirrors the distilled spec's "hybrid
/// interval-bisection/Newton" description; Newton alone is not safe on
/// these coefficients because of how flat the derivative can get near
/// double roots.
pub fn shrink_interval(coeffs: &[f64], mut lo: f64, mut hi: f64, epsilon: f64) -> f64 {
    let mut f_lo = poly_eval(coeffs, lo);
    let mut f_hi = poly_eval(coeffs, hi);

    if f_lo == 0.0 {
        return lo;
    }
    if f_hi == 0.0 {
        return hi;
    }
    // Ordinarily `f_lo * f_hi < 0.0` here, but `bracket_sign_changes` also
    // hands us the deliberately widened near-double-root interval
    // `(cp - 2e-16, cp + 2e-16)`, where both endpoints can share a sign.
    // That bracket is narrower than any `epsilon` we're called with, so the
    // loop below never iterates and we just return its midpoint as-is.

    let mut mid = 0.5 * (lo + hi);

    while (hi - lo) > epsilon {
        mid = 0.5 * (lo + hi);
        let f_mid = poly_eval(coeffs, mid);

        // Try a Newton step from the midpoint; accept it only if it stays
        // strictly inside the bracket, otherwise fall back to bisection.
        let df_mid = poly_eval_derivative(coeffs, mid);
        if df_mid.abs() > f64::EPSILON {
            let newton = mid - f_mid / df_mid;
            if newton > lo && newton < hi {
                let f_newton = poly_eval(coeffs, newton);
                if f_newton == 0.0 {
                    return newton;
                }
                if f_lo * f_newton < 0.0 {
                    hi = newton;
                    f_hi = f_newton;
                } else {
                    lo = newton;
                    f_lo = f_newton;
                }
                continue;
            }
        }

        if f_mid == 0.0 {
            return mid;
        }
        if f_lo * f_mid < 0.0 {
            hi = mid;
            f_hi = f_mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    mid
}

/// Real roots of a monic quartic `x^4 + b x^3 + c x^2 + d x + e`, found via
/// the classical depressed-quartic + resolvent-cubic (Ferrari) reduction.
/// Handles the biquadratic special case (`d == 0`) separately to avoid
/// dividing by a vanishing coefficient, and tolerates near-degenerate
/// discriminants by falling back to the resolvent cubic's real root set
/// directly. Returns an unordered, possibly-empty set of real roots (not a
/// guaranteed-distinct multiset — a double root may appear twice).
pub fn solve_quart_monic(b: f64, c: f64, d: f64, e: f64) -> Vec<f64> {
    // Depress: x = y - b/4
    let shift = b / 4.0;
    let b2 = b * b;
    let p = c - 3.0 * b2 / 8.0;
    let q = d - b * c / 2.0 + b2 * b / 8.0;
    let r = e - b * d / 4.0 + b2 * c / 16.0 - 3.0 * b2 * b2 / 256.0;

    let mut roots = Vec::with_capacity(4);

    if q.abs() < 1e-12 {
        // Biquadratic: y^4 + p y^2 + r = 0
        let disc = p * p - 4.0 * r;
        if disc >= 0.0 {
            let sqrt_disc = disc.sqrt();
            for z in [(-p + sqrt_disc) / 2.0, (-p - sqrt_disc) / 2.0] {
                if z >= 0.0 {
                    let root = z.sqrt();
                    roots.push(root - shift);
                    roots.push(-root - shift);
                } else if z.abs() < 1e-9 {
                    roots.push(-shift);
                }
            }
        }
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        return roots;
    }

    // Resolvent cubic: m^3 + 2p m^2 + (p^2 - 4r) m - q^2 = 0
    let cubic_roots = solve_cubic_monic(2.0 * p, p * p - 4.0 * r, -q * q);
    // Pick a positive root of the resolvent to split the quartic into two
    // quadratics; any positive real root works analytically.
    let m = cubic_roots
        .into_iter()
        .filter(|m| *m > 1e-12)
        .fold(None, |best: Option<f64>, m| match best {
            Some(b) if b >= m => Some(b),
            _ => Some(m),
        });

    let Some(m) = m else {
        return roots;
    };

    let sqrt_m = m.sqrt();
    // y^2 + sqrt_m y + (p/2 + m/2 - q/(2 sqrt_m)) = 0
    // y^2 - sqrt_m y + (p/2 + m/2 + q/(2 sqrt_m)) = 0
    let term = q / (2.0 * sqrt_m);
    let half_p_m = p / 2.0 + m / 2.0;

    for (lin, k) in [(sqrt_m, half_p_m - term), (-sqrt_m, half_p_m + term)] {
        let disc = lin * lin - 4.0 * k;
        if disc >= 0.0 {
            let sqrt_disc = disc.sqrt();
            roots.push((-lin + sqrt_disc) / 2.0 - shift);
            roots.push((-lin - sqrt_disc) / 2.0 - shift);
        }
    }

    roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
    roots
}

/// Real roots of a monic quartic given as `[1, b, c, d, e]`, matching the
/// case library's `polynom` array convention directly.
pub fn solve_quart_monic_array(polynom: &[f64; 5]) -> Vec<f64> {
    debug_assert!((polynom[0] - 1.0).abs() < 1e-12);
    solve_quart_monic(polynom[1], polynom[2], polynom[3], polynom[4])
}

/// Real roots of a monic cubic `x^3 + b x^2 + c x + d`, via the
/// trigonometric (Viete) method when the discriminant indicates three real
/// roots, and Cardano's formula otherwise.
fn solve_cubic_monic(b: f64, c: f64, d: f64) -> Vec<f64> {
    let shift = b / 3.0;
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;

    if p.abs() < 1e-14 {
        return vec![(-q).cbrt() - shift];
    }

    let disc = (q / 2.0) * (q / 2.0) + (p / 3.0) * (p / 3.0) * (p / 3.0);

    if disc > 0.0 {
        let sqrt_disc = disc.sqrt();
        let u = (-q / 2.0 + sqrt_disc).cbrt();
        let v = (-q / 2.0 - sqrt_disc).cbrt();
        vec![u + v - shift]
    } else {
        // Three real roots (disc <= 0): trigonometric form.
        let r = 2.0 * (-p / 3.0).sqrt();
        let phi = (3.0 * q / (p * r)).clamp(-1.0, 1.0).acos() / 3.0;
        (0..3)
            .map(|k| r * (phi - 2.0 * std::f64::consts::PI * (k as f64) / 3.0).cos() - shift)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn quart_monic_factored_roots() {
        // (x-1)(x-2)(x-3)(x-4) = x^4 -10x^3 +35x^2 -50x +24
        let mut roots = solve_quart_monic(-10.0, 35.0, -50.0, 24.0);
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(roots.len(), 4);
        let expected = [1.0, 2.0, 3.0, 4.0];
        for (r, e) in roots.iter().zip(expected.iter()) {
            assert_approx_eq!(f64, *r, *e, epsilon = 1e-6);
        }
    }

    #[test]
    fn quart_monic_biquadratic() {
        // x^4 - 5x^2 + 4 = (x^2-1)(x^2-4) -> roots +-1, +-2
        let mut roots = solve_quart_monic(0.0, -5.0, 0.0, 4.0);
        roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(roots.len(), 4);
        assert_approx_eq!(f64, roots[0], -2.0, epsilon = 1e-9);
        assert_approx_eq!(f64, roots[1], -1.0, epsilon = 1e-9);
        assert_approx_eq!(f64, roots[2], 1.0, epsilon = 1e-9);
        assert_approx_eq!(f64, roots[3], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn quart_monic_no_real_roots() {
        // x^4 + 1 = 0 has no real roots
        let roots = solve_quart_monic(0.0, 0.0, 0.0, 1.0);
        assert!(roots.is_empty());
    }

    #[test]
    fn shrink_interval_finds_root() {
        // x^3 - x - 2 has a real root near x = 1.5214
        let coeffs = [1.0, 0.0, -1.0, -2.0];
        let root = shrink_interval(&coeffs, 1.0, 2.0, 1e-14);
        assert_approx_eq!(f64, poly_eval(&coeffs, root), 0.0, epsilon = 1e-8);
        assert_approx_eq!(f64, root, 1.5213797068, epsilon = 1e-6);
    }
}
