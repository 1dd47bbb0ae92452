//! Integration tests for the Step 2 case library's testable properties:
//! terminal reachability, duration exactness, limit respect, and
//! non-negativity, plus the sign-symmetry and monotone-feasibility
//! relationships between the "up" and "down" case families, and a handful
//! of concrete boundary-condition scenarios.

use float_cmp::assert_approx_eq;
use trajgen::step1::minimum_time;
use trajgen::{synchronize, AxisLimits, AxisState, ControlSigns, Profile, Step2};

const V_MAX: f64 = 5.0;
const A_MAX: f64 = 10.0;
const J_MAX: f64 = 40.0;

fn solve(tf: f64, p0: f64, v0: f64, a0: f64, pf: f64, vf: f64, af: f64) -> Option<Profile> {
    let step2 = Step2::new(tf, p0, v0, a0, pf, vf, af);
    let mut profile = Profile::new(p0, v0, a0);
    if step2.get_profile(&mut profile, V_MAX, A_MAX, J_MAX) {
        Some(profile)
    } else {
        None
    }
}

fn assert_reaches_terminal_state(profile: &Profile, pf: f64, vf: f64, af: f64) {
    let (p, v, a) = profile.at_time(profile.duration());
    assert_approx_eq!(f64, p, pf, epsilon = 1e-4);
    assert_approx_eq!(f64, v, vf, epsilon = 1e-4);
    assert_approx_eq!(f64, a, af, epsilon = 1e-4);
}

fn assert_duration_exact(profile: &Profile, tf: f64) {
    assert_approx_eq!(f64, profile.duration(), tf, epsilon = 1e-6);
}

fn assert_respects_limits(profile: &Profile) {
    for i in 0..8 {
        assert!(profile.v[i].abs() <= V_MAX + 1e-6, "v[{i}] = {} exceeds {V_MAX}", profile.v[i]);
        assert!(profile.a[i].abs() <= A_MAX + 1e-6, "a[{i}] = {} exceeds {A_MAX}", profile.a[i]);
    }
}

fn assert_non_negative_durations(profile: &Profile) {
    for (i, t) in profile.t.iter().enumerate() {
        assert!(*t >= -1e-9, "t[{i}] = {t} is negative");
    }
}

// S1: rest-to-rest, displacement large enough to saturate velocity.
#[test]
fn s1_rest_to_rest_saturates_velocity() {
    let t_min = minimum_time(0.0, 0.0, 0.0, 10.0, 0.0, 0.0, V_MAX, A_MAX, J_MAX).expect("feasible");
    let profile = solve(t_min, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0).expect("Step 2 accepts its own Step 1 duration");

    assert_reaches_terminal_state(&profile, 10.0, 0.0, 0.0);
    assert_duration_exact(&profile, t_min);
    assert_respects_limits(&profile);
    assert_non_negative_durations(&profile);
}

// S2: rest-to-rest, short displacement that never reaches v_max or a_max.
#[test]
fn s2_short_move_stays_under_limits() {
    let t_min = minimum_time(0.0, 0.0, 0.0, 0.05, 0.0, 0.0, V_MAX, A_MAX, J_MAX).expect("feasible");
    let profile = solve(t_min, 0.0, 0.0, 0.0, 0.05, 0.0, 0.0).expect("reachable");

    assert_reaches_terminal_state(&profile, 0.05, 0.0, 0.0);
    assert_respects_limits(&profile);
    assert_non_negative_durations(&profile);
}

// S3: nonzero initial velocity and acceleration at both ends.
#[test]
fn s3_nonzero_boundary_conditions() {
    let (p0, v0, a0) = (0.0, 1.0, 2.0);
    let (pf, vf, af) = (8.0, 2.0, -1.0);
    let t_min = minimum_time(p0, v0, a0, pf, vf, af, V_MAX, A_MAX, J_MAX).expect("feasible");
    let profile = solve(t_min * 1.2, p0, v0, a0, pf, vf, af).expect("reachable at a relaxed duration");

    assert_reaches_terminal_state(&profile, pf, vf, af);
    assert_duration_exact(&profile, t_min * 1.2);
    assert_respects_limits(&profile);
}

// S4: negative net displacement exercises the "down" case family via the
// pd <= 0 dispatch branch.
#[test]
fn s4_negative_displacement_uses_down_family() {
    let t_min = minimum_time(0.0, 0.0, 0.0, -10.0, 0.0, 0.0, V_MAX, A_MAX, J_MAX).expect("feasible");
    let profile = solve(t_min, 0.0, 0.0, 0.0, -10.0, 0.0, 0.0).expect("reachable");

    assert_reaches_terminal_state(&profile, -10.0, 0.0, 0.0);
    assert_respects_limits(&profile);
}

// S5: sign symmetry -- negating every boundary condition and limit should
// negate the resulting profile's kinematic trace at every sample point.
#[test]
fn s5_sign_symmetric_profiles_mirror_each_other() {
    let tf = minimum_time(0.0, 0.0, 0.0, 10.0, 0.0, 0.0, V_MAX, A_MAX, J_MAX).expect("feasible");
    let up = solve(tf, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0).expect("reachable");
    let down = solve(tf, 0.0, 0.0, 0.0, -10.0, 0.0, 0.0).expect("reachable");

    for frac in [0.0, 0.25, 0.5, 0.75, 1.0] {
        let t = frac * tf;
        let (p_up, v_up, a_up) = up.at_time(t);
        let (p_down, v_down, a_down) = down.at_time(t);
        assert_approx_eq!(f64, p_up + p_down, 0.0, epsilon = 1e-3);
        assert_approx_eq!(f64, v_up + v_down, 0.0, epsilon = 1e-3);
        assert_approx_eq!(f64, a_up + a_down, 0.0, epsilon = 1e-3);
    }
}

// S6: monotone feasibility -- if tf is feasible, a larger tf should remain
// feasible for the same boundary conditions.
#[test]
fn s6_monotone_feasibility_in_tf() {
    let t_min = minimum_time(0.0, 0.0, 0.0, 10.0, 0.0, 0.0, V_MAX, A_MAX, J_MAX).expect("feasible");

    assert!(solve(t_min, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0).is_some());
    assert!(solve(t_min * 1.5, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0).is_some());
    assert!(solve(t_min * 3.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0).is_some());
}

#[test]
fn rejects_tf_shorter_than_minimum_time() {
    let t_min = minimum_time(0.0, 0.0, 0.0, 10.0, 0.0, 0.0, V_MAX, A_MAX, J_MAX).expect("feasible");
    assert!(solve(t_min * 0.5, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0).is_none());
}

#[test]
fn profile_family_tag_is_one_of_the_two_control_sign_patterns() {
    let t_min = minimum_time(0.0, 0.0, 0.0, 10.0, 0.0, 0.0, V_MAX, A_MAX, J_MAX).expect("feasible");
    let profile = solve(t_min, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0).expect("reachable");
    assert!(matches!(profile.control_signs, ControlSigns::Uddu | ControlSigns::Udud));
}

#[test]
fn synchronization_picks_the_slower_axis_duration() {
    let states = [
        AxisState { p: 0.0, v: 0.0, a: 0.0, target_p: 1.0, target_v: 0.0, target_a: 0.0 },
        AxisState { p: 0.0, v: 0.0, a: 0.0, target_p: 50.0, target_v: 0.0, target_a: 0.0 },
        AxisState { p: 0.0, v: 0.0, a: 0.0, target_p: 5.0, target_v: 0.0, target_a: 0.0 },
    ];
    let limits = [
        AxisLimits { v_max: V_MAX, a_max: A_MAX, j_max: J_MAX },
        AxisLimits { v_max: V_MAX, a_max: A_MAX, j_max: J_MAX },
        AxisLimits { v_max: V_MAX, a_max: A_MAX, j_max: J_MAX },
    ];

    let per_axis_min: Vec<f64> = states
        .iter()
        .map(|s| minimum_time(s.p, s.v, s.a, s.target_p, s.target_v, s.target_a, V_MAX, A_MAX, J_MAX).unwrap())
        .collect();
    let expected_tf = per_axis_min.iter().cloned().fold(0.0, f64::max);

    let trajectory = synchronize(&states, &limits).expect("feasible batch");
    assert_approx_eq!(f64, trajectory.tf(), expected_tf, epsilon = 1e-4);

    for (axis, state) in states.iter().enumerate() {
        let sampled = &trajectory.sample(trajectory.tf())[axis];
        assert_approx_eq!(f64, sampled.p, state.target_p, epsilon = 1e-3);
    }
}

#[test]
fn validation_rejects_ill_posed_input_before_synchronizing() {
    let states = [AxisState { p: f64::NAN, ..Default::default() }];
    let limits = [AxisLimits { v_max: V_MAX, a_max: A_MAX, j_max: J_MAX }];
    assert!(synchronize(&states, &limits).is_err());
}
