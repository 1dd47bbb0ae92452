//! Synchronizes two axes of different displacement and reports the shared
//! duration the slower axis forces onto the faster one.

use env_logger::Env;
use trajgen::{synchronize, AxisLimits, AxisState};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let states = [
        AxisState { p: 0.0, v: 0.0, a: 0.0, target_p: 10.0, target_v: 0.0, target_a: 0.0 },
        AxisState { p: 0.0, v: 0.0, a: 0.0, target_p: 150.0, target_v: 0.0, target_a: 0.0 },
    ];
    let limits = [
        AxisLimits { v_max: 5.0, a_max: 10.0, j_max: 40.0 },
        AxisLimits { v_max: 20.0, a_max: 15.0, j_max: 60.0 },
    ];

    let trajectory = synchronize(&states, &limits).expect("states are reachable");

    log::info!("synchronized duration: {:.4}s", trajectory.tf());

    for axis in 0..states.len() {
        let at_end = &trajectory.sample(trajectory.tf())[axis];
        log::info!("axis {axis}: p={:.4} v={:.4} a={:.4}", at_end.p, at_end.v, at_end.a);
    }
}
