//! Drives a single-axis trajectory through its control-cycle `update` loop
//! and logs the sampled state every tick, mirroring a real motion
//! controller's outer loop.

use env_logger::Env;
use trajgen::{synchronize, AxisLimits, AxisState};

const CONTROL_CYCLE: f64 = 0.01;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let states = [AxisState { p: 0.0, v: 0.0, a: 0.0, target_p: 20.0, target_v: 0.0, target_a: 0.0 }];
    let limits = [AxisLimits { v_max: 10.0, a_max: 10.0, j_max: 40.0 }];

    let mut trajectory = synchronize(&states, &limits).expect("state is reachable");
    log::info!("trajectory duration: {:.4}s", trajectory.tf());

    loop {
        let (axis_states, finished) = trajectory.update(CONTROL_CYCLE);
        let state = &axis_states[0];
        log::info!("p={:.4} v={:.4} a={:.4}", state.p, state.v, state.a);

        if finished {
            break;
        }
    }
}
