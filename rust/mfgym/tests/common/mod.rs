use mfgym::*;

/// Play `actions` from a fresh reset, collecting `(state, reward)` pairs and
/// stopping early on termination.
#[allow(dead_code)]
pub fn replay(env: &mut DiscreteEnv, actions: &[(Discrete, Fidelity)]) -> Vec<(Option<Discrete>, f64)> {
    let mut trace = vec![(Some(env.reset()), 0.)];
    for &(a, f) in actions {
        let si = env.step(a, f).unwrap();
        trace.push((si.observation, si.reward));
        if si.terminated {
            break;
        }
    }
    trace
}

#[allow(dead_code)]
pub fn force_state(env: &mut DiscreteEnv, target: Discrete) {
    // Start states are sampled; retry until the wanted one comes up.
    for _ in 0..100_000 {
        if env.reset() == target {
            return;
        }
    }
    panic!("state {target} never sampled by reset");
}
