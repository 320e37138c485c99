extern crate float_eq;
extern crate mfgym;
mod common;

use common::*;
use float_eq::*;
use mfgym::envs::grid_world::{EAST, NORTH, SOUTH, WEST};
use mfgym::envs::{GridWorld, GRID_WORLD_ID};
use mfgym::*;

#[test]
fn grid_world_spaces() {
    let env = make(GRID_WORLD_ID, Some(2718)).unwrap();
    assert_eq!(env.observation_space().n, 324);
    assert_eq!(env.action_space().n, 4);
    assert_eq!(env.n_f(), 3);
    assert_eq!(env.model().len(), 3 * 324 * 4);
}

#[test]
fn corner_bump_keeps_state_and_costs_ten() {
    let gw = GridWorld::new().unwrap();
    let mut env = DiscreteEnv::from_problem(&gw, Some(7)).unwrap();
    let corner = gw.encode(0, 0).unwrap();

    for (action, fidelity) in [(NORTH, 0), (WEST, 1), (NORTH, 2)] {
        force_state(&mut env, corner);
        let si = env.step(action, fidelity).unwrap();
        assert_eq!(si.observation, Some(corner));
        assert_float_eq!(si.reward, -10., abs <= 1e-12);
        assert!(!si.terminated);
        assert_eq!(env.session().current_state, Some(corner));
        assert_eq!(env.phase(), Phase::Ready);
    }
}

#[test]
fn walking_onto_goal_then_acting_ends_episode() {
    let gw = GridWorld::new().unwrap();
    let mut env = DiscreteEnv::from_problem(&gw, Some(1)).unwrap();
    force_state(&mut env, gw.encode(15, 1).unwrap());

    let trace = replay_from_current(&mut env, &[(SOUTH, 0), (SOUTH, 0), (WEST, 0), (EAST, 0)]);
    assert_eq!(
        trace,
        vec![
            (Some(gw.encode(16, 1).unwrap()), -1.),
            (Some(gw.encode(17, 1).unwrap()), -1.),
            (Some(gw.encode(17, 0).unwrap()), -1.),
            (None, 120.),
        ]
    );
    assert_eq!(env.phase(), Phase::Terminal);
    assert_eq!(env.step(NORTH, 0), Err(Error::EpisodeTerminated));
}

#[test]
fn slippery_rewards_are_redrawn_each_time() {
    let gw = GridWorld::new().unwrap();
    let mut env = DiscreteEnv::from_problem(&gw, Some(99)).unwrap();
    // (6, 15) is slippery at every fidelity; step east onto (6, 16) and back.
    let s = gw.encode(6, 15).unwrap();

    let mut rewards = vec![];
    for _ in 0..20 {
        force_state(&mut env, s);
        let si = env.step(EAST, 0).unwrap();
        assert_eq!(si.observation, Some(gw.encode(6, 16).unwrap()));
        assert!((-12. ..10.).contains(&si.reward));
        rewards.push(si.reward);
    }
    rewards.dedup();
    assert!(rewards.len() > 1);
}

#[test]
fn uniform_start_distribution() {
    let env = make(GRID_WORLD_ID, Some(0)).unwrap();
    let isd = env.initial_state_distribution();
    assert_eq!(isd.support().count(), 324);
    for s in 0..324 {
        assert_float_eq!(isd.probability(s), 1. / 324., abs <= 1e-12);
    }
}

fn replay_from_current(env: &mut DiscreteEnv, actions: &[(Discrete, Fidelity)]) -> Vec<(Option<Discrete>, f64)> {
    actions
        .iter()
        .map(|&(a, f)| {
            let si = env.step(a, f).unwrap();
            (si.observation, si.reward)
        })
        .collect()
}
