extern crate assertor;
extern crate float_eq;
extern crate mfgym;
extern crate rstest;
mod common;

use assertor::*;
use common::*;
use float_eq::*;
use mfgym::envs::{ids, GRID_WORLD_ID, TAXI_ID};
use mfgym::transitions::PROBABILITY_TOLERANCE;
use mfgym::*;
use rstest::rstest;

#[rstest]
#[case(GRID_WORLD_ID)]
#[case(TAXI_ID)]
fn every_outcome_list_sums_to_one(#[case] id: &str) {
    let env = make(id, Some(0)).unwrap();
    let model = env.model();
    assert_eq!(model.iter().count(), env.n_f() * env.n_s() * env.n_a());

    for (key, ts) in model.iter() {
        let sum: f64 = ts.iter().map(|t| t.probability).sum();
        assert_float_eq!(sum, 1., abs <= PROBABILITY_TOLERANCE, "{key}");
        for t in ts {
            assert_eq!(t.done, t.next_state.is_none(), "{key}");
        }
    }
}

#[rstest]
#[case(GRID_WORLD_ID)]
#[case(TAXI_ID)]
fn reset_respects_start_distribution(#[case] id: &str) {
    let mut env = make(id, Some(17)).unwrap();
    for _ in 0..1000 {
        let s = env.reset();
        assert!(env.initial_state_distribution().probability(s) > 0.);
    }
}

#[rstest]
#[case(GRID_WORLD_ID)]
#[case(TAXI_ID)]
fn fidelity_out_of_range_leaves_session_alone(#[case] id: &str) {
    let mut env = make(id, Some(23)).unwrap();
    env.reset();
    let before = env.session().clone();

    assert_eq!(
        env.step(0, 3),
        Err(Error::FidelityOutOfRange { fidelity: 3, n_f: 3 })
    );
    assert_eq!(env.session(), &before);
    assert_eq!(env.phase(), Phase::Ready);
}

#[rstest]
#[case(GRID_WORLD_ID)]
#[case(TAXI_ID)]
fn reseeding_replays_resets_and_steps(#[case] id: &str) {
    let mut env = make(id, None).unwrap();
    let actions = (0..150).map(|i| ((i * 7) % env.n_a(), i % 3)).collect::<Vec<_>>();

    env.seed(Some(2718));
    let first = (0..10).map(|_| replay(&mut env, &actions)).collect::<Vec<_>>();
    env.seed(Some(2718));
    let second = (0..10).map(|_| replay(&mut env, &actions)).collect::<Vec<_>>();
    assert_eq!(first, second);
}

#[test]
fn bundled_ids() {
    assert_that!(ids().to_vec()).contains_exactly(vec![GRID_WORLD_ID, TAXI_ID]);
}

#[test]
fn step_info_serializes() {
    let mut env = make(GRID_WORLD_ID, Some(0)).unwrap();
    env.reset();
    let si = env.step(0, 0).unwrap();
    let v = serde_json::to_value(&si).unwrap();
    assert_eq!(v["terminated"], serde_json::Value::Bool(si.terminated));
    assert_float_eq!(v["info"]["prob"].as_f64().unwrap(), 1., abs <= 1e-12);
}
