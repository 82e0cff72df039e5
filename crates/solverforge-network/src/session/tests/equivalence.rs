use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use solverforge_config::SessionConfig;
use solverforge_core::{Fact, HardSoftScore};
use solverforge_test::init_test_logging;
use solverforge_test::roster::{Employee, Roster, Shift, Unavailability};

use super::{full_assert, roster_blueprint};
use crate::{batch, verify_incremental, NetworkBlueprint};

const SHIFTS: usize = 14;
const EMPLOYEES: usize = 5;
const UNAVAILABILITIES: usize = 6;

fn random_shift(rng: &mut ChaCha8Rng, id: usize) -> Roster {
    // one in six shifts is left unassigned
    let employee = rng.random_range(0..EMPLOYEES + 1);
    let employee = (employee < EMPLOYEES).then_some(employee);
    let start = rng.random_range(0..72);
    let length = rng.random_range(4..10);
    Roster::shift(Shift::new(id, employee).at(start, start + length))
}

fn random_employee(rng: &mut ChaCha8Rng, id: usize) -> Roster {
    let employee = Employee::new(id, "E").with_max_hours(rng.random_range(6..30));
    if rng.random_bool(0.3) {
        Roster::manager(employee)
    } else {
        Roster::employee(employee)
    }
}

fn random_unavailability(rng: &mut ChaCha8Rng, id: usize) -> Roster {
    Roster::unavailability(Unavailability::new(
        id,
        rng.random_range(0..EMPLOYEES),
        rng.random_range(0..3),
    ))
}

fn random_fact(rng: &mut ChaCha8Rng) -> Roster {
    match rng.random_range(0..4) {
        0 | 1 => {
            let id = rng.random_range(0..SHIFTS);
            random_shift(rng, id)
        }
        2 => {
            let id = rng.random_range(0..EMPLOYEES);
            random_employee(rng, id)
        }
        _ => {
            let id = rng.random_range(0..UNAVAILABILITIES);
            random_unavailability(rng, id)
        }
    }
}

// Applies `steps` random mutations, checking the live score against a batch
// evaluation after each one, and returns the score trace.
fn run_random(
    blueprint: NetworkBlueprint<Roster, HardSoftScore>,
    config: &SessionConfig,
    seed: u64,
    steps: usize,
) -> Vec<HardSoftScore> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut session = blueprint.create_session(config).unwrap();
    let mut trace = Vec::with_capacity(steps);

    for step in 0..steps {
        let fact = random_fact(&mut rng);
        let id = fact.fact_id();
        if session.get(&id).is_none() {
            session.insert(fact).unwrap();
        } else if rng.random_bool(0.6) {
            session.update(fact).unwrap();
        } else {
            session.retract(&id).unwrap();
        }

        let expected = batch::evaluate(&blueprint, session.facts());
        assert_eq!(
            session.score(),
            expected,
            "seed {} diverged at step {}",
            seed,
            step
        );
        trace.push(session.score());
    }

    let live: Vec<_> = session.facts().iter().map(|(_, f)| f.fact_id()).collect();
    for id in live {
        session.retract(&id).unwrap();
    }
    assert_eq!(session.score(), HardSoftScore::ZERO);
    assert_eq!(session.tuple_count(), 0);
    trace
}

#[test]
fn test_random_mutations_match_batch_evaluation() {
    init_test_logging();
    for seed in 0..4 {
        run_random(roster_blueprint(), &full_assert(), seed, 300);
    }
}

#[test]
fn test_parallel_sessions_are_isolated() {
    init_test_logging();
    let blueprint = roster_blueprint();
    let config = SessionConfig::default();

    let parallel: Vec<Vec<HardSoftScore>> = (0..8u64)
        .into_par_iter()
        .map(|seed| run_random(blueprint.clone(), &config, seed, 200))
        .collect();
    let sequential: Vec<Vec<HardSoftScore>> = (0..8u64)
        .map(|seed| run_random(blueprint.clone(), &config, seed, 200))
        .collect();

    assert_eq!(parallel, sequential);
}

#[test]
fn test_verify_incremental_on_generated_roster() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut facts = Vec::new();
    for id in 0..SHIFTS {
        facts.push(random_shift(&mut rng, id));
    }
    for id in 0..EMPLOYEES {
        facts.push(random_employee(&mut rng, id));
    }
    for id in 0..UNAVAILABILITIES {
        facts.push(random_unavailability(&mut rng, id));
    }

    let blueprint = roster_blueprint();
    let score = verify_incremental(&blueprint, &facts).unwrap();
    let store = facts.iter().cloned().collect();
    assert_eq!(score, batch::evaluate(&blueprint, &store));
}
