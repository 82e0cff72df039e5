use solverforge_core::{HardSoftScore, SimpleScore};
use solverforge_test::init_test_logging;
use solverforge_test::roster::{Roster, Shift, Unavailability, SHIFT, UNAVAILABILITY};

use super::{constraint, employee_of, full_assert, hours, int_at, session_of, Definition, PACKAGE};
use crate::stream::collector::sum;
use crate::stream::joiner::equal_bi;
use crate::{group_key, ConstraintDefinition, NetworkBlueprint, TupleRef, Value};

#[test]
fn test_sum_group_follows_retractions() {
    let mut session = session_of(vec![Definition::new(PACKAGE, "Hours per employee")
        .for_each(SHIFT)
        .group_by(vec![group_key(employee_of)], vec![sum(hours)])
        .penalize_with(HardSoftScore::ONE_SOFT, |t| int_at(t, 1))]);
    let hours_per_employee = constraint("Hours per employee");
    let groups = |session: &super::RosterSession| -> Vec<Vec<Value>> {
        session
            .constraint_matches(&hours_per_employee)
            .unwrap()
            .into_iter()
            .map(|m| m.values)
            .collect()
    };

    session
        .insert(Roster::shift(Shift::new(1, Some(4)).at(0, 3)))
        .unwrap();
    session
        .insert(Roster::shift(Shift::new(2, Some(4)).at(10, 15)))
        .unwrap();
    assert_eq!(groups(&session), vec![vec![Value::Int(4), Value::Int(8)]]);
    assert_eq!(session.score(), HardSoftScore::of_soft(-8));

    session.retract(&Roster::shift_id(1)).unwrap();
    assert_eq!(groups(&session), vec![vec![Value::Int(4), Value::Int(5)]]);
    assert_eq!(session.score(), HardSoftScore::of_soft(-5));

    session.retract(&Roster::shift_id(2)).unwrap();
    assert!(groups(&session).is_empty());
    assert_eq!(session.score(), HardSoftScore::ZERO);
    assert_eq!(session.tuple_count(), 0);
}

#[test]
fn test_uniform_penalty_per_filtered_fact() {
    init_test_logging();
    let blueprint = NetworkBlueprint::new(vec![ConstraintDefinition::<Roster, SimpleScore>::new(
        PACKAGE,
        "Night shift",
    )
    .for_each(SHIFT)
    .filter(|t| t.fact(0).as_shift().start >= 22)
    .penalize(SimpleScore::ONE)])
    .unwrap();
    let mut session = blueprint.create_session(&full_assert()).unwrap();

    session
        .insert(Roster::shift(Shift::new(1, Some(1)).at(22, 30)))
        .unwrap();
    session
        .insert(Roster::shift(Shift::new(2, Some(2)).at(22, 30)))
        .unwrap();
    assert_eq!(session.score(), SimpleScore::of(-2));

    session.retract(&Roster::shift_id(1)).unwrap();
    assert_eq!(session.score(), SimpleScore::of(-1));
}

#[test]
fn test_join_partner_moving_away_drops_match() {
    let mut session = session_of(vec![Definition::new(PACKAGE, "Unavailable")
        .for_each(SHIFT)
        .join(
            UNAVAILABILITY,
            vec![equal_bi(employee_of, |t: &TupleRef<Roster>| {
                Some(t.fact(0).as_unavailability().employee)
            })],
        )
        .penalize(HardSoftScore::ONE_HARD)]);

    session.insert(Roster::shift(Shift::new(1, Some(3)))).unwrap();
    session
        .insert(Roster::unavailability(Unavailability::new(1, 3, 0)))
        .unwrap();
    assert_eq!(session.score(), HardSoftScore::of_hard(-1));
    // source tuples for both facts plus one combined tuple
    assert_eq!(session.tuple_count(), 3);

    session
        .update(Roster::unavailability(Unavailability::new(1, 5, 0)))
        .unwrap();
    assert_eq!(session.score(), HardSoftScore::ZERO);
    assert!(session
        .constraint_matches(&constraint("Unavailable"))
        .unwrap()
        .is_empty());
    assert_eq!(session.tuple_count(), 2);
}
