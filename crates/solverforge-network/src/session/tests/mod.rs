// Tests for sessions, run against the rostering fixtures.

use solverforge_config::{EnvironmentMode, SessionConfig};
use solverforge_core::{ConstraintRef, Fact, HardSoftScore};
use solverforge_test::init_test_logging;
use solverforge_test::roster::{Roster, RosterId, EMPLOYEE, MANAGER, SHIFT, UNAVAILABILITY};

use crate::stream::collector::{
    average, count, count_distinct, load_balance, max, min, sum, to_list, to_set,
};
use crate::stream::joiner::{equal, equal_bi, greater_than, less_than, less_than_or_equal};
use crate::{group_key, ConstraintDefinition, NetworkBlueprint, Session, TupleRef, Value};

mod analysis;
mod equivalence;
mod scenario;

type Definition = ConstraintDefinition<Roster, HardSoftScore>;
type RosterSession = Session<Roster, HardSoftScore>;

const PACKAGE: &str = "roster";

fn employee_of(t: &TupleRef<Roster>) -> Option<usize> {
    t.fact(0).as_shift().employee
}

fn shift_id(t: &TupleRef<Roster>) -> usize {
    t.fact(0).as_shift().id
}

fn hours(t: &TupleRef<Roster>) -> i64 {
    t.fact(0).as_shift().hours
}

fn start(t: &TupleRef<Roster>) -> i64 {
    t.fact(0).as_shift().start
}

fn end(t: &TupleRef<Roster>) -> i64 {
    t.fact(0).as_shift().end
}

fn day(t: &TupleRef<Roster>) -> i64 {
    t.fact(0).as_shift().start / 24
}

// Latest start that still leaves too little rest after this shift.
fn rest_deadline(t: &TupleRef<Roster>) -> i64 {
    end(t) + 12
}

fn unavailable_employee(t: &TupleRef<Roster>) -> Option<usize> {
    Some(t.fact(0).as_unavailability().employee)
}

fn unavailable_day(t: &TupleRef<Roster>) -> i64 {
    t.fact(0).as_unavailability().day
}

fn employee_id(t: &TupleRef<Roster>) -> Option<usize> {
    Some(t.fact(0).as_employee().id)
}

fn int_at(t: &TupleRef<Roster>, index: usize) -> i64 {
    t.value(index).as_int().unwrap_or(0)
}

fn unassigned() -> Definition {
    Definition::new(PACKAGE, "Unassigned shift")
        .for_each_including_uninitialized(SHIFT)
        .filter(|t| t.fact(0).as_shift().employee.is_none())
        .penalize(HardSoftScore::ONE_SOFT)
}

fn overlapping() -> Definition {
    Definition::new(PACKAGE, "Overlapping shifts")
        .for_each(SHIFT)
        .join(SHIFT, vec![equal(employee_of), less_than(shift_id, shift_id)])
        .filter(|t| t.fact(0).as_shift().overlaps(t.fact(1).as_shift()))
        .penalize(HardSoftScore::ONE_HARD)
}

fn unavailable() -> Definition {
    Definition::new(PACKAGE, "Unavailable employee")
        .for_each(SHIFT)
        .join(
            UNAVAILABILITY,
            vec![
                equal_bi(employee_of, unavailable_employee),
                equal_bi(day, unavailable_day),
            ],
        )
        .penalize_with(HardSoftScore::ONE_HARD, hours)
}

fn unknown_employee() -> Definition {
    Definition::new(PACKAGE, "Unknown employee")
        .for_each(SHIFT)
        .if_not_exists(EMPLOYEE, vec![equal_bi(employee_of, employee_id)])
        .penalize(HardSoftScore::ONE_HARD)
}

fn managed() -> Definition {
    Definition::new(PACKAGE, "Managed shift")
        .for_each(SHIFT)
        .if_exists(MANAGER, vec![equal_bi(employee_of, employee_id)])
        .reward(HardSoftScore::ONE_SOFT)
}

fn overtime() -> Definition {
    Definition::new(PACKAGE, "Overtime")
        .for_each(SHIFT)
        .group_by(vec![group_key(employee_of)], vec![sum(hours)])
        .join(
            EMPLOYEE,
            vec![equal_bi(
                |t: &TupleRef<Roster>| t.value(0).clone(),
                employee_id,
            )],
        )
        .filter(|t| int_at(t, 1) > t.fact(2).as_employee().max_hours)
        .penalize_with(HardSoftScore::ONE_SOFT, |t| {
            int_at(t, 1) - t.fact(2).as_employee().max_hours
        })
}

fn spread() -> Definition {
    Definition::new(PACKAGE, "Shift spread")
        .for_each(SHIFT)
        .group_by(
            vec![group_key(employee_of)],
            vec![min(start), max(end), count()],
        )
        .filter(|t| int_at(t, 3) > 1)
        .penalize_with(HardSoftScore::ONE_SOFT, |t| int_at(t, 2) - int_at(t, 1))
}

fn fairness() -> Definition {
    Definition::new(PACKAGE, "Fairness")
        .for_each(SHIFT)
        .group_by(vec![], vec![load_balance(employee_of, hours)])
        .penalize_with(HardSoftScore::ONE_SOFT, |t| int_at(t, 0))
}

fn short_rest() -> Definition {
    Definition::new(PACKAGE, "Short rest")
        .for_each(SHIFT)
        .if_exists(
            SHIFT,
            vec![
                equal(employee_of),
                less_than_or_equal(end, start),
                greater_than(rest_deadline, start),
            ],
        )
        .penalize(HardSoftScore::ONE_SOFT)
}

fn idle_after_unavailability() -> Definition {
    Definition::new(PACKAGE, "Idle after unavailability")
        .for_each(UNAVAILABILITY)
        .if_not_exists(
            SHIFT,
            vec![
                equal_bi(unavailable_employee, employee_of),
                less_than(unavailable_day, day),
            ],
        )
        .reward(HardSoftScore::ONE_SOFT)
}

fn workload_detail() -> Definition {
    Definition::new(PACKAGE, "Workload detail")
        .for_each(SHIFT)
        .group_by(
            vec![group_key(employee_of)],
            vec![to_list(hours), to_set(day), count_distinct(day)],
        )
        .penalize_with(HardSoftScore::ONE_SOFT, |t| {
            let longest = t
                .value(1)
                .as_list()
                .and_then(|hours| hours.iter().filter_map(Value::as_int).max())
                .unwrap_or(0);
            let days = t.value(2).as_list().map_or(0, <[Value]>::len) as i64;
            longest * days - int_at(t, 3)
        })
}

fn daily_average() -> Definition {
    Definition::new(PACKAGE, "Daily average")
        .for_each_including_uninitialized(SHIFT)
        .group_by(vec![group_key(day)], vec![average(hours)])
        .filter(|t| t.value(1).as_float().is_some_and(|avg| avg > 6.0))
        .penalize_with(HardSoftScore::ONE_SOFT, |t| {
            t.value(1)
                .as_float()
                .map_or(0, |avg| (avg * 10.0).round() as i64)
        })
}

// Every node kind and collector family in one blueprint.
fn roster_blueprint() -> NetworkBlueprint<Roster, HardSoftScore> {
    NetworkBlueprint::new(vec![
        unassigned(),
        overlapping(),
        unavailable(),
        unknown_employee(),
        managed(),
        overtime(),
        spread(),
        fairness(),
        short_rest(),
        idle_after_unavailability(),
        workload_detail(),
        daily_average(),
    ])
    .unwrap()
    .with_superclass(MANAGER, EMPLOYEE)
}

fn full_assert() -> SessionConfig {
    SessionConfig::default().with_environment_mode(EnvironmentMode::FullAssert)
}

fn session_of(definitions: Vec<Definition>) -> RosterSession {
    init_test_logging();
    NetworkBlueprint::new(definitions)
        .unwrap()
        .with_superclass(MANAGER, EMPLOYEE)
        .create_session(&full_assert())
        .unwrap()
}

fn constraint(name: &str) -> ConstraintRef {
    ConstraintRef::new(PACKAGE, name)
}

// Live matches of a constraint as fact ids, independent of handle values.
fn matched_ids(session: &RosterSession, name: &str) -> Vec<Vec<RosterId>> {
    let mut ids: Vec<Vec<RosterId>> = session
        .constraint_matches(&constraint(name))
        .unwrap()
        .iter()
        .map(|m| {
            m.facts()
                .into_iter()
                .map(|handle| session.facts().get(handle).fact_id())
                .collect()
        })
        .collect();
    ids.sort();
    ids
}
