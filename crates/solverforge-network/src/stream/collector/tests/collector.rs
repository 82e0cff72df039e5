// Tests for collector module.

use solverforge_test::roster::{Roster, Shift};

use super::super::{
    average, count, count_distinct, load_balance, max, min, sum, to_list, to_set, Accumulator,
    Collector,
};
use crate::fact_store::FactStore;
use crate::tuple::TupleRef;
use crate::value::Value;

fn int(v: i64) -> Value {
    Value::Int(v)
}

fn list(values: &[i64]) -> Value {
    Value::List(values.iter().copied().map(Value::Int).collect::<Vec<_>>().into())
}

fn accumulator(collector: &Collector<Roster>) -> Box<dyn Accumulator> {
    collector.create_accumulator()
}

// accumulate(x) then retract(x) must restore the previous result
fn assert_inverse(mut acc: Box<dyn Accumulator>, base: &[Value], probes: &[Value]) {
    for value in base {
        acc.accumulate(value);
    }
    for probe in probes {
        let before = acc.finish();
        acc.accumulate(probe);
        acc.retract(probe);
        assert_eq!(acc.finish(), before, "probe {:?}", probe);
    }
}

fn hours(t: &TupleRef<Roster>) -> i64 {
    t.fact(0).as_shift().hours
}

// ============================================================================
// Inverse law
// ============================================================================

#[test]
fn test_every_accumulator_obeys_inverse_law() {
    let base = [int(3), int(5), int(3), int(-2)];
    let probes = [int(3), int(-2), int(100), int(-100), int(0)];
    let collectors: Vec<Collector<Roster>> = vec![
        count(),
        count_distinct(hours),
        sum(hours),
        average(hours),
        min(hours),
        max(hours),
        to_list(hours),
        to_set(hours),
    ];
    for collector in &collectors {
        assert_inverse(accumulator(collector), &base, &probes);
        assert_inverse(accumulator(collector), &[], &probes);
    }
}

#[test]
fn test_load_balance_obeys_inverse_law() {
    let member = |key: i64, metric: i64| list(&[key, metric]);
    let collector = load_balance(|t: &TupleRef<Roster>| t.fact(0).as_shift().employee, hours);
    assert_inverse(
        accumulator(&collector),
        &[member(0, 8), member(1, 4), member(1, 4)],
        &[member(0, 8), member(1, 4), member(2, 6), member(3, 0)],
    );
}

// ============================================================================
// Individual collectors
// ============================================================================

#[test]
fn test_sum_tracks_retraction() {
    let mut acc = accumulator(&sum(hours));
    acc.accumulate(&int(3));
    acc.accumulate(&int(5));
    assert_eq!(acc.finish(), int(8));
    acc.retract(&int(3));
    assert_eq!(acc.finish(), int(5));
    acc.retract(&int(5));
    assert_eq!(acc.finish(), int(0));
}

#[test]
fn test_min_survives_removal_of_extreme() {
    let mut acc = accumulator(&min(hours));
    for v in [4, 1, 7, 1] {
        acc.accumulate(&int(v));
    }
    assert_eq!(acc.finish(), int(1));

    acc.retract(&int(1));
    assert_eq!(acc.finish(), int(1));
    acc.retract(&int(1));
    assert_eq!(acc.finish(), int(4));
    acc.retract(&int(4));
    acc.retract(&int(7));
    assert_eq!(acc.finish(), Value::Null);
}

#[test]
fn test_max_survives_removal_of_extreme() {
    let mut acc = accumulator(&max(hours));
    for v in [4, 9, 7] {
        acc.accumulate(&int(v));
    }
    assert_eq!(acc.finish(), int(9));
    acc.retract(&int(9));
    assert_eq!(acc.finish(), int(7));
}

#[test]
fn test_average() {
    let mut acc = accumulator(&average(hours));
    assert_eq!(acc.finish(), Value::Null);
    acc.accumulate(&int(2));
    acc.accumulate(&int(5));
    assert_eq!(acc.finish(), Value::Float(3.5));
}

#[test]
fn test_to_list_is_order_independent() {
    let mut a = accumulator(&to_list(hours));
    let mut b = accumulator(&to_list(hours));
    for v in [3, 1, 3] {
        a.accumulate(&int(v));
    }
    for v in [3, 3, 1] {
        b.accumulate(&int(v));
    }
    assert_eq!(a.finish(), list(&[1, 3, 3]));
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn test_to_set_reference_counting() {
    let mut acc = accumulator(&to_set(hours));
    acc.accumulate(&int(8));
    acc.accumulate(&int(8));
    acc.accumulate(&int(4));
    assert_eq!(acc.finish(), list(&[4, 8]));

    acc.retract(&int(8));
    assert_eq!(acc.finish(), list(&[4, 8]));
    acc.retract(&int(8));
    assert_eq!(acc.finish(), list(&[4]));
}

#[test]
fn test_count_distinct() {
    let mut acc = accumulator(&count_distinct(hours));
    for v in [8, 8, 4] {
        acc.accumulate(&int(v));
    }
    assert_eq!(acc.finish(), int(2));
    acc.retract(&int(4));
    assert_eq!(acc.finish(), int(1));
}

#[test]
fn test_extract_reads_member_tuple() {
    let mut store = FactStore::new();
    let handle = store
        .insert(Roster::shift(Shift::new(1, Some(2)).at(8, 14)))
        .unwrap();
    let values = [Value::Fact(handle)];
    let tuple = TupleRef::new(&values, &store);

    assert_eq!(sum(hours).extract(&tuple), int(6));
    assert_eq!(count::<Roster>().extract(&tuple), Value::Null);
    assert_eq!(
        load_balance(|t: &TupleRef<Roster>| t.fact(0).as_shift().employee, hours).extract(&tuple),
        list(&[2, 6])
    );
}

// ============================================================================
// LoadBalance collector tests
// ============================================================================

fn balance() -> Collector<Roster> {
    load_balance(|t: &TupleRef<Roster>| t.fact(0).as_shift().employee, hours)
}

fn unit(key: i64) -> Value {
    list(&[key, 1])
}

#[test]
fn test_perfectly_balanced() {
    let mut acc = accumulator(&balance());
    acc.accumulate(&unit(0));
    acc.accumulate(&unit(1));
    assert_eq!(acc.finish(), int(0));
}

#[test]
fn test_unbalanced() {
    let mut acc = accumulator(&balance());
    acc.accumulate(&unit(0));
    acc.accumulate(&unit(0));
    acc.accumulate(&unit(1));
    // loads [2, 1], mean 1.5: sqrt(0.25 + 0.25) ~ 0.707 rounds to 1
    assert_eq!(acc.finish(), int(1));
}

#[test]
fn test_balance_retract() {
    let mut acc = accumulator(&balance());
    acc.accumulate(&unit(0));
    acc.accumulate(&unit(0));
    acc.accumulate(&unit(1));
    acc.retract(&unit(0));
    assert_eq!(acc.finish(), int(0));
}

#[test]
fn test_balance_empty() {
    let acc = accumulator(&balance());
    assert_eq!(acc.finish(), int(0));
}

#[test]
fn test_balance_highly_unbalanced() {
    let mut acc = accumulator(&balance());
    for _ in 0..10 {
        acc.accumulate(&unit(0));
    }
    acc.accumulate(&unit(1));
    // loads [10, 1], mean 5.5: sqrt(2 * 20.25) ~ 6.36 rounds to 6
    assert_eq!(acc.finish(), int(6));
}

#[test]
fn test_balance_skips_zero_metric() {
    let mut acc = accumulator(&balance());
    acc.accumulate(&unit(0));
    acc.accumulate(&unit(1));
    acc.accumulate(&list(&[2, 0]));
    assert_eq!(acc.finish(), int(0));
}
