//! Min and max collectors.
//!
//! Both keep every accumulated value in an ordered multiset, so retracting
//! the current extreme exposes the next one without rescanning the group.

use solverforge_core::Fact;

use super::{mapped, Accumulator, Collector, ValueBag};
use crate::stream::into_mapping;
use crate::tuple::TupleRef;
use crate::value::{IntoValue, Value};

/// Creates a collector for the smallest mapped value; `Null` when empty.
///
/// # Example
///
/// ```
/// use solverforge_network::stream::collector::{min, Accumulator, UniCollector};
/// use solverforge_network::{TupleRef, Value};
/// # use solverforge_core::Fact;
/// # struct Job { id: u32, start: i64 }
/// # impl Fact for Job {
/// #     type Id = u32;
/// #     fn fact_id(&self) -> u32 { self.id }
/// #     fn class_name(&self) -> &'static str { "Job" }
/// # }
///
/// let earliest = min(|t: &TupleRef<Job>| t.fact(0).start);
/// let mut acc = earliest.create_accumulator();
///
/// acc.accumulate(&Value::Int(4));
/// acc.accumulate(&Value::Int(2));
/// acc.accumulate(&Value::Int(9));
/// assert_eq!(acc.finish(), Value::Int(2));
///
/// acc.retract(&Value::Int(2));
/// assert_eq!(acc.finish(), Value::Int(4));
/// ```
pub fn min<F, T, M>(mapping: M) -> Collector<F>
where
    F: Fact,
    T: IntoValue,
    M: Fn(&TupleRef<'_, F>) -> T + Send + Sync + 'static,
{
    mapped(into_mapping(mapping), MinAccumulator::default)
}

/// Creates a collector for the largest mapped value; `Null` when empty.
pub fn max<F, T, M>(mapping: M) -> Collector<F>
where
    F: Fact,
    T: IntoValue,
    M: Fn(&TupleRef<'_, F>) -> T + Send + Sync + 'static,
{
    mapped(into_mapping(mapping), MaxAccumulator::default)
}

/// Accumulator tracking the minimum.
#[derive(Debug, Default)]
pub struct MinAccumulator {
    values: ValueBag,
}

impl Accumulator for MinAccumulator {
    fn accumulate(&mut self, value: &Value) {
        self.values.insert(value);
    }

    fn retract(&mut self, value: &Value) {
        self.values.remove(value);
    }

    fn finish(&self) -> Value {
        self.values.first().cloned().unwrap_or(Value::Null)
    }
}

/// Accumulator tracking the maximum.
#[derive(Debug, Default)]
pub struct MaxAccumulator {
    values: ValueBag,
}

impl Accumulator for MaxAccumulator {
    fn accumulate(&mut self, value: &Value) {
        self.values.insert(value);
    }

    fn retract(&mut self, value: &Value) {
        self.values.remove(value);
    }

    fn finish(&self) -> Value {
        self.values.last().cloned().unwrap_or(Value::Null)
    }
}
