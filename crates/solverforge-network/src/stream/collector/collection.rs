//! List and set collectors.

use solverforge_core::Fact;

use super::{mapped, Accumulator, Collector, ValueBag};
use crate::stream::into_mapping;
use crate::tuple::TupleRef;
use crate::value::{IntoValue, Value};

/// Creates a collector gathering every mapped value, duplicates included.
///
/// The result is a `List` sorted by value order, so it does not depend on the
/// order in which members arrived.
pub fn to_list<F, T, M>(mapping: M) -> Collector<F>
where
    F: Fact,
    T: IntoValue,
    M: Fn(&TupleRef<'_, F>) -> T + Send + Sync + 'static,
{
    mapped(into_mapping(mapping), ToListAccumulator::default)
}

/// Creates a collector gathering distinct mapped values.
///
/// A value reached through several member tuples stays in the set until the
/// last of them is retracted.
///
/// # Example
///
/// ```
/// use solverforge_network::stream::collector::{to_set, Accumulator, UniCollector};
/// use solverforge_network::{TupleRef, Value};
/// # use solverforge_core::Fact;
/// # struct Visit { id: u32, city: &'static str }
/// # impl Fact for Visit {
/// #     type Id = u32;
/// #     fn fact_id(&self) -> u32 { self.id }
/// #     fn class_name(&self) -> &'static str { "Visit" }
/// # }
///
/// let cities = to_set(|t: &TupleRef<Visit>| t.fact(0).city);
/// let mut acc = cities.create_accumulator();
/// let paris = Value::Text("Paris".into());
///
/// acc.accumulate(&paris);
/// acc.accumulate(&paris);
/// acc.retract(&paris);
/// assert_eq!(acc.finish(), Value::List(vec![paris.clone()].into()));
///
/// acc.retract(&paris);
/// assert_eq!(acc.finish(), Value::List(Vec::new().into()));
/// ```
pub fn to_set<F, T, M>(mapping: M) -> Collector<F>
where
    F: Fact,
    T: IntoValue,
    M: Fn(&TupleRef<'_, F>) -> T + Send + Sync + 'static,
{
    mapped(into_mapping(mapping), ToSetAccumulator::default)
}

/// Accumulator for [`to_list`].
#[derive(Debug, Default)]
pub struct ToListAccumulator {
    values: ValueBag,
}

impl Accumulator for ToListAccumulator {
    fn accumulate(&mut self, value: &Value) {
        self.values.insert(value);
    }

    fn retract(&mut self, value: &Value) {
        self.values.remove(value);
    }

    fn finish(&self) -> Value {
        Value::List(self.values.expanded().into())
    }
}

/// Accumulator for [`to_set`].
#[derive(Debug, Default)]
pub struct ToSetAccumulator {
    values: ValueBag,
}

impl Accumulator for ToSetAccumulator {
    fn accumulate(&mut self, value: &Value) {
        self.values.insert(value);
    }

    fn retract(&mut self, value: &Value) {
        self.values.remove(value);
    }

    fn finish(&self) -> Value {
        Value::List(self.values.keys().into())
    }
}
