//! Count collectors.

use std::sync::Arc;

use solverforge_core::Fact;

use super::{mapped, Accumulator, Collector, UniCollector, ValueBag};
use crate::stream::into_mapping;
use crate::tuple::TupleRef;
use crate::value::{IntoValue, Value};

/// Creates a collector that counts member tuples.
///
/// # Example
///
/// ```
/// use solverforge_network::stream::collector::{count, Accumulator, UniCollector};
/// use solverforge_network::Value;
/// # use solverforge_core::Fact;
/// # struct Task(u32);
/// # impl Fact for Task {
/// #     type Id = u32;
/// #     fn fact_id(&self) -> u32 { self.0 }
/// #     fn class_name(&self) -> &'static str { "Task" }
/// # }
///
/// let collector = count::<Task>();
/// let mut acc = collector.create_accumulator();
///
/// acc.accumulate(&Value::Null);
/// acc.accumulate(&Value::Null);
/// acc.accumulate(&Value::Null);
/// assert_eq!(acc.finish(), Value::Int(3));
///
/// acc.retract(&Value::Null);
/// assert_eq!(acc.finish(), Value::Int(2));
/// ```
pub fn count<F: Fact>() -> Collector<F> {
    Arc::new(CountCollector)
}

struct CountCollector;

impl<F: Fact> UniCollector<F> for CountCollector {
    #[inline]
    fn extract(&self, _tuple: &TupleRef<'_, F>) -> Value {
        Value::Null
    }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(CountAccumulator::default())
    }
}

/// Accumulator for counting member tuples.
#[derive(Debug, Default)]
pub struct CountAccumulator {
    count: i64,
}

impl CountAccumulator {
    /// Returns the current count.
    #[inline]
    pub fn get(&self) -> i64 {
        self.count
    }
}

impl Accumulator for CountAccumulator {
    #[inline]
    fn accumulate(&mut self, _: &Value) {
        self.count += 1;
    }

    #[inline]
    fn retract(&mut self, _: &Value) {
        self.count = self.count.saturating_sub(1);
    }

    #[inline]
    fn finish(&self) -> Value {
        Value::Int(self.count)
    }
}

/// Creates a collector that counts distinct mapped values.
pub fn count_distinct<F, T, M>(mapping: M) -> Collector<F>
where
    F: Fact,
    T: IntoValue,
    M: Fn(&TupleRef<'_, F>) -> T + Send + Sync + 'static,
{
    mapped(into_mapping(mapping), CountDistinctAccumulator::default)
}

/// Accumulator counting distinct values, reference counted.
#[derive(Debug, Default)]
pub struct CountDistinctAccumulator {
    values: ValueBag,
}

impl Accumulator for CountDistinctAccumulator {
    fn accumulate(&mut self, value: &Value) {
        self.values.insert(value);
    }

    fn retract(&mut self, value: &Value) {
        self.values.remove(value);
    }

    fn finish(&self) -> Value {
        Value::Int(self.values.distinct() as i64)
    }
}
