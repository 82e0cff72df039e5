// Sum and average collectors over integer mappings.

use solverforge_core::Fact;

use super::{mapped, Accumulator, Collector};
use crate::stream::into_mapping;
use crate::tuple::TupleRef;
use crate::value::Value;

// Creates a collector that sums integers extracted from member tuples.
//
// # Example
//
// ```
// use solverforge_network::stream::collector::sum;
// use solverforge_network::Value;
// # use solverforge_core::Fact;
// # struct Item { id: u32, value: i64 }
// # impl Fact for Item {
// #     type Id = u32;
// #     fn fact_id(&self) -> u32 { self.id }
// #     fn class_name(&self) -> &'static str { "Item" }
// # }
//
// let collector = sum(|t: &solverforge_network::TupleRef<Item>| t.fact(0).value);
// let mut acc = collector.create_accumulator();
//
// acc.accumulate(&Value::Int(5));
// acc.accumulate(&Value::Int(3));
// acc.accumulate(&Value::Int(7));
// assert_eq!(acc.finish(), Value::Int(15));
//
// acc.retract(&Value::Int(3));
// assert_eq!(acc.finish(), Value::Int(12));
// ```
pub fn sum<F, M>(mapping: M) -> Collector<F>
where
    F: Fact,
    M: Fn(&TupleRef<'_, F>) -> i64 + Send + Sync + 'static,
{
    mapped(into_mapping(mapping), SumAccumulator::default)
}

// Accumulator for summing integers.
#[derive(Debug, Default)]
pub struct SumAccumulator {
    sum: i64,
}

impl Accumulator for SumAccumulator {
    #[inline]
    fn accumulate(&mut self, value: &Value) {
        self.sum += value.as_int().unwrap_or(0);
    }

    #[inline]
    fn retract(&mut self, value: &Value) {
        self.sum -= value.as_int().unwrap_or(0);
    }

    #[inline]
    fn finish(&self) -> Value {
        Value::Int(self.sum)
    }
}

// Creates a collector that averages integers extracted from member tuples.
//
// The result is a `Float`, or `Null` for an empty group.
pub fn average<F, M>(mapping: M) -> Collector<F>
where
    F: Fact,
    M: Fn(&TupleRef<'_, F>) -> i64 + Send + Sync + 'static,
{
    mapped(into_mapping(mapping), AverageAccumulator::default)
}

// Accumulator for the arithmetic mean; keeps an exact integer sum.
#[derive(Debug, Default)]
pub struct AverageAccumulator {
    sum: i64,
    count: i64,
}

impl Accumulator for AverageAccumulator {
    fn accumulate(&mut self, value: &Value) {
        self.sum += value.as_int().unwrap_or(0);
        self.count += 1;
    }

    fn retract(&mut self, value: &Value) {
        self.sum -= value.as_int().unwrap_or(0);
        self.count -= 1;
    }

    fn finish(&self) -> Value {
        if self.count == 0 {
            Value::Null
        } else {
            Value::Float(self.sum as f64 / self.count as f64)
        }
    }
}
