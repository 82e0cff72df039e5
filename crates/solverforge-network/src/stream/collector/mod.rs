//! Collectors for grouping and aggregating tuples.
//!
//! A [`UniCollector`] extracts one [`Value`] from each member tuple of a
//! group and creates the [`Accumulator`]s that fold those values. Group-by
//! nodes cache the extracted value per member, so `retract` is always called
//! with exactly the value that was accumulated, never a recomputed one.

mod collection;
mod count;
mod load_balance;
mod min_max;
mod sum;

#[cfg(test)]
mod tests;

pub use collection::{to_list, to_set, ToListAccumulator, ToSetAccumulator};
pub use count::{count, count_distinct, CountAccumulator, CountDistinctAccumulator};
pub use load_balance::{load_balance, LoadBalanceAccumulator};
pub use min_max::{max, min, MaxAccumulator, MinAccumulator};
pub use sum::{average, sum, AverageAccumulator, SumAccumulator};

use std::collections::BTreeMap;
use std::sync::Arc;

use solverforge_core::Fact;

use super::Mapping;
use crate::tuple::TupleRef;
use crate::value::Value;

/// Incremental fold over extracted values.
///
/// `retract(v)` must exactly undo a prior `accumulate(v)`: after
/// `accumulate(v); retract(v)` the result of `finish` is the same as before.
pub trait Accumulator: Send {
    /// Adds a value.
    fn accumulate(&mut self, value: &Value);

    /// Removes a value previously passed to `accumulate`.
    fn retract(&mut self, value: &Value);

    /// Returns the current result.
    fn finish(&self) -> Value;
}

/// Collector that aggregates the member tuples of a group.
pub trait UniCollector<F: Fact>: Send + Sync {
    /// Extracts the value this collector accumulates from a member tuple.
    fn extract(&self, tuple: &TupleRef<'_, F>) -> Value;

    /// Creates a fresh, empty accumulator.
    fn create_accumulator(&self) -> Box<dyn Accumulator>;
}

/// Shared handle to a collector as stored in a stream definition.
pub type Collector<F> = Arc<dyn UniCollector<F>>;

// Collector backed by a mapping closure and an accumulator factory.
struct MappedCollector<F: Fact, A> {
    mapping: Mapping<F>,
    create: fn() -> A,
}

impl<F: Fact, A: Accumulator + 'static> UniCollector<F> for MappedCollector<F, A> {
    #[inline]
    fn extract(&self, tuple: &TupleRef<'_, F>) -> Value {
        (self.mapping)(tuple)
    }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new((self.create)())
    }
}

fn mapped<F: Fact, A: Accumulator + 'static>(
    mapping: Mapping<F>,
    create: fn() -> A,
) -> Collector<F> {
    Arc::new(MappedCollector { mapping, create })
}

/// Ordered multiset of values with per-value reference counts.
#[derive(Debug, Clone, Default)]
pub(crate) struct ValueBag {
    counts: BTreeMap<Value, usize>,
    len: usize,
}

impl ValueBag {
    pub(crate) fn insert(&mut self, value: &Value) {
        *self.counts.entry(value.clone()).or_insert(0) += 1;
        self.len += 1;
    }

    pub(crate) fn remove(&mut self, value: &Value) {
        if let Some(count) = self.counts.get_mut(value) {
            *count -= 1;
            self.len -= 1;
            if *count == 0 {
                self.counts.remove(value);
            }
        }
    }

    #[inline]
    pub(crate) fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub(crate) fn first(&self) -> Option<&Value> {
        self.counts.keys().next()
    }

    pub(crate) fn last(&self) -> Option<&Value> {
        self.counts.keys().next_back()
    }

    // Values in order, each repeated by its count.
    pub(crate) fn expanded(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.len);
        for (value, count) in &self.counts {
            values.extend(std::iter::repeat(value).take(*count).cloned());
        }
        values
    }

    pub(crate) fn keys(&self) -> Vec<Value> {
        self.counts.keys().cloned().collect()
    }
}
