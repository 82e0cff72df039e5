//! LoadBalance collector for computing unfairness (root of squared deviation).
//!
//! Members are assigned to balanced keys with a load metric. Unfairness is the
//! square root of the sum of squared deviations of the per-key loads from
//! their mean; zero means perfectly balanced.

use std::collections::HashMap;
use std::sync::Arc;

use solverforge_core::Fact;

use super::{Accumulator, Collector, UniCollector};
use crate::stream::{into_mapping, Mapping};
use crate::tuple::TupleRef;
use crate::value::{IntoValue, Value};

/// Creates a load balance collector producing the unfairness as an `Int`.
///
/// Members with a zero metric are ignored.
///
/// # Example
///
/// ```
/// use solverforge_network::stream::collector::{load_balance, Accumulator, UniCollector};
/// use solverforge_network::{TupleRef, Value};
/// # use solverforge_core::Fact;
/// # struct Shift { id: u32, employee: u32 }
/// # impl Fact for Shift {
/// #     type Id = u32;
/// #     fn fact_id(&self) -> u32 { self.id }
/// #     fn class_name(&self) -> &'static str { "Shift" }
/// # }
///
/// let collector = load_balance(
///     |t: &TupleRef<Shift>| t.fact(0).employee,
///     |_t: &TupleRef<Shift>| 1, // each shift counts as 1
/// );
///
/// let member = |employee: i64| Value::List(vec![Value::Int(employee), Value::Int(1)].into());
/// let mut acc = collector.create_accumulator();
/// acc.accumulate(&member(0));
/// acc.accumulate(&member(0));
/// acc.accumulate(&member(1));
///
/// // Employee 0 has 2, employee 1 has 1: unfairness = sqrt(0.5), rounded
/// assert_eq!(acc.finish(), Value::Int(1));
/// ```
pub fn load_balance<F, K, KF, MF>(key_fn: KF, metric_fn: MF) -> Collector<F>
where
    F: Fact,
    K: IntoValue,
    KF: Fn(&TupleRef<'_, F>) -> K + Send + Sync + 'static,
    MF: Fn(&TupleRef<'_, F>) -> i64 + Send + Sync + 'static,
{
    Arc::new(LoadBalanceCollector {
        key_fn: into_mapping(key_fn),
        metric_fn: into_mapping(metric_fn),
    })
}

struct LoadBalanceCollector<F: Fact> {
    key_fn: Mapping<F>,
    metric_fn: Mapping<F>,
}

impl<F: Fact> UniCollector<F> for LoadBalanceCollector<F> {
    // Extracted as the pair `[key, metric]`.
    #[inline]
    fn extract(&self, tuple: &TupleRef<'_, F>) -> Value {
        Value::List(vec![(self.key_fn)(tuple), (self.metric_fn)(tuple)].into())
    }

    fn create_accumulator(&self) -> Box<dyn Accumulator> {
        Box::new(LoadBalanceAccumulator::default())
    }
}

/// Accumulator for load balance with incremental squared-deviation updates.
#[derive(Debug, Default)]
pub struct LoadBalanceAccumulator {
    /// Members per balanced key
    item_counts: HashMap<Value, usize>,
    /// Cumulative load per balanced key
    loads: HashMap<Value, i64>,
    /// Sum of all loads
    sum: i64,
    /// Integral part of squared deviation
    squared_deviation_integral: i64,
    /// Fractional numerator, divided by the key count on finish
    squared_deviation_fraction_numerator: i64,
}

impl LoadBalanceAccumulator {
    /// Returns the current load of `key`.
    pub fn load(&self, key: &Value) -> i64 {
        self.loads.get(key).copied().unwrap_or(0)
    }

    fn add_to_metric(&mut self, key: &Value, diff: i64) {
        let old_value = self.load(key);
        let new_value = old_value + diff;

        if old_value != new_value {
            self.loads.insert(key.clone(), new_value);
            self.update_squared_deviation(old_value, new_value);
            self.sum += diff;
        }
    }

    fn reset_metric(&mut self, key: &Value) {
        if let Some(old_value) = self.loads.remove(key) {
            if old_value != 0 {
                self.update_squared_deviation(old_value, 0);
                self.sum -= old_value;
            }
        }
    }

    fn update_squared_deviation(&mut self, old_value: i64, new_value: i64) {
        // x_new² - x_old²
        let term1 = new_value * new_value - old_value * old_value;

        let sum_others = 2 * (self.sum - old_value);
        let new_sum = self.sum - old_value + new_value;
        let sum_diff = self.sum - new_sum;

        // sum_new² - sum_old²
        let term3 = new_sum * new_sum - self.sum * self.sum;

        let term4 = 2 * (old_value * self.sum - new_value * new_sum);

        self.squared_deviation_integral += term1;
        self.squared_deviation_fraction_numerator += sum_others * sum_diff + term3 + term4;
    }

    fn compute_unfairness(&self) -> i64 {
        let n = self.item_counts.len();
        let squared = match n {
            0 => return 0,
            1 => {
                self.squared_deviation_fraction_numerator as f64
                    + self.squared_deviation_integral as f64
            }
            _ => {
                (self.squared_deviation_fraction_numerator as f64 / n as f64)
                    + self.squared_deviation_integral as f64
            }
        };
        squared.max(0.0).sqrt().round() as i64
    }
}

fn split_member(value: &Value) -> Option<(&Value, i64)> {
    match value.as_list()? {
        [key, metric] => Some((key, metric.as_int()?)),
        _ => None,
    }
}

impl Accumulator for LoadBalanceAccumulator {
    fn accumulate(&mut self, value: &Value) {
        let Some((key, metric)) = split_member(value) else {
            return;
        };
        if metric == 0 {
            return;
        }
        *self.item_counts.entry(key.clone()).or_insert(0) += 1;
        self.add_to_metric(key, metric);
    }

    fn retract(&mut self, value: &Value) {
        let Some((key, metric)) = split_member(value) else {
            return;
        };
        if metric == 0 {
            return;
        }
        if let Some(count) = self.item_counts.get_mut(key) {
            *count -= 1;
            if *count == 0 {
                self.item_counts.remove(key);
                self.reset_metric(key);
            } else {
                self.add_to_metric(key, -metric);
            }
        }
    }

    fn finish(&self) -> Value {
        Value::Int(self.compute_unfairness())
    }
}
