//! Comparison joiners for less than / greater than matching.
//!
//! The comparison always reads `left(a) <op> right(b)`, where `a` is the
//! left tuple and `b` the right tuple.

use solverforge_core::Fact;

use super::{Joiner, JoinerType};
use crate::tuple::TupleRef;
use crate::value::IntoValue;

macro_rules! comparison_joiner {
    ($(#[$meta:meta])* $name:ident => $joiner_type:ident) => {
        $(#[$meta])*
        pub fn $name<F, KL, KR, L, R>(left: L, right: R) -> Joiner<F>
        where
            F: Fact,
            KL: IntoValue,
            KR: IntoValue,
            L: Fn(&TupleRef<'_, F>) -> KL + Send + Sync + 'static,
            R: Fn(&TupleRef<'_, F>) -> KR + Send + Sync + 'static,
        {
            Joiner::from_fns(JoinerType::$joiner_type, left, right)
        }
    };
}

comparison_joiner!(
    /// Creates a joiner that matches when `left(a) < right(b)`.
    ///
    /// # Example
    ///
    /// ```
    /// use solverforge_core::Fact;
    /// use solverforge_network::TupleRef;
    /// use solverforge_network::stream::joiner::{less_than, JoinerType};
    ///
    /// struct Task { id: u32, start: i64, end: i64 }
    ///
    /// impl Fact for Task {
    ///     type Id = u32;
    ///     fn fact_id(&self) -> u32 { self.id }
    ///     fn class_name(&self) -> &'static str { "Task" }
    /// }
    ///
    /// // Task A must end before task B starts
    /// let sequential = less_than(
    ///     |t: &TupleRef<Task>| t.fact(0).end,
    ///     |t: &TupleRef<Task>| t.fact(0).start,
    /// );
    /// assert_eq!(sequential.joiner_type(), JoinerType::LessThan);
    /// ```
    less_than => LessThan
);

comparison_joiner!(
    /// Creates a joiner that matches when `left(a) <= right(b)`.
    less_than_or_equal => LessThanOrEqual
);

comparison_joiner!(
    /// Creates a joiner that matches when `left(a) > right(b)`.
    greater_than => GreaterThan
);

comparison_joiner!(
    /// Creates a joiner that matches when `left(a) >= right(b)`.
    greater_than_or_equal => GreaterThanOrEqual
);
