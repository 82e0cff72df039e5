//! Equal joiner for matching on key equality.

use std::sync::Arc;

use solverforge_core::Fact;

use super::{Joiner, JoinerType};
use crate::tuple::TupleRef;
use crate::value::IntoValue;

/// Creates a joiner that matches when the same key function yields equal
/// values on both sides.
///
/// Use this when both streams carry the same fact layout, e.g. a self-join
/// of shifts on their employee.
pub fn equal<F, K, Fk>(key: Fk) -> Joiner<F>
where
    F: Fact,
    K: IntoValue,
    Fk: Fn(&TupleRef<'_, F>) -> K + Send + Sync + 'static,
{
    let key = Arc::new(key);
    let right = Arc::clone(&key);
    Joiner::from_fns(
        JoinerType::Equal,
        move |t: &TupleRef<'_, F>| key(t),
        move |t: &TupleRef<'_, F>| right(t),
    )
}

/// Creates a joiner that matches when `left(a) == right(b)`.
///
/// Use this for joins between different classes:
///
/// ```
/// use solverforge_core::Fact;
/// use solverforge_network::TupleRef;
/// use solverforge_network::stream::joiner::equal_bi;
///
/// enum Roster { Shift { id: u32, employee: Option<u32> }, Employee { id: u32 } }
///
/// impl Fact for Roster {
///     type Id = (bool, u32);
///     fn fact_id(&self) -> (bool, u32) {
///         match self {
///             Roster::Shift { id, .. } => (true, *id),
///             Roster::Employee { id } => (false, *id),
///         }
///     }
///     fn class_name(&self) -> &'static str {
///         match self {
///             Roster::Shift { .. } => "Shift",
///             Roster::Employee { .. } => "Employee",
///         }
///     }
/// }
///
/// let by_employee = equal_bi(
///     |t: &TupleRef<Roster>| match t.fact(0) {
///         Roster::Shift { employee, .. } => *employee,
///         _ => None,
///     },
///     |t: &TupleRef<Roster>| match t.fact(0) {
///         Roster::Employee { id } => Some(*id),
///         _ => None,
///     },
/// );
/// # let _ = by_employee;
/// ```
pub fn equal_bi<F, KL, KR, L, R>(left: L, right: R) -> Joiner<F>
where
    F: Fact,
    KL: IntoValue,
    KR: IntoValue,
    L: Fn(&TupleRef<'_, F>) -> KL + Send + Sync + 'static,
    R: Fn(&TupleRef<'_, F>) -> KR + Send + Sync + 'static,
{
    Joiner::from_fns(JoinerType::Equal, left, right)
}
