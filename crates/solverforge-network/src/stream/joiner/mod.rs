//! Joiner functions for join and conditional-existence streams.
//!
//! A joiner pairs a left key function (applied to the left tuple) with a
//! right key function (applied to the right tuple) and a comparison mode.
//! Equality joiners are served by hash indexes, ordering joiners by range
//! scans over ordered indexes.
//!
//! # Same key on both sides
//!
//! ```
//! use solverforge_core::Fact;
//! use solverforge_network::{FactStore, TupleRef, Value};
//! use solverforge_network::stream::joiner::{equal, JoinerType};
//!
//! struct Shift { id: u32, employee: u32 }
//!
//! impl Fact for Shift {
//!     type Id = u32;
//!     fn fact_id(&self) -> u32 { self.id }
//!     fn class_name(&self) -> &'static str { "Shift" }
//! }
//!
//! let same_employee = equal(|t: &TupleRef<Shift>| t.fact(0).employee);
//! assert_eq!(same_employee.joiner_type(), JoinerType::Equal);
//!
//! let mut store = FactStore::new();
//! let a = store.insert(Shift { id: 1, employee: 5 }).unwrap();
//! let b = store.insert(Shift { id: 2, employee: 5 }).unwrap();
//! let (left, right) = ([Value::Fact(a)], [Value::Fact(b)]);
//! assert!(same_employee.matches(
//!     &TupleRef::new(&left, &store),
//!     &TupleRef::new(&right, &store),
//! ));
//! ```

mod comparison;
mod equal;

pub use comparison::{greater_than, greater_than_or_equal, less_than, less_than_or_equal};
pub use equal::{equal, equal_bi};

use std::sync::Arc;

use solverforge_core::Fact;

use crate::tuple::TupleRef;
use crate::value::{IntoValue, Value, ValueKind};

use super::Mapping;

/// Comparison applied between the left key and the right key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinerType {
    Equal,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl JoinerType {
    /// Returns true if `left <op> right` holds.
    #[inline]
    pub fn matches(self, left: &Value, right: &Value) -> bool {
        match self {
            JoinerType::Equal => left == right,
            JoinerType::LessThan => left < right,
            JoinerType::LessThanOrEqual => left <= right,
            JoinerType::GreaterThan => left > right,
            JoinerType::GreaterThanOrEqual => left >= right,
        }
    }

    /// Returns true for the four ordering modes.
    #[inline]
    pub fn is_ordering(self) -> bool {
        !matches!(self, JoinerType::Equal)
    }
}

/// A key-extraction pair plus a comparison mode.
pub struct Joiner<F: Fact> {
    joiner_type: JoinerType,
    left: Mapping<F>,
    right: Mapping<F>,
    left_kind: ValueKind,
    right_kind: ValueKind,
}

impl<F: Fact> Joiner<F> {
    pub(crate) fn from_fns<KL, KR, L, R>(joiner_type: JoinerType, left: L, right: R) -> Self
    where
        KL: IntoValue,
        KR: IntoValue,
        L: Fn(&TupleRef<'_, F>) -> KL + Send + Sync + 'static,
        R: Fn(&TupleRef<'_, F>) -> KR + Send + Sync + 'static,
    {
        Self {
            joiner_type,
            left: Arc::new(move |t: &TupleRef<'_, F>| left(t).into_value()),
            right: Arc::new(move |t: &TupleRef<'_, F>| right(t).into_value()),
            left_kind: KL::KIND,
            right_kind: KR::KIND,
        }
    }

    /// Returns the comparison mode.
    #[inline]
    pub fn joiner_type(&self) -> JoinerType {
        self.joiner_type
    }

    /// Returns the statically declared key kinds, left then right.
    #[inline]
    pub fn key_kinds(&self) -> (ValueKind, ValueKind) {
        (self.left_kind, self.right_kind)
    }

    /// Extracts the join key from a left tuple.
    #[inline]
    pub fn left_key(&self, tuple: &TupleRef<'_, F>) -> Value {
        (self.left)(tuple)
    }

    /// Extracts the join key from a right tuple.
    #[inline]
    pub fn right_key(&self, tuple: &TupleRef<'_, F>) -> Value {
        (self.right)(tuple)
    }

    /// Returns true if the two tuples should be joined.
    pub fn matches(&self, left: &TupleRef<'_, F>, right: &TupleRef<'_, F>) -> bool {
        self.joiner_type
            .matches(&self.left_key(left), &self.right_key(right))
    }
}

impl<F: Fact> Clone for Joiner<F> {
    fn clone(&self) -> Self {
        Self {
            joiner_type: self.joiner_type,
            left: Arc::clone(&self.left),
            right: Arc::clone(&self.right),
            left_kind: self.left_kind,
            right_kind: self.right_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joiner_type_matches() {
        let (one, two) = (Value::Int(1), Value::Int(2));
        assert!(JoinerType::Equal.matches(&one, &one));
        assert!(JoinerType::LessThan.matches(&one, &two));
        assert!(!JoinerType::LessThan.matches(&one, &one));
        assert!(JoinerType::LessThanOrEqual.matches(&one, &one));
        assert!(JoinerType::GreaterThan.matches(&two, &one));
        assert!(JoinerType::GreaterThanOrEqual.matches(&two, &two));
        assert!(!JoinerType::GreaterThanOrEqual.matches(&one, &two));
    }

    #[test]
    fn test_is_ordering() {
        assert!(!JoinerType::Equal.is_ordering());
        assert!(JoinerType::LessThan.is_ordering());
        assert!(JoinerType::GreaterThanOrEqual.is_ordering());
    }
}
