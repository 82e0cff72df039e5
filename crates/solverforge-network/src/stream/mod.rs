//! Declarative constraint streams.
//!
//! A [`ConstraintDefinition`] is plain data: an ordered list of
//! [`StreamOp`]s closed by a terminal. A
//! [`NetworkBlueprint`](crate::NetworkBlueprint) validates definitions once;
//! every session then materialises its own node graph from them.
//!
//! # Example
//!
//! ```
//! use solverforge_core::{Fact, HardSoftScore};
//! use solverforge_network::stream::joiner::equal;
//! use solverforge_network::{ConstraintDefinition, TupleRef};
//!
//! struct Shift { id: u32, employee: Option<u32> }
//!
//! impl Fact for Shift {
//!     type Id = u32;
//!     fn fact_id(&self) -> u32 { self.id }
//!     fn class_name(&self) -> &'static str { "Shift" }
//! }
//!
//! let overlap = ConstraintDefinition::<Shift, HardSoftScore>::new("roster", "Double booking")
//!     .for_each("Shift")
//!     .join("Shift", vec![equal(|t: &TupleRef<Shift>| t.fact(0).employee)])
//!     .filter(|t: &TupleRef<Shift>| t.fact(0).id < t.fact(1).id)
//!     .penalize(HardSoftScore::ONE_HARD);
//!
//! assert_eq!(overlap.ops().len(), 3);
//! assert!(overlap.terminal().is_some());
//! ```

pub mod collector;
pub mod definition;
pub mod joiner;

pub use definition::{group_key, ConstraintDefinition, ExistenceMode, StreamOp, TerminalDefinition};

use std::sync::Arc;

use solverforge_core::Fact;

use crate::tuple::TupleRef;
use crate::value::{IntoValue, Value};

/// Predicate over a tuple.
pub type Predicate<F> = Arc<dyn Fn(&TupleRef<'_, F>) -> bool + Send + Sync>;

/// Mapping from a tuple to a derived value.
pub type Mapping<F> = Arc<dyn Fn(&TupleRef<'_, F>) -> Value + Send + Sync>;

/// Match weigher: multiplier applied to a constraint's weight per match.
pub type Weigher<F> = Arc<dyn Fn(&TupleRef<'_, F>) -> i64 + Send + Sync>;

pub(crate) fn into_mapping<F, T, M>(mapping: M) -> Mapping<F>
where
    F: Fact,
    T: IntoValue,
    M: Fn(&TupleRef<'_, F>) -> T + Send + Sync + 'static,
{
    Arc::new(move |t: &TupleRef<'_, F>| mapping(t).into_value())
}
