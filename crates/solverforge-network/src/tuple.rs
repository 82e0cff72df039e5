//! Tuples and the arena that owns their contents.
//!
//! A tuple is an ordered sequence of one to four [`Value`]s. The node that
//! creates a tuple allocates it in the session's [`TupleArena`] and is the
//! only node that releases it; filters and existence nodes forward the
//! parent's [`TupleId`] unchanged.

use std::fmt;

use smallvec::SmallVec;
use solverforge_core::Fact;

use crate::fact_store::{FactHandle, FactStore};
use crate::value::Value;

/// Maximum number of elements in a tuple.
pub const MAX_CARDINALITY: usize = 4;

/// Inline storage for tuple elements.
pub type TupleValues = SmallVec<[Value; MAX_CARDINALITY]>;

/// Opaque handle to a live tuple.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TupleId(usize);

impl fmt::Debug for TupleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TupleId({})", self.0)
    }
}

/// Slot arena holding the contents of every live tuple in a session.
#[derive(Default)]
pub(crate) struct TupleArena {
    slots: Vec<Option<TupleValues>>,
    free: Vec<usize>,
    live: usize,
}

impl TupleArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn alloc(&mut self, values: TupleValues) -> TupleId {
        self.live += 1;
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(values);
                TupleId(slot)
            }
            None => {
                self.slots.push(Some(values));
                TupleId(self.slots.len() - 1)
            }
        }
    }

    /// # Panics
    ///
    /// Panics if the tuple has already been released.
    #[inline]
    pub(crate) fn get(&self, id: TupleId) -> &[Value] {
        match self.slots.get(id.0) {
            Some(Some(values)) => values,
            _ => panic!("{:?} is not a live tuple", id),
        }
    }

    pub(crate) fn release(&mut self, id: TupleId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            if slot.take().is_some() {
                self.live -= 1;
                self.free.push(id.0);
            }
        }
    }

    #[inline]
    pub(crate) fn live(&self) -> usize {
        self.live
    }
}

/// Read-only view of a tuple handed to user closures.
///
/// # Example
///
/// ```
/// use solverforge_core::Fact;
/// use solverforge_network::{FactStore, TupleRef, Value};
///
/// struct Task(u32, i64);
///
/// impl Fact for Task {
///     type Id = u32;
///     fn fact_id(&self) -> u32 { self.0 }
///     fn class_name(&self) -> &'static str { "Task" }
/// }
///
/// let mut store = FactStore::new();
/// let handle = store.insert(Task(1, 30)).unwrap();
/// let values = [Value::Fact(handle), Value::Int(2)];
///
/// let tuple = TupleRef::new(&values, &store);
/// assert_eq!(tuple.len(), 2);
/// assert_eq!(tuple.fact(0).1, 30);
/// assert_eq!(tuple.value(1).as_int(), Some(2));
/// ```
pub struct TupleRef<'a, F: Fact> {
    values: &'a [Value],
    facts: &'a FactStore<F>,
}

impl<'a, F: Fact> TupleRef<'a, F> {
    /// Creates a view over `values`, resolving fact handles in `facts`.
    #[inline]
    pub fn new(values: &'a [Value], facts: &'a FactStore<F>) -> Self {
        Self { values, facts }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the tuple has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the element at `index`.
    #[inline]
    pub fn value(&self, index: usize) -> &'a Value {
        &self.values[index]
    }

    /// Returns all elements.
    #[inline]
    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    /// Returns the fact at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the element at `index` is a derived value rather than a fact.
    #[inline]
    pub fn fact(&self, index: usize) -> &'a F {
        match &self.values[index] {
            Value::Fact(handle) => self.facts.get(*handle),
            other => panic!(
                "tuple position {} holds a derived value ({:?}), not a fact",
                index, other
            ),
        }
    }

    /// Resolves a fact handle found inside a derived value (e.g. a collected list).
    #[inline]
    pub fn resolve(&self, handle: FactHandle) -> &'a F {
        self.facts.get(handle)
    }
}
