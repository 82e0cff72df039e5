//! Arena storage for live facts.
//!
//! Tuples and node state never hold facts directly; they hold
//! [`FactHandle`]s into a [`FactStore`]. Slots freed by a retraction are
//! reused by later insertions, which is safe because a retraction always
//! propagates to quiescence before the slot is released.

use std::collections::HashMap;
use std::fmt;

use solverforge_core::Fact;

use crate::error::{NetworkError, Result};

/// Opaque handle to a live fact.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FactHandle(usize);

impl FactHandle {
    /// Returns the arena slot of this handle.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for FactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FactHandle({})", self.0)
    }
}

/// Live facts of a session, addressable by handle and by id.
///
/// # Example
///
/// ```
/// use solverforge_core::Fact;
/// use solverforge_network::FactStore;
///
/// struct Room(u32);
///
/// impl Fact for Room {
///     type Id = u32;
///     fn fact_id(&self) -> u32 { self.0 }
///     fn class_name(&self) -> &'static str { "Room" }
/// }
///
/// let mut store = FactStore::new();
/// let handle = store.insert(Room(7)).unwrap();
/// assert_eq!(store.get(handle).0, 7);
/// assert!(store.insert(Room(7)).is_err());
///
/// let (freed, room) = store.remove(&7).unwrap();
/// assert_eq!(freed, handle);
/// assert_eq!(room.0, 7);
/// assert!(store.is_empty());
/// ```
pub struct FactStore<F: Fact> {
    slots: Vec<Option<F>>,
    free: Vec<usize>,
    by_id: HashMap<F::Id, FactHandle>,
}

impl<F: Fact> FactStore<F> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty store with room for `capacity` facts.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            by_id: HashMap::with_capacity(capacity),
        }
    }

    /// Stores a new fact.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DuplicateFact`] if a fact with the same id is live.
    pub fn insert(&mut self, fact: F) -> Result<FactHandle> {
        let id = fact.fact_id();
        if self.by_id.contains_key(&id) {
            return Err(NetworkError::DuplicateFact {
                id: format!("{:?}", id),
            });
        }
        let handle = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(fact);
                FactHandle(slot)
            }
            None => {
                self.slots.push(Some(fact));
                FactHandle(self.slots.len() - 1)
            }
        };
        self.by_id.insert(id, handle);
        Ok(handle)
    }

    /// Replaces the live fact sharing `fact`'s id, keeping its handle.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownFact`] if no fact with that id is live.
    pub fn replace(&mut self, fact: F) -> Result<(FactHandle, F)> {
        let id = fact.fact_id();
        let handle = self.handle_of(&id).ok_or_else(|| NetworkError::UnknownFact {
            id: format!("{:?}", id),
        })?;
        let old = self.slots[handle.0].replace(fact);
        match old {
            Some(old) => Ok((handle, old)),
            None => Err(NetworkError::UnknownFact {
                id: format!("{:?}", id),
            }),
        }
    }

    /// Removes the fact with `id`, freeing its slot.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownFact`] if no fact with that id is live.
    pub fn remove(&mut self, id: &F::Id) -> Result<(FactHandle, F)> {
        let handle = self.by_id.remove(id).ok_or_else(|| NetworkError::UnknownFact {
            id: format!("{:?}", id),
        })?;
        match self.slots[handle.0].take() {
            Some(fact) => {
                self.free.push(handle.0);
                Ok((handle, fact))
            }
            None => Err(NetworkError::UnknownFact {
                id: format!("{:?}", id),
            }),
        }
    }

    /// Returns the live fact behind `handle`.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not refer to a live fact.
    #[inline]
    pub fn get(&self, handle: FactHandle) -> &F {
        match self.slots.get(handle.0) {
            Some(Some(fact)) => fact,
            _ => panic!("{:?} does not refer to a live fact", handle),
        }
    }

    /// Returns the live fact behind `handle`, if any.
    #[inline]
    pub fn try_get(&self, handle: FactHandle) -> Option<&F> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    /// Returns the handle of the live fact with `id`.
    #[inline]
    pub fn handle_of(&self, id: &F::Id) -> Option<FactHandle> {
        self.by_id.get(id).copied()
    }

    /// Returns the live fact with `id`.
    pub fn get_by_id(&self, id: &F::Id) -> Option<&F> {
        self.handle_of(id).map(|handle| self.get(handle))
    }

    /// Iterates live facts in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (FactHandle, &F)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, fact)| fact.as_ref().map(|f| (FactHandle(slot), f)))
    }

    /// Returns the number of live facts.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if no fact is live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl<F: Fact> Default for FactStore<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Fact> FromIterator<F> for FactStore<F> {
    /// Collects facts into a store; a fact whose id is already present is skipped.
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut store = FactStore::new();
        for fact in iter {
            let _ = store.insert(fact);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use solverforge_test::roster::{Roster, Shift};

    use super::*;

    #[test]
    fn test_slots_are_reused_after_removal() {
        let mut store = FactStore::new();
        let a = store.insert(Roster::shift(Shift::new(1, Some(1)))).unwrap();
        let b = store.insert(Roster::shift(Shift::new(2, Some(1)))).unwrap();
        assert_ne!(a, b);

        store.remove(&Roster::shift_id(1)).unwrap();
        let c = store.insert(Roster::shift(Shift::new(3, None))).unwrap();
        assert_eq!(c, a);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_replace_keeps_handle() {
        let mut store = FactStore::new();
        let handle = store.insert(Roster::shift(Shift::new(1, Some(1)))).unwrap();
        let (same, old) = store.replace(Roster::shift(Shift::new(1, Some(2)))).unwrap();
        assert_eq!(same, handle);
        assert_eq!(old.as_shift().employee, Some(1));
        assert_eq!(store.get(handle).as_shift().employee, Some(2));
    }

    #[test]
    fn test_unknown_ids_are_rejected() {
        let mut store: FactStore<Roster> = FactStore::new();
        assert!(matches!(
            store.remove(&Roster::shift_id(9)),
            Err(NetworkError::UnknownFact { .. })
        ));
        assert!(matches!(
            store.replace(Roster::shift(Shift::new(9, None))),
            Err(NetworkError::UnknownFact { .. })
        ));
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut store = FactStore::new();
        store.insert(Roster::shift(Shift::new(1, None))).unwrap();
        let err = store.insert(Roster::shift(Shift::new(1, Some(3)))).unwrap_err();
        assert!(matches!(err, NetworkError::DuplicateFact { .. }));
        assert_eq!(store.len(), 1);
    }
}
