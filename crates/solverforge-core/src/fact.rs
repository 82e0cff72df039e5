//! The `Fact` trait implemented by every domain object a session tracks.

use std::fmt::Debug;
use std::hash::Hash;

/// A domain object tracked by a propagation network.
///
/// Facts are identified by [`Fact::fact_id`], never by value: two facts with
/// equal fields but different ids are distinct, and an update is announced by
/// handing the session a new value carrying an id that is already live.
///
/// Every fact declares the class it belongs to. Source nodes subscribe to a
/// class name; a network may additionally declare superclass edges so that a
/// source for `"Employee"` also receives `"Manager"` facts.
///
/// # Example
///
/// ```
/// use solverforge_core::Fact;
///
/// struct Shift {
///     id: usize,
///     employee: Option<usize>,
/// }
///
/// impl Fact for Shift {
///     type Id = usize;
///
///     fn fact_id(&self) -> usize {
///         self.id
///     }
///
///     fn class_name(&self) -> &'static str {
///         "Shift"
///     }
///
///     fn is_initialized(&self) -> bool {
///         self.employee.is_some()
///     }
/// }
///
/// let shift = Shift { id: 3, employee: None };
/// assert_eq!(shift.fact_id(), 3);
/// assert!(!shift.is_initialized());
/// ```
pub trait Fact: Send + Sync + 'static {
    /// Identity of the fact, unique among live facts of a session.
    type Id: Eq + Hash + Clone + Debug + Send + Sync + 'static;

    /// Returns the identity of this fact.
    fn fact_id(&self) -> Self::Id;

    /// Returns the declared class of this fact.
    fn class_name(&self) -> &'static str;

    /// Returns true if the fact carries all of its required derived state.
    ///
    /// Sources skip uninitialized facts unless declared with
    /// `for_each_including_uninitialized`.
    fn is_initialized(&self) -> bool {
        true
    }
}
