//! Constraint definitions built by chained calls.

use std::fmt;
use std::sync::Arc;

use solverforge_core::{ConstraintRef, Fact, ImpactType, Score};

use super::collector::Collector;
use super::joiner::Joiner;
use super::{into_mapping, Mapping, Predicate, Weigher};
use crate::tuple::TupleRef;
use crate::value::IntoValue;

/// Whether an existence check passes tuples with or without a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExistenceMode {
    /// Pass left tuples with at least one matching right tuple.
    Exists,
    /// Pass left tuples with no matching right tuple.
    NotExists,
}

impl ExistenceMode {
    /// Returns true if a left tuple with `matches` matching right tuples passes.
    #[inline]
    pub fn passes(self, matches: usize) -> bool {
        match self {
            ExistenceMode::Exists => matches > 0,
            ExistenceMode::NotExists => matches == 0,
        }
    }
}

/// One building block of a constraint stream.
pub enum StreamOp<F: Fact> {
    /// Every live fact of `class` (and its subclasses).
    ForEach {
        class: &'static str,
        include_uninitialized: bool,
    },

    /// Keep tuples for which the predicate holds.
    Filter { predicate: Predicate<F> },

    /// Extend each tuple with every initialized fact of `class` matching all joiners.
    Join {
        class: &'static str,
        joiners: Vec<Joiner<F>>,
    },

    /// Keep tuples depending on whether a fact of `class` matches all joiners.
    IfExists {
        class: &'static str,
        joiners: Vec<Joiner<F>>,
        mode: ExistenceMode,
    },

    /// Replace tuples by one tuple per group: the keys followed by collector results.
    GroupBy {
        keys: Vec<Mapping<F>>,
        collectors: Vec<Collector<F>>,
    },
}

impl<F: Fact> StreamOp<F> {
    /// Short name used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StreamOp::ForEach { .. } => "for_each",
            StreamOp::Filter { .. } => "filter",
            StreamOp::Join { .. } => "join",
            StreamOp::IfExists {
                mode: ExistenceMode::Exists,
                ..
            } => "if_exists",
            StreamOp::IfExists { .. } => "if_not_exists",
            StreamOp::GroupBy { .. } => "group_by",
        }
    }
}

impl<F: Fact> fmt::Debug for StreamOp<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamOp::ForEach {
                class,
                include_uninitialized,
            } => f
                .debug_struct("ForEach")
                .field("class", class)
                .field("include_uninitialized", include_uninitialized)
                .finish(),
            StreamOp::Join { class, joiners } | StreamOp::IfExists { class, joiners, .. } => f
                .debug_struct(self.kind())
                .field("class", class)
                .field("joiners", &joiners.len())
                .finish(),
            StreamOp::GroupBy { keys, collectors } => f
                .debug_struct("GroupBy")
                .field("keys", &keys.len())
                .field("collectors", &collectors.len())
                .finish(),
            StreamOp::Filter { .. } => f.write_str("Filter"),
        }
    }
}

/// Penalty or reward closing a stream.
pub struct TerminalDefinition<F: Fact, Sc: Score> {
    pub impact_type: ImpactType,
    pub weight: Sc,
    /// Match weigher; `None` weighs every match as 1.
    pub weigher: Option<Weigher<F>>,
}

impl<F: Fact, Sc: Score> Clone for TerminalDefinition<F, Sc> {
    fn clone(&self) -> Self {
        Self {
            impact_type: self.impact_type,
            weight: self.weight,
            weigher: self.weigher.clone(),
        }
    }
}

impl<F: Fact, Sc: Score> TerminalDefinition<F, Sc> {
    /// Computes `sign * weight * weigher(tuple)`.
    pub fn impact(&self, tuple: &TupleRef<'_, F>) -> Sc {
        let multiplier = match &self.weigher {
            Some(weigher) => weigher(tuple),
            None => 1,
        };
        self.weight
            .multiply(self.impact_type.sign() * multiplier)
    }
}

/// A declared constraint: identity, stream operations and terminal.
///
/// The terminal always closes the stream, whatever the call order.
pub struct ConstraintDefinition<F: Fact, Sc: Score> {
    constraint_ref: ConstraintRef,
    ops: Vec<StreamOp<F>>,
    terminal: Option<TerminalDefinition<F, Sc>>,
}

impl<F: Fact, Sc: Score> ConstraintDefinition<F, Sc> {
    /// Starts an empty definition for `package/name`.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            constraint_ref: ConstraintRef::new(package, name),
            ops: Vec::new(),
            terminal: None,
        }
    }

    /// Returns the constraint identity.
    pub fn constraint_ref(&self) -> &ConstraintRef {
        &self.constraint_ref
    }

    /// Returns the stream operations in declaration order.
    pub fn ops(&self) -> &[StreamOp<F>] {
        &self.ops
    }

    /// Returns the terminal, if declared.
    pub fn terminal(&self) -> Option<&TerminalDefinition<F, Sc>> {
        self.terminal.as_ref()
    }

    fn push(mut self, op: StreamOp<F>) -> Self {
        self.ops.push(op);
        self
    }

    /// Streams every initialized fact of `class`.
    pub fn for_each(self, class: &'static str) -> Self {
        self.push(StreamOp::ForEach {
            class,
            include_uninitialized: false,
        })
    }

    /// Streams every fact of `class`, initialized or not.
    pub fn for_each_including_uninitialized(self, class: &'static str) -> Self {
        self.push(StreamOp::ForEach {
            class,
            include_uninitialized: true,
        })
    }

    /// Keeps tuples matching `predicate`.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&TupleRef<'_, F>) -> bool + Send + Sync + 'static,
    {
        self.push(StreamOp::Filter {
            predicate: Arc::new(predicate),
        })
    }

    /// Joins every initialized fact of `class` matching all `joiners`.
    ///
    /// Right-side key functions see a one-element tuple holding the fact.
    pub fn join(self, class: &'static str, joiners: Vec<Joiner<F>>) -> Self {
        self.push(StreamOp::Join { class, joiners })
    }

    /// Keeps tuples for which some initialized fact of `class` matches all `joiners`.
    pub fn if_exists(self, class: &'static str, joiners: Vec<Joiner<F>>) -> Self {
        self.push(StreamOp::IfExists {
            class,
            joiners,
            mode: ExistenceMode::Exists,
        })
    }

    /// Keeps tuples for which no initialized fact of `class` matches all `joiners`.
    pub fn if_not_exists(self, class: &'static str, joiners: Vec<Joiner<F>>) -> Self {
        self.push(StreamOp::IfExists {
            class,
            joiners,
            mode: ExistenceMode::NotExists,
        })
    }

    /// Groups tuples by `keys` and aggregates each group with `collectors`.
    ///
    /// Downstream tuples hold the key values followed by the collector
    /// results. With no keys, all tuples fall into one group, which exists
    /// only while it has members.
    pub fn group_by(self, keys: Vec<Mapping<F>>, collectors: Vec<Collector<F>>) -> Self {
        self.push(StreamOp::GroupBy { keys, collectors })
    }

    fn close(mut self, impact_type: ImpactType, weight: Sc, weigher: Option<Weigher<F>>) -> Self {
        self.terminal = Some(TerminalDefinition {
            impact_type,
            weight,
            weigher,
        });
        self
    }

    /// Penalizes each match by `weight`.
    pub fn penalize(self, weight: Sc) -> Self {
        self.close(ImpactType::Penalty, weight, None)
    }

    /// Penalizes each match by `weight * weigher(match)`.
    pub fn penalize_with<W>(self, weight: Sc, weigher: W) -> Self
    where
        W: Fn(&TupleRef<'_, F>) -> i64 + Send + Sync + 'static,
    {
        self.close(ImpactType::Penalty, weight, Some(Arc::new(weigher)))
    }

    /// Rewards each match by `weight`.
    pub fn reward(self, weight: Sc) -> Self {
        self.close(ImpactType::Reward, weight, None)
    }

    /// Rewards each match by `weight * weigher(match)`.
    pub fn reward_with<W>(self, weight: Sc, weigher: W) -> Self
    where
        W: Fn(&TupleRef<'_, F>) -> i64 + Send + Sync + 'static,
    {
        self.close(ImpactType::Reward, weight, Some(Arc::new(weigher)))
    }
}

impl<F: Fact, Sc: Score> fmt::Debug for ConstraintDefinition<F, Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintDefinition")
            .field("constraint_ref", &self.constraint_ref)
            .field("ops", &self.ops)
            .field("terminal", &self.terminal.as_ref().map(|t| t.impact_type))
            .finish()
    }
}

/// Builds a group key from a mapping.
///
/// ```
/// use solverforge_core::{Fact, SimpleScore};
/// use solverforge_network::stream::collector::count;
/// use solverforge_network::{group_key, ConstraintDefinition, TupleRef};
///
/// struct Shift { id: u32, employee: u32 }
///
/// impl Fact for Shift {
///     type Id = u32;
///     fn fact_id(&self) -> u32 { self.id }
///     fn class_name(&self) -> &'static str { "Shift" }
/// }
///
/// let per_employee = ConstraintDefinition::<Shift, SimpleScore>::new("", "Shifts per employee")
///     .for_each("Shift")
///     .group_by(
///         vec![group_key(|t: &TupleRef<Shift>| t.fact(0).employee)],
///         vec![count()],
///     )
///     .penalize_with(SimpleScore::ONE, |t: &TupleRef<Shift>| t.value(1).as_int().unwrap_or(0));
/// # let _ = per_employee;
/// ```
pub fn group_key<F, T, M>(mapping: M) -> Mapping<F>
where
    F: Fact,
    T: IntoValue,
    M: Fn(&TupleRef<'_, F>) -> T + Send + Sync + 'static,
{
    into_mapping(mapping)
}
