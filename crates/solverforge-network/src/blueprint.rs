//! Validated, immutable set of constraint definitions.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use solverforge_config::SessionConfig;
use solverforge_core::{Fact, Score};
use tracing::debug;

use crate::error::{NetworkError, Result};
use crate::hierarchy::ClassHierarchy;
use crate::session::Session;
use crate::stream::joiner::Joiner;
use crate::stream::{ConstraintDefinition, StreamOp};
use crate::tuple::MAX_CARDINALITY;

/// Constraint definitions checked once and shared by every session built
/// from them.
///
/// A blueprint holds no per-session state; cloning it is cheap and it can be
/// sent across threads to build sessions in parallel.
///
/// # Example
///
/// ```
/// use solverforge_config::SessionConfig;
/// use solverforge_core::{Fact, SimpleScore};
/// use solverforge_network::{ConstraintDefinition, NetworkBlueprint, NetworkError};
///
/// struct Task { id: u32, done: bool }
///
/// impl Fact for Task {
///     type Id = u32;
///     fn fact_id(&self) -> u32 { self.id }
///     fn class_name(&self) -> &'static str { "Task" }
/// }
///
/// let open = || ConstraintDefinition::<Task, SimpleScore>::new("", "Open task")
///     .for_each("Task")
///     .filter(|t| !t.fact(0).done)
///     .penalize(SimpleScore::ONE);
///
/// let err = NetworkBlueprint::new(vec![open(), open()]).unwrap_err();
/// assert!(matches!(err, NetworkError::DuplicateConstraint(_)));
///
/// let blueprint = NetworkBlueprint::new(vec![open()]).unwrap();
/// let mut session = blueprint.create_session(&SessionConfig::default()).unwrap();
/// session.insert(Task { id: 1, done: false }).unwrap();
/// session.insert(Task { id: 2, done: true }).unwrap();
/// assert_eq!(session.score(), SimpleScore::of(-1));
/// ```
pub struct NetworkBlueprint<F: Fact, Sc: Score> {
    definitions: Arc<[ConstraintDefinition<F, Sc>]>,
    hierarchy: Arc<ClassHierarchy>,
}

impl<F: Fact, Sc: Score> NetworkBlueprint<F, Sc> {
    /// Validates `definitions`.
    ///
    /// # Errors
    ///
    /// Returns the first construction error found: a duplicate constraint
    /// identity, a stream without a leading `for_each` or terminal, a
    /// misplaced `for_each`, incompatible or unordered joiner keys, an empty
    /// group-by, or a tuple wider than four elements.
    pub fn new(definitions: Vec<ConstraintDefinition<F, Sc>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for definition in &definitions {
            if !seen.insert(definition.constraint_ref()) {
                return Err(NetworkError::DuplicateConstraint(
                    definition.constraint_ref().full_name(),
                ));
            }
            validate(definition)?;
        }
        debug!(
            event = "blueprint_validated",
            constraints = definitions.len(),
        );
        Ok(Self {
            definitions: definitions.into(),
            hierarchy: Arc::new(ClassHierarchy::new()),
        })
    }

    /// Declares that facts of class `subclass` also flow into streams over
    /// `superclass`.
    pub fn with_superclass(mut self, subclass: &'static str, superclass: &'static str) -> Self {
        Arc::make_mut(&mut self.hierarchy).declare(subclass, superclass);
        self
    }

    /// Returns the definitions in declaration order.
    pub fn definitions(&self) -> &[ConstraintDefinition<F, Sc>] {
        &self.definitions
    }

    pub fn hierarchy(&self) -> &ClassHierarchy {
        &self.hierarchy
    }

    pub(crate) fn shared_hierarchy(&self) -> Arc<ClassHierarchy> {
        Arc::clone(&self.hierarchy)
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.definitions.len()
    }

    /// Builds a fresh session with its own fact store and node graph.
    pub fn create_session(&self, config: &SessionConfig) -> Result<Session<F, Sc>> {
        Session::new(self.clone(), config)
    }
}

impl<F: Fact, Sc: Score> Clone for NetworkBlueprint<F, Sc> {
    fn clone(&self) -> Self {
        Self {
            definitions: Arc::clone(&self.definitions),
            hierarchy: Arc::clone(&self.hierarchy),
        }
    }
}

impl<F: Fact, Sc: Score> fmt::Debug for NetworkBlueprint<F, Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkBlueprint")
            .field("definitions", &self.definitions)
            .field("hierarchy", &self.hierarchy)
            .finish()
    }
}

fn validate<F: Fact, Sc: Score>(definition: &ConstraintDefinition<F, Sc>) -> Result<()> {
    let constraint = || definition.constraint_ref().full_name();
    let ops = definition.ops();

    if !matches!(ops.first(), Some(StreamOp::ForEach { .. })) {
        return Err(NetworkError::MissingSource {
            constraint: constraint(),
        });
    }

    let mut cardinality = 1;
    for (position, op) in ops.iter().enumerate().skip(1) {
        match op {
            StreamOp::ForEach { .. } => {
                return Err(NetworkError::MisplacedSource {
                    constraint: constraint(),
                    position,
                });
            }
            StreamOp::Filter { .. } => {}
            StreamOp::Join { joiners, .. } => {
                check_joiners(joiners, constraint)?;
                cardinality += 1;
            }
            StreamOp::IfExists { joiners, .. } => check_joiners(joiners, constraint)?,
            StreamOp::GroupBy { keys, collectors } => {
                cardinality = keys.len() + collectors.len();
                if cardinality == 0 {
                    return Err(NetworkError::EmptyGroupBy {
                        constraint: constraint(),
                    });
                }
            }
        }
        if cardinality > MAX_CARDINALITY {
            return Err(NetworkError::CardinalityExceeded {
                constraint: constraint(),
                cardinality,
            });
        }
    }

    if definition.terminal().is_none() {
        return Err(NetworkError::MissingTerminal {
            constraint: constraint(),
        });
    }
    Ok(())
}

fn check_joiners<F: Fact>(joiners: &[Joiner<F>], constraint: impl Fn() -> String) -> Result<()> {
    for (joiner, j) in joiners.iter().enumerate() {
        let (left, right) = j.key_kinds();
        if !left.is_compatible_with(right) {
            return Err(NetworkError::IncompatibleJoinerKeys {
                constraint: constraint(),
                joiner,
                left,
                right,
            });
        }
        if j.joiner_type().is_ordering() {
            if let Some(kind) = [left, right].into_iter().find(|k| !k.is_orderable()) {
                return Err(NetworkError::UnorderedJoinerKey {
                    constraint: constraint(),
                    joiner,
                    kind,
                });
            }
        }
    }
    Ok(())
}
