//! Sessions: a fact store plus the propagation network scoring it.

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::fmt;

use solverforge_config::{EnvironmentMode, SessionConfig};
use solverforge_core::{ConstraintRef, Fact, Score};
use tracing::{debug, trace};

use crate::analysis::{
    ConstraintAnalysis, ConstraintMatch, ConstraintResult, Indictment, ScoreExplanation,
};
use crate::batch;
use crate::blueprint::NetworkBlueprint;
use crate::error::{NetworkError, Result};
use crate::fact_store::FactStore;
use crate::network::Network;
use crate::verify;

/// Live facts and the incrementally maintained score over them.
///
/// Every mutation propagates to quiescence before it returns. If a user
/// closure panics mid-propagation the session is left corrupted and every
/// later mutation returns [`NetworkError::Corrupted`]; build a new session
/// from the blueprint.
///
/// # Example
///
/// ```
/// use solverforge_config::SessionConfig;
/// use solverforge_core::{Fact, HardSoftScore};
/// use solverforge_network::stream::joiner::equal;
/// use solverforge_network::{ConstraintDefinition, NetworkBlueprint, TupleRef};
///
/// #[derive(Clone)]
/// struct Shift { id: u32, employee: Option<u32> }
///
/// impl Fact for Shift {
///     type Id = u32;
///     fn fact_id(&self) -> u32 { self.id }
///     fn class_name(&self) -> &'static str { "Shift" }
///     fn is_initialized(&self) -> bool { self.employee.is_some() }
/// }
///
/// let blueprint = NetworkBlueprint::new(vec![
///     ConstraintDefinition::<Shift, HardSoftScore>::new("roster", "Double booking")
///         .for_each("Shift")
///         .join("Shift", vec![equal(|t: &TupleRef<Shift>| t.fact(0).employee)])
///         .filter(|t| t.fact(0).id < t.fact(1).id)
///         .penalize(HardSoftScore::ONE_HARD),
/// ])
/// .unwrap();
///
/// let mut session = blueprint.create_session(&SessionConfig::default()).unwrap();
/// session.insert(Shift { id: 1, employee: Some(7) }).unwrap();
/// session.insert(Shift { id: 2, employee: Some(7) }).unwrap();
/// assert_eq!(session.score(), HardSoftScore::of_hard(-1));
///
/// session.update(Shift { id: 2, employee: Some(8) }).unwrap();
/// assert_eq!(session.score(), HardSoftScore::ZERO);
///
/// session.retract(&1).unwrap();
/// assert_eq!(session.fact_count(), 1);
/// ```
pub struct Session<F: Fact, Sc: Score> {
    blueprint: NetworkBlueprint<F, Sc>,
    environment_mode: EnvironmentMode,
    facts: FactStore<F>,
    network: Network<F, Sc>,
    // set while a propagation runs; still set afterwards only if it unwound
    in_flight: bool,
}

impl<F: Fact, Sc: Score> Session<F, Sc> {
    pub(crate) fn new(blueprint: NetworkBlueprint<F, Sc>, config: &SessionConfig) -> Result<Self> {
        let network = Network::build(&blueprint)?;
        let facts = match config.fact_capacity {
            Some(capacity) => FactStore::with_capacity(capacity),
            None => FactStore::new(),
        };
        debug!(
            event = "session_build",
            environment_mode = ?config.environment_mode,
            nodes = network.node_count(),
            sources = network.source_count(),
        );
        Ok(Self {
            blueprint,
            environment_mode: config.environment_mode,
            facts,
            network,
            in_flight: false,
        })
    }

    fn ensure_usable(&self) -> Result<()> {
        if self.in_flight {
            Err(NetworkError::Corrupted)
        } else {
            Ok(())
        }
    }

    /// Inserts a new fact and propagates it.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::DuplicateFact`] if a fact with the same id is
    /// live; the session is left unchanged.
    pub fn insert(&mut self, fact: F) -> Result<()> {
        self.ensure_usable()?;
        let class = fact.class_name();
        let initialized = fact.is_initialized();
        let handle = self.facts.insert(fact)?;

        self.in_flight = true;
        self.network.insert_fact(&self.facts, handle, class, initialized);
        self.in_flight = false;

        trace!(event = "insert", fact = ?handle, class, score = %self.network.score());
        self.check_environment()
    }

    /// Replaces the live fact sharing `fact`'s id and propagates the change.
    ///
    /// The session never diffs facts: every update re-evaluates whatever the
    /// network derives from the fact.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownFact`] if no fact with that id is live.
    pub fn update(&mut self, fact: F) -> Result<()> {
        self.ensure_usable()?;
        let (handle, old) = self.facts.replace(fact)?;
        let current = self.facts.get(handle);
        let class = current.class_name();
        let initialized = current.is_initialized();

        self.in_flight = true;
        if old.class_name() == class {
            self.network.update_fact(&self.facts, handle, class, initialized);
        } else {
            self.network.retract_fact(&self.facts, handle, old.class_name());
            self.network.insert_fact(&self.facts, handle, class, initialized);
        }
        self.in_flight = false;

        trace!(event = "update", fact = ?handle, class, score = %self.network.score());
        self.check_environment()
    }

    /// Retracts the fact with `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownFact`] if no fact with that id is live.
    pub fn retract(&mut self, id: &F::Id) -> Result<F> {
        self.ensure_usable()?;
        let handle = self
            .facts
            .handle_of(id)
            .ok_or_else(|| NetworkError::UnknownFact {
                id: format!("{:?}", id),
            })?;
        let class = self.facts.get(handle).class_name();

        self.in_flight = true;
        self.network.retract_fact(&self.facts, handle, class);
        self.in_flight = false;

        let (_, fact) = self.facts.remove(id)?;
        trace!(event = "retract", fact = ?handle, class, score = %self.network.score());
        self.check_environment()?;
        Ok(fact)
    }

    /// Returns the current score.
    #[inline]
    pub fn score(&self) -> Sc {
        self.network.score()
    }

    /// Returns true if an interrupted propagation left the session unusable.
    pub fn is_corrupted(&self) -> bool {
        self.in_flight
    }

    /// Returns the number of live facts.
    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    /// Returns the live fact with `id`.
    pub fn get(&self, id: &F::Id) -> Option<&F> {
        self.facts.get_by_id(id)
    }

    /// Returns the live facts.
    pub fn facts(&self) -> &FactStore<F> {
        &self.facts
    }

    /// Returns the blueprint this session was built from.
    pub fn blueprint(&self) -> &NetworkBlueprint<F, Sc> {
        &self.blueprint
    }

    /// Returns the environment mode the session checks itself with.
    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    /// Returns each constraint's score and match count, in declaration order.
    pub fn constraint_results(&self) -> Vec<ConstraintResult<Sc>> {
        self.blueprint
            .definitions()
            .iter()
            .enumerate()
            .map(|(c, definition)| {
                let terminal = self.network.terminal(c);
                ConstraintResult::new(
                    definition.constraint_ref().clone(),
                    terminal.weight(),
                    terminal.total(),
                    terminal.match_count(),
                )
            })
            .collect()
    }

    /// Returns the live matches of a constraint, sorted by tuple values, or
    /// `None` if no such constraint exists.
    pub fn constraint_matches(
        &self,
        constraint_ref: &ConstraintRef,
    ) -> Option<Vec<ConstraintMatch<Sc>>> {
        let c = self
            .blueprint
            .definitions()
            .iter()
            .position(|definition| definition.constraint_ref() == constraint_ref)?;
        Some(self.matches_of(c))
    }

    fn matches_of(&self, c: usize) -> Vec<ConstraintMatch<Sc>> {
        let constraint_ref = self.blueprint.definitions()[c].constraint_ref();
        let mut matches: Vec<ConstraintMatch<Sc>> = self
            .network
            .terminal(c)
            .impacts()
            .map(|(tuple, score)| ConstraintMatch {
                constraint_ref: constraint_ref.clone(),
                values: self.network.tuple_values(tuple).to_vec(),
                score,
            })
            .collect();
        matches.sort_by(|a, b| a.values.cmp(&b.values));
        matches
    }

    /// Explains the score constraint by constraint.
    pub fn explain(&self) -> ScoreExplanation<Sc> {
        let constraint_analyses = self
            .constraint_results()
            .into_iter()
            .enumerate()
            .map(|(c, result)| ConstraintAnalysis {
                result,
                matches: self.matches_of(c),
            })
            .collect();
        ScoreExplanation {
            score: self.score(),
            constraint_analyses,
        }
    }

    /// Charges every live match to each fact it references.
    pub fn indictments(&self) -> HashMap<F::Id, Indictment<F::Id, Sc>> {
        let mut indictments: HashMap<F::Id, Indictment<F::Id, Sc>> = HashMap::new();
        for c in 0..self.blueprint.constraint_count() {
            for constraint_match in self.matches_of(c) {
                for handle in constraint_match.facts() {
                    let Some(fact) = self.facts.try_get(handle) else {
                        continue;
                    };
                    let id = fact.fact_id();
                    indictments
                        .entry(id.clone())
                        .or_insert_with(|| Indictment::new(id))
                        .add_match(constraint_match.clone());
                }
            }
        }
        indictments
    }

    /// Compares the incremental per-constraint totals with a batch evaluation
    /// of the live facts and returns the agreed score.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::ScoreCorruption`] on any divergence and
    /// [`NetworkError::Corrupted`] on a corrupted session.
    pub fn verify(&self) -> Result<Sc> {
        self.ensure_usable()?;
        let expected = batch::evaluate_each(&self.blueprint, &self.facts);
        verify::compare(&self.constraint_results(), &expected, self.score())
    }

    fn check_environment(&self) -> Result<()> {
        match self.environment_mode {
            EnvironmentMode::NoAssert => Ok(()),
            EnvironmentMode::FastAssert => {
                let sum = self.network.terminal_sum();
                if sum == self.score() {
                    Ok(())
                } else {
                    Err(verify::corruption("<total>", self.score(), sum))
                }
            }
            EnvironmentMode::FullAssert => self.verify().map(|_| ()),
        }
    }

    /// Number of live tuples across all nodes.
    pub fn tuple_count(&self) -> usize {
        self.network.live_tuples()
    }
}

impl<F: Fact, Sc: Score> fmt::Debug for Session<F, Sc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("facts", &self.facts.len())
            .field("score", &self.score())
            .field("nodes", &self.network.node_sizes())
            .field("corrupted", &self.in_flight)
            .finish()
    }
}
