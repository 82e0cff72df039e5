//! Incremental-versus-batch verification.

use solverforge_config::SessionConfig;
use solverforge_core::{Fact, Score};
use tracing::error;

use crate::analysis::ConstraintResult;
use crate::batch;
use crate::blueprint::NetworkBlueprint;
use crate::error::{NetworkError, Result};
use crate::fact_store::FactStore;

/// Scores `facts` twice, by inserting them one by one into a fresh session and
/// by batch evaluation over an independent store, and returns the score both
/// agree on.
///
/// # Errors
///
/// Returns [`NetworkError::DuplicateFact`] if two facts share an id and
/// [`NetworkError::ScoreCorruption`] naming the first constraint whose totals
/// differ.
///
/// # Example
///
/// ```
/// use solverforge_core::{Fact, SimpleScore};
/// use solverforge_network::{verify_incremental, ConstraintDefinition, NetworkBlueprint};
///
/// #[derive(Clone)]
/// struct Task { id: u32, hours: i64 }
///
/// impl Fact for Task {
///     type Id = u32;
///     fn fact_id(&self) -> u32 { self.id }
///     fn class_name(&self) -> &'static str { "Task" }
/// }
///
/// let blueprint = NetworkBlueprint::new(vec![
///     ConstraintDefinition::<Task, SimpleScore>::new("", "Hours")
///         .for_each("Task")
///         .penalize_with(SimpleScore::ONE, |t| t.fact(0).hours),
/// ])
/// .unwrap();
///
/// let facts = [Task { id: 1, hours: 3 }, Task { id: 2, hours: 5 }];
/// assert_eq!(verify_incremental(&blueprint, &facts).unwrap(), SimpleScore::of(-8));
/// ```
pub fn verify_incremental<F, Sc>(blueprint: &NetworkBlueprint<F, Sc>, facts: &[F]) -> Result<Sc>
where
    F: Fact + Clone,
    Sc: Score,
{
    let mut session = blueprint.create_session(&SessionConfig::default())?;
    let mut store = FactStore::with_capacity(facts.len());
    for fact in facts {
        session.insert(fact.clone())?;
        store.insert(fact.clone())?;
    }
    let expected = batch::evaluate_each(blueprint, &store);
    compare(&session.constraint_results(), &expected, session.score())
}

// Checks per-constraint totals first so the error names the culprit.
pub(crate) fn compare<Sc: Score>(
    incremental: &[ConstraintResult<Sc>],
    expected: &[ConstraintResult<Sc>],
    score: Sc,
) -> Result<Sc> {
    for (live, batch) in incremental.iter().zip(expected) {
        if live.score != batch.score || live.match_count != batch.match_count {
            return Err(corruption(
                &live.constraint_ref.full_name(),
                live.score,
                batch.score,
            ));
        }
    }
    let total = expected
        .iter()
        .fold(Sc::zero(), |total, result| total + result.score);
    if score != total {
        return Err(corruption("<total>", score, total));
    }
    Ok(score)
}

pub(crate) fn corruption<Sc: Score>(
    constraint: &str,
    incremental: Sc,
    expected: Sc,
) -> NetworkError {
    error!(
        event = "score_corruption",
        constraint,
        incremental = %incremental,
        expected = %expected,
    );
    NetworkError::ScoreCorruption {
        constraint: constraint.to_string(),
        incremental: incremental.to_string(),
        expected: expected.to_string(),
    }
}
