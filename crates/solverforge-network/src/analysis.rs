//! Score analysis types: per-constraint totals, live matches and
//! per-fact indictments.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use solverforge_core::{ConstraintRef, Score, ScoreLevel};

use crate::fact_store::FactHandle;
use crate::value::Value;

/// Score contribution of one constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintResult<Sc: Score> {
    /// Constraint reference.
    pub constraint_ref: ConstraintRef,
    /// Constraint weight (score per unit of match weight).
    pub weight: Sc,
    /// Total score from this constraint.
    pub score: Sc,
    /// Number of live matches.
    pub match_count: usize,
    /// Whether the weight touches a hard level.
    pub is_hard: bool,
}

impl<Sc: Score> ConstraintResult<Sc> {
    pub(crate) fn new(
        constraint_ref: ConstraintRef,
        weight: Sc,
        score: Sc,
        match_count: usize,
    ) -> Self {
        Self {
            constraint_ref,
            weight,
            score,
            match_count,
            is_hard: is_hard_weight(&weight),
        }
    }

    /// Returns the constraint name.
    pub fn name(&self) -> &str {
        &self.constraint_ref.name
    }
}

fn is_hard_weight<Sc: Score>(weight: &Sc) -> bool {
    weight
        .to_level_numbers()
        .iter()
        .enumerate()
        .any(|(level, amount)| *amount != 0 && Sc::level_label(level) == ScoreLevel::Hard)
}

/// A live match of a constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintMatch<Sc: Score> {
    /// Constraint reference.
    pub constraint_ref: ConstraintRef,
    /// Elements of the matched tuple.
    pub values: Vec<Value>,
    /// Impact of this match on the score.
    pub score: Sc,
}

impl<Sc: Score> ConstraintMatch<Sc> {
    /// Returns every fact referenced by the match, including facts inside
    /// collected lists, in order of appearance.
    pub fn facts(&self) -> Vec<FactHandle> {
        fn walk(value: &Value, found: &mut Vec<FactHandle>) {
            match value {
                Value::Fact(handle) => {
                    if !found.contains(handle) {
                        found.push(*handle);
                    }
                }
                Value::List(items) => items.iter().for_each(|item| walk(item, found)),
                _ => {}
            }
        }
        let mut found = Vec::new();
        for value in &self.values {
            walk(value, &mut found);
        }
        found
    }
}

/// Per-constraint breakdown with the matches behind each total.
#[derive(Debug, Clone)]
pub struct ConstraintAnalysis<Sc: Score> {
    pub result: ConstraintResult<Sc>,
    pub matches: Vec<ConstraintMatch<Sc>>,
}

/// Complete score explanation with per-constraint breakdown.
#[derive(Debug, Clone)]
pub struct ScoreExplanation<Sc: Score> {
    /// The total score.
    pub score: Sc,
    /// Per-constraint breakdown, in declaration order.
    pub constraint_analyses: Vec<ConstraintAnalysis<Sc>>,
}

impl<Sc: Score> ScoreExplanation<Sc> {
    /// Returns the total match count across all constraints.
    pub fn total_match_count(&self) -> usize {
        self.constraint_analyses
            .iter()
            .map(|a| a.result.match_count)
            .sum()
    }

    /// Returns constraints with non-zero scores.
    pub fn non_zero_constraints(&self) -> Vec<&ConstraintAnalysis<Sc>> {
        self.constraint_analyses
            .iter()
            .filter(|a| !a.result.score.is_zero())
            .collect()
    }

    /// Returns all matches across all constraints.
    pub fn all_matches(&self) -> Vec<&ConstraintMatch<Sc>> {
        self.constraint_analyses
            .iter()
            .flat_map(|a| &a.matches)
            .collect()
    }
}

/// How a single fact impacts the score.
///
/// A match involving several facts is charged in full to each of them.
#[derive(Debug, Clone)]
pub struct Indictment<Id, Sc: Score> {
    /// The indicted fact.
    pub fact_id: Id,
    /// Total impact of the matches involving the fact.
    pub score: Sc,
    /// Matches involving the fact, grouped by constraint.
    pub constraint_matches: HashMap<ConstraintRef, Vec<ConstraintMatch<Sc>>>,
}

impl<Id: Clone + Eq + Hash + Debug, Sc: Score> Indictment<Id, Sc> {
    pub(crate) fn new(fact_id: Id) -> Self {
        Self {
            fact_id,
            score: Sc::zero(),
            constraint_matches: HashMap::new(),
        }
    }

    pub(crate) fn add_match(&mut self, constraint_match: ConstraintMatch<Sc>) {
        self.score = self.score + constraint_match.score;
        self.constraint_matches
            .entry(constraint_match.constraint_ref.clone())
            .or_default()
            .push(constraint_match);
    }

    /// Returns the total number of matches involving the fact.
    pub fn match_count(&self) -> usize {
        self.constraint_matches.values().map(Vec::len).sum()
    }

    /// Returns the number of distinct constraints matched.
    pub fn constraint_count(&self) -> usize {
        self.constraint_matches.len()
    }
}

#[cfg(test)]
mod tests {
    use solverforge_core::{HardSoftScore, SimpleScore};

    use super::*;

    #[test]
    fn test_is_hard_follows_weight_levels() {
        let cr = ConstraintRef::new("", "c");
        assert!(
            ConstraintResult::new(cr.clone(), HardSoftScore::ONE_HARD, HardSoftScore::ZERO, 0)
                .is_hard
        );
        assert!(
            !ConstraintResult::new(cr.clone(), HardSoftScore::ONE_SOFT, HardSoftScore::ZERO, 0)
                .is_hard
        );
        assert!(!ConstraintResult::new(cr, SimpleScore::ONE, SimpleScore::ZERO, 0).is_hard);
    }

    #[test]
    fn test_indictment_accumulates_matches() {
        let cr = ConstraintRef::new("roster", "Overtime");
        let mut indictment = Indictment::new(7usize);
        for impact in [-2, -3] {
            indictment.add_match(ConstraintMatch {
                constraint_ref: cr.clone(),
                values: vec![Value::Int(impact)],
                score: SimpleScore::of(impact),
            });
        }
        assert_eq!(indictment.score, SimpleScore::of(-5));
        assert_eq!(indictment.match_count(), 2);
        assert_eq!(indictment.constraint_count(), 1);
    }
}
