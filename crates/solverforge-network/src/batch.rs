//! From-scratch evaluation of a blueprint over a fact set.
//!
//! Nested loops over materialised tuple lists with fresh accumulators; no
//! incremental state is involved. This is the oracle incremental scores are
//! verified against.

use std::collections::BTreeMap;

use smallvec::{smallvec, SmallVec};
use solverforge_core::{Fact, Score};

use crate::analysis::ConstraintResult;
use crate::blueprint::NetworkBlueprint;
use crate::fact_store::FactStore;
use crate::hierarchy::ClassHierarchy;
use crate::stream::joiner::Joiner;
use crate::stream::{ConstraintDefinition, StreamOp};
use crate::tuple::{TupleRef, TupleValues};
use crate::value::Value;

/// Computes the total score of `facts` under `blueprint`.
pub fn evaluate<F: Fact, Sc: Score>(
    blueprint: &NetworkBlueprint<F, Sc>,
    facts: &FactStore<F>,
) -> Sc {
    evaluate_each(blueprint, facts)
        .iter()
        .fold(Sc::zero(), |total, result| total + result.score)
}

/// Computes every constraint's score and match count, in declaration order.
pub fn evaluate_each<F: Fact, Sc: Score>(
    blueprint: &NetworkBlueprint<F, Sc>,
    facts: &FactStore<F>,
) -> Vec<ConstraintResult<Sc>> {
    blueprint
        .definitions()
        .iter()
        .map(|definition| evaluate_constraint(definition, blueprint.hierarchy(), facts))
        .collect()
}

fn evaluate_constraint<F: Fact, Sc: Score>(
    definition: &ConstraintDefinition<F, Sc>,
    hierarchy: &ClassHierarchy,
    facts: &FactStore<F>,
) -> ConstraintResult<Sc> {
    let mut tuples: Vec<TupleValues> = Vec::new();
    for op in definition.ops() {
        tuples = match op {
            StreamOp::ForEach {
                class,
                include_uninitialized,
            } => source(facts, hierarchy, class, *include_uninitialized),
            StreamOp::Filter { predicate } => tuples
                .into_iter()
                .filter(|t| predicate(&TupleRef::new(t, facts)))
                .collect(),
            StreamOp::Join { class, joiners } => {
                let rights = source(facts, hierarchy, class, false);
                let mut joined = Vec::new();
                for left in &tuples {
                    for right in &rights {
                        if all_match(joiners, left, right, facts) {
                            let mut values = left.clone();
                            values.extend(right.iter().cloned());
                            joined.push(values);
                        }
                    }
                }
                joined
            }
            StreamOp::IfExists {
                class,
                joiners,
                mode,
            } => {
                let rights = source(facts, hierarchy, class, false);
                tuples
                    .into_iter()
                    .filter(|left| {
                        let count = rights
                            .iter()
                            .filter(|right| all_match(joiners, left, right, facts))
                            .count();
                        mode.passes(count)
                    })
                    .collect()
            }
            StreamOp::GroupBy { keys, collectors } => {
                let mut groups: BTreeMap<SmallVec<[Value; 4]>, Vec<_>> = BTreeMap::new();
                for tuple in &tuples {
                    let view = TupleRef::new(tuple, facts);
                    let key = keys.iter().map(|k| k(&view)).collect();
                    let accumulators = groups.entry(key).or_insert_with(|| {
                        collectors.iter().map(|c| c.create_accumulator()).collect()
                    });
                    for (acc, collector) in accumulators.iter_mut().zip(collectors) {
                        acc.accumulate(&collector.extract(&view));
                    }
                }
                groups
                    .into_iter()
                    .map(|(key, accumulators)| {
                        let mut values: TupleValues = key.into_iter().collect();
                        values.extend(accumulators.iter().map(|acc| acc.finish()));
                        values
                    })
                    .collect()
            }
        };
    }

    let mut score = Sc::zero();
    let mut match_count = 0;
    let weight = match definition.terminal() {
        Some(terminal) => {
            for tuple in &tuples {
                score = score + terminal.impact(&TupleRef::new(tuple, facts));
                match_count += 1;
            }
            terminal.weight
        }
        None => Sc::zero(),
    };
    ConstraintResult::new(definition.constraint_ref().clone(), weight, score, match_count)
}

fn source<F: Fact>(
    facts: &FactStore<F>,
    hierarchy: &ClassHierarchy,
    class: &str,
    include_uninitialized: bool,
) -> Vec<TupleValues> {
    facts
        .iter()
        .filter(|(_, fact)| hierarchy.is_a(fact.class_name(), class))
        .filter(|(_, fact)| include_uninitialized || fact.is_initialized())
        .map(|(handle, _)| smallvec![Value::Fact(handle)])
        .collect()
}

fn all_match<F: Fact>(
    joiners: &[Joiner<F>],
    left: &[Value],
    right: &[Value],
    facts: &FactStore<F>,
) -> bool {
    let left = TupleRef::new(left, facts);
    let right = TupleRef::new(right, facts);
    joiners.iter().all(|joiner| joiner.matches(&left, &right))
}
