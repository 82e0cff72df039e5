//! Filter node.

use std::collections::HashSet;

use solverforge_core::{Fact, Score};

use super::{Context, Event, EventKind};
use crate::stream::Predicate;
use crate::tuple::TupleId;

/// Forwards the tuples of its parent that satisfy a predicate.
///
/// Keeps the set of currently passing tuples so a retract never re-evaluates
/// the predicate.
pub(crate) struct FilterNode<F: Fact> {
    predicate: Predicate<F>,
    passing: HashSet<TupleId>,
}

impl<F: Fact> FilterNode<F> {
    pub fn new(predicate: Predicate<F>) -> Self {
        Self {
            predicate,
            passing: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.passing.len()
    }

    pub fn on_event<Sc: Score>(
        &mut self,
        event: Event,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        let tuple = event.tuple;
        match event.kind {
            EventKind::Insert => {
                if (self.predicate)(&ctx.view(tuple)) {
                    self.passing.insert(tuple);
                    out.push(event);
                }
            }
            EventKind::Update => {
                let was = self.passing.contains(&tuple);
                let now = (self.predicate)(&ctx.view(tuple));
                match (was, now) {
                    (false, true) => {
                        self.passing.insert(tuple);
                        out.push(Event::insert(tuple));
                    }
                    (true, false) => {
                        self.passing.remove(&tuple);
                        out.push(Event::retract(tuple));
                    }
                    (true, true) => out.push(event),
                    (false, false) => {}
                }
            }
            EventKind::Retract => {
                if self.passing.remove(&tuple) {
                    out.push(event);
                }
            }
        }
    }
}
