//! Terminal node: converts matches into score impacts.

use std::collections::HashMap;

use solverforge_core::{Fact, Score};

use super::{Context, Event, EventKind};
use crate::stream::TerminalDefinition;
use crate::tuple::TupleId;

/// Penalizes or rewards every tuple reaching it.
///
/// The impact of each live match is cached, so a retract subtracts exactly
/// what was added without calling the weigher again.
pub(crate) struct TerminalNode<F: Fact, Sc: Score> {
    definition: TerminalDefinition<F, Sc>,
    impacts: HashMap<TupleId, Sc>,
    total: Sc,
}

impl<F: Fact, Sc: Score> TerminalNode<F, Sc> {
    pub fn new(definition: TerminalDefinition<F, Sc>) -> Self {
        Self {
            definition,
            impacts: HashMap::new(),
            total: Sc::zero(),
        }
    }

    /// Sum of the impacts of all live matches.
    #[inline]
    pub fn total(&self) -> Sc {
        self.total
    }

    #[inline]
    pub fn match_count(&self) -> usize {
        self.impacts.len()
    }

    pub fn weight(&self) -> Sc {
        self.definition.weight
    }

    /// Live matches and their cached impacts.
    pub fn impacts(&self) -> impl Iterator<Item = (TupleId, Sc)> + '_ {
        self.impacts.iter().map(|(tuple, impact)| (*tuple, *impact))
    }

    pub fn on_event(&mut self, event: Event, ctx: &mut Context<'_, F, Sc>) {
        match event.kind {
            EventKind::Insert => self.insert(event.tuple, ctx),
            EventKind::Update => {
                self.retract(event.tuple, ctx);
                self.insert(event.tuple, ctx);
            }
            EventKind::Retract => self.retract(event.tuple, ctx),
        }
    }

    fn insert(&mut self, tuple: TupleId, ctx: &mut Context<'_, F, Sc>) {
        let impact = self.definition.impact(&ctx.view(tuple));
        self.total = self.total + impact;
        *ctx.score = *ctx.score + impact;
        self.impacts.insert(tuple, impact);
    }

    fn retract(&mut self, tuple: TupleId, ctx: &mut Context<'_, F, Sc>) {
        if let Some(impact) = self.impacts.remove(&tuple) {
            self.total = self.total - impact;
            *ctx.score = *ctx.score - impact;
        }
    }
}
