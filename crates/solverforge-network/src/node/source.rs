//! Source node: turns fact store events into one-element tuples.

use std::collections::HashMap;

use smallvec::smallvec;
use solverforge_core::{Fact, Score};

use super::{Context, Event};
use crate::fact_store::FactHandle;
use crate::tuple::TupleId;
use crate::value::Value;

/// Streams the live facts of one class, optionally skipping uninitialized ones.
///
/// Initialization behaves like a filter over the fact: an update moving a
/// fact in or out of the stream propagates an insert or a retract.
pub(crate) struct SourceNode {
    class: &'static str,
    include_uninitialized: bool,
    tuples: HashMap<FactHandle, TupleId>,
}

impl SourceNode {
    pub fn new(class: &'static str, include_uninitialized: bool) -> Self {
        Self {
            class,
            include_uninitialized,
            tuples: HashMap::new(),
        }
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    #[inline]
    fn admits(&self, initialized: bool) -> bool {
        self.include_uninitialized || initialized
    }

    pub fn on_insert<F: Fact, Sc: Score>(
        &mut self,
        handle: FactHandle,
        initialized: bool,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        if self.admits(initialized) {
            let tuple = ctx.alloc(smallvec![Value::Fact(handle)]);
            self.tuples.insert(handle, tuple);
            out.push(Event::insert(tuple));
        }
    }

    pub fn on_update<F: Fact, Sc: Score>(
        &mut self,
        handle: FactHandle,
        initialized: bool,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        let admitted = self.admits(initialized);
        match self.tuples.get(&handle).copied() {
            Some(tuple) if admitted => out.push(Event::update(tuple)),
            Some(_) => self.on_retract(handle, ctx, out),
            None => self.on_insert(handle, initialized, ctx, out),
        }
    }

    pub fn on_retract<F: Fact, Sc: Score>(
        &mut self,
        handle: FactHandle,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        if let Some(tuple) = self.tuples.remove(&handle) {
            out.push(Event::retract(tuple));
            ctx.release(tuple);
        }
    }
}
