//! GroupBy node: aggregates member tuples per group key.

use std::collections::HashMap;

use smallvec::SmallVec;
use solverforge_core::{Fact, Score};

use super::{Context, Event, EventKind};
use crate::stream::collector::{Accumulator, Collector};
use crate::stream::Mapping;
use crate::tuple::{TupleId, TupleValues};
use crate::value::Value;

type GroupKey = SmallVec<[Value; 4]>;
type Results = SmallVec<[Value; 4]>;

// Derived values of one member, cached for its retraction.
#[derive(PartialEq)]
struct Member {
    key: GroupKey,
    values: Results,
}

struct Group {
    members: usize,
    accumulators: Vec<Box<dyn Accumulator>>,
    // Downstream tuple and the collector results it carries.
    out: Option<(TupleId, Results)>,
}

/// Groups its parent's tuples by key and emits one tuple per non-empty group:
/// the key values followed by the collector results.
///
/// A changed result propagates as a retract of the old group tuple followed
/// by an insert of a new one. A member update leaving every result unchanged
/// propagates an update of the group tuple.
pub(crate) struct GroupNode<F: Fact> {
    keys: Vec<Mapping<F>>,
    collectors: Vec<Collector<F>>,
    members: HashMap<TupleId, Member>,
    groups: HashMap<GroupKey, Group>,
}

impl<F: Fact> GroupNode<F> {
    pub fn new(keys: Vec<Mapping<F>>, collectors: Vec<Collector<F>>) -> Self {
        Self {
            keys,
            collectors,
            members: HashMap::new(),
            groups: HashMap::new(),
        }
    }

    /// Number of live groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn on_event<Sc: Score>(
        &mut self,
        event: Event,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        let tuple = event.tuple;
        // (group key, whether a member was updated in place)
        let mut dirty: SmallVec<[(GroupKey, bool); 2]> = SmallVec::new();
        match event.kind {
            EventKind::Insert => {
                let member = self.extract(tuple, ctx);
                dirty.push((member.key.clone(), false));
                self.add(&member);
                self.members.insert(tuple, member);
            }
            EventKind::Update => {
                let member = self.extract(tuple, ctx);
                match self.members.remove(&tuple) {
                    Some(old) if old == member => dirty.push((member.key.clone(), true)),
                    Some(old) => {
                        self.remove(&old);
                        dirty.push((old.key, false));
                        if dirty[0].0 != member.key {
                            dirty.push((member.key.clone(), false));
                        }
                        self.add(&member);
                    }
                    None => {
                        dirty.push((member.key.clone(), false));
                        self.add(&member);
                    }
                }
                self.members.insert(tuple, member);
            }
            EventKind::Retract => {
                if let Some(old) = self.members.remove(&tuple) {
                    self.remove(&old);
                    dirty.push((old.key, false));
                }
            }
        }
        for (key, updated) in dirty {
            self.flush(key, updated, ctx, out);
        }
    }

    fn extract<Sc: Score>(&self, tuple: TupleId, ctx: &Context<'_, F, Sc>) -> Member {
        let view = ctx.view(tuple);
        Member {
            key: self.keys.iter().map(|key| key(&view)).collect(),
            values: self.collectors.iter().map(|c| c.extract(&view)).collect(),
        }
    }

    fn add(&mut self, member: &Member) {
        let collectors = &self.collectors;
        let group = self.groups.entry(member.key.clone()).or_insert_with(|| Group {
            members: 0,
            accumulators: collectors.iter().map(|c| c.create_accumulator()).collect(),
            out: None,
        });
        group.members += 1;
        for (acc, value) in group.accumulators.iter_mut().zip(&member.values) {
            acc.accumulate(value);
        }
    }

    fn remove(&mut self, member: &Member) {
        if let Some(group) = self.groups.get_mut(&member.key) {
            group.members -= 1;
            for (acc, value) in group.accumulators.iter_mut().zip(&member.values) {
                acc.retract(value);
            }
        }
    }

    fn flush<Sc: Score>(
        &mut self,
        key: GroupKey,
        updated: bool,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        let Some(group) = self.groups.get_mut(&key) else {
            return;
        };
        if group.members == 0 {
            if let Some((tuple, _)) = group.out.take() {
                out.push(Event::retract(tuple));
                ctx.release(tuple);
            }
            self.groups.remove(&key);
            return;
        }

        let results: Results = group.accumulators.iter().map(|acc| acc.finish()).collect();
        match &group.out {
            Some((tuple, old)) if *old == results => {
                if updated {
                    out.push(Event::update(*tuple));
                }
                return;
            }
            Some((tuple, _)) => {
                out.push(Event::retract(*tuple));
                ctx.release(*tuple);
            }
            None => {}
        }
        let values: TupleValues = key.iter().chain(results.iter()).cloned().collect();
        let tuple = ctx.alloc(values);
        out.push(Event::insert(tuple));
        group.out = Some((tuple, results));
    }
}
