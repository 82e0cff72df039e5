//! Join node: combines left tuples with right tuples under joiners.

use std::collections::{BTreeMap, HashMap};

use solverforge_core::{Fact, Score};

use super::{Context, Event, EventKind};
use crate::index::{keys_match, JoinKeys, Side, TupleIndex};
use crate::stream::joiner::{Joiner, JoinerType};
use crate::tuple::{TupleId, TupleValues};

struct JoinEntry {
    keys: JoinKeys,
    // other side's tuple -> combined tuple
    matches: BTreeMap<TupleId, TupleId>,
}

/// Joins a left stream of cardinality M with a right stream of cardinality K
/// into combined tuples of cardinality M + K (left elements first).
///
/// Both sides keep their cached keys and their matches, so a tuple may
/// arrive on both sides (self-joins) and retracts never re-extract keys.
pub(crate) struct JoinNode<F: Fact> {
    joiners: Vec<Joiner<F>>,
    types: Vec<JoinerType>,
    left: HashMap<TupleId, JoinEntry>,
    right: HashMap<TupleId, JoinEntry>,
    left_index: TupleIndex,
    right_index: TupleIndex,
}

impl<F: Fact> JoinNode<F> {
    pub fn new(joiners: Vec<Joiner<F>>) -> Self {
        let types: Vec<JoinerType> = joiners.iter().map(Joiner::joiner_type).collect();
        Self {
            left_index: TupleIndex::new(Side::Left, &types),
            right_index: TupleIndex::new(Side::Right, &types),
            joiners,
            types,
            left: HashMap::new(),
            right: HashMap::new(),
        }
    }

    /// Number of live combined tuples.
    pub fn len(&self) -> usize {
        self.left.values().map(|entry| entry.matches.len()).sum()
    }

    /// Number of tuples held by the left and right indexes.
    pub fn indexed(&self) -> (usize, usize) {
        (self.left_index.len(), self.right_index.len())
    }

    pub fn on_event<Sc: Score>(
        &mut self,
        side: Side,
        event: Event,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        self.dispatch(side, event, ctx, out);
        debug_assert_eq!(self.indexed(), (self.left.len(), self.right.len()));
    }

    fn dispatch<Sc: Score>(
        &mut self,
        side: Side,
        event: Event,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        let tuple = event.tuple;
        match event.kind {
            EventKind::Insert => {
                let keys = self.extract(side, tuple, ctx);
                self.insert(side, tuple, keys, ctx, out);
            }
            EventKind::Update => {
                let keys = self.extract(side, tuple, ctx);
                let entry = match side {
                    Side::Left => self.left.get(&tuple),
                    Side::Right => self.right.get(&tuple),
                };
                match entry {
                    Some(entry) if entry.keys == keys => {
                        out.extend(entry.matches.values().map(|&c| Event::update(c)));
                    }
                    _ => {
                        self.retract(side, tuple, ctx, out);
                        self.insert(side, tuple, keys, ctx, out);
                    }
                }
            }
            EventKind::Retract => self.retract(side, tuple, ctx, out),
        }
    }

    fn extract<Sc: Score>(
        &self,
        side: Side,
        tuple: TupleId,
        ctx: &Context<'_, F, Sc>,
    ) -> JoinKeys {
        let view = ctx.view(tuple);
        match side {
            Side::Left => self.joiners.iter().map(|j| j.left_key(&view)).collect(),
            Side::Right => self.joiners.iter().map(|j| j.right_key(&view)).collect(),
        }
    }

    fn maps(
        &mut self,
        side: Side,
    ) -> (
        &mut HashMap<TupleId, JoinEntry>,
        &mut HashMap<TupleId, JoinEntry>,
    ) {
        match side {
            Side::Left => (&mut self.left, &mut self.right),
            Side::Right => (&mut self.right, &mut self.left),
        }
    }

    fn insert<Sc: Score>(
        &mut self,
        side: Side,
        tuple: TupleId,
        keys: JoinKeys,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        let (own_index, other_index) = match side {
            Side::Left => (&mut self.left_index, &self.right_index),
            Side::Right => (&mut self.right_index, &self.left_index),
        };
        let (own, other) = match side {
            Side::Left => (&mut self.left, &mut self.right),
            Side::Right => (&mut self.right, &mut self.left),
        };

        let mut matches = BTreeMap::new();
        for candidate in other_index.candidates(&keys) {
            let Some(other_entry) = other.get_mut(&candidate) else {
                continue;
            };
            let (left, right, left_keys, right_keys) = match side {
                Side::Left => (tuple, candidate, &keys, &other_entry.keys),
                Side::Right => (candidate, tuple, &other_entry.keys, &keys),
            };
            if !keys_match(&self.types, left_keys, right_keys) {
                continue;
            }
            let mut values: TupleValues = ctx.tuples.get(left).iter().cloned().collect();
            values.extend(ctx.tuples.get(right).iter().cloned());
            let combined = ctx.alloc(values);
            other_entry.matches.insert(tuple, combined);
            matches.insert(candidate, combined);
            out.push(Event::insert(combined));
        }

        own_index.insert(&keys, tuple);
        own.insert(tuple, JoinEntry { keys, matches });
    }

    fn retract<Sc: Score>(
        &mut self,
        side: Side,
        tuple: TupleId,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        let (own, other) = self.maps(side);
        let Some(entry) = own.remove(&tuple) else {
            return;
        };
        for (candidate, combined) in &entry.matches {
            if let Some(other_entry) = other.get_mut(candidate) {
                other_entry.matches.remove(&tuple);
            }
            out.push(Event::retract(*combined));
            ctx.release(*combined);
        }
        match side {
            Side::Left => self.left_index.remove(&entry.keys, tuple),
            Side::Right => self.right_index.remove(&entry.keys, tuple),
        }
    }
}
