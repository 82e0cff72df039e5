//! Conditional existence node (`if_exists` / `if_not_exists`).

use std::collections::{BTreeMap, HashMap};

use solverforge_core::{Fact, Score};

use super::{Context, Event, EventKind};
use crate::index::{keys_match, JoinKeys, Side, TupleIndex};
use crate::stream::joiner::{Joiner, JoinerType};
use crate::stream::ExistenceMode;
use crate::tuple::TupleId;

struct LeftEntry {
    keys: JoinKeys,
    // live right tuples matching this left tuple
    count: usize,
}

/// Passes left tuples through depending on how many right tuples match them.
///
/// Right tuples never reach downstream nodes and the cardinality of the
/// left stream is unchanged; passing tuples keep their id.
pub(crate) struct ExistsNode<F: Fact> {
    mode: ExistenceMode,
    joiners: Vec<Joiner<F>>,
    types: Vec<JoinerType>,
    left: HashMap<TupleId, LeftEntry>,
    right: HashMap<TupleId, JoinKeys>,
    left_index: TupleIndex,
    right_index: TupleIndex,
}

impl<F: Fact> ExistsNode<F> {
    pub fn new(mode: ExistenceMode, joiners: Vec<Joiner<F>>) -> Self {
        let types: Vec<JoinerType> = joiners.iter().map(Joiner::joiner_type).collect();
        Self {
            mode,
            left_index: TupleIndex::new(Side::Left, &types),
            right_index: TupleIndex::new(Side::Right, &types),
            joiners,
            types,
            left: HashMap::new(),
            right: HashMap::new(),
        }
    }

    /// Number of left tuples currently passing.
    pub fn len(&self) -> usize {
        self.left
            .values()
            .filter(|entry| self.mode.passes(entry.count))
            .count()
    }

    pub fn on_event<Sc: Score>(
        &mut self,
        side: Side,
        event: Event,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        match side {
            Side::Left => self.on_left(event, ctx, out),
            Side::Right => self.on_right(event, ctx, out),
        }
        debug_assert_eq!(self.indexed(), (self.left.len(), self.right.len()));
    }

    /// Number of tuples held by the left and right indexes.
    pub fn indexed(&self) -> (usize, usize) {
        (self.left_index.len(), self.right_index.len())
    }

    fn count_matches(&self, keys: &JoinKeys) -> usize {
        self.right_index
            .candidates(keys)
            .into_iter()
            .filter(|right| {
                self.right
                    .get(right)
                    .is_some_and(|right_keys| keys_match(&self.types, keys, right_keys))
            })
            .count()
    }

    fn on_left<Sc: Score>(
        &mut self,
        event: Event,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        let tuple = event.tuple;
        match event.kind {
            EventKind::Insert => {
                let view = ctx.view(tuple);
                let keys: JoinKeys = self.joiners.iter().map(|j| j.left_key(&view)).collect();
                let count = self.count_matches(&keys);
                self.left_index.insert(&keys, tuple);
                self.left.insert(tuple, LeftEntry { keys, count });
                if self.mode.passes(count) {
                    out.push(event);
                }
            }
            EventKind::Update => {
                let view = ctx.view(tuple);
                let keys: JoinKeys = self.joiners.iter().map(|j| j.left_key(&view)).collect();
                let Some(old) = self.left.get(&tuple) else {
                    return;
                };
                let was = self.mode.passes(old.count);
                let count = if old.keys == keys {
                    old.count
                } else {
                    let old_keys = old.keys.clone();
                    self.left_index.remove(&old_keys, tuple);
                    self.left_index.insert(&keys, tuple);
                    self.count_matches(&keys)
                };
                self.left.insert(tuple, LeftEntry { keys, count });
                match (was, self.mode.passes(count)) {
                    (true, true) => out.push(event),
                    (false, true) => out.push(Event::insert(tuple)),
                    (true, false) => out.push(Event::retract(tuple)),
                    (false, false) => {}
                }
            }
            EventKind::Retract => {
                if let Some(entry) = self.left.remove(&tuple) {
                    self.left_index.remove(&entry.keys, tuple);
                    if self.mode.passes(entry.count) {
                        out.push(event);
                    }
                }
            }
        }
    }

    fn on_right<Sc: Score>(
        &mut self,
        event: Event,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        let tuple = event.tuple;
        let old = match event.kind {
            EventKind::Insert => None,
            EventKind::Update | EventKind::Retract => match self.right.remove(&tuple) {
                Some(keys) => Some(keys),
                None => return,
            },
        };
        let new = match event.kind {
            EventKind::Retract => None,
            EventKind::Insert | EventKind::Update => {
                let view = ctx.view(tuple);
                let keys: JoinKeys = self.joiners.iter().map(|j| j.right_key(&view)).collect();
                Some(keys)
            }
        };
        if old == new {
            if let Some(keys) = new {
                self.right.insert(tuple, keys);
            }
            return;
        }

        // left tuple -> whether it passed before this event
        let mut affected: BTreeMap<TupleId, bool> = BTreeMap::new();
        if let Some(keys) = &old {
            self.right_index.remove(keys, tuple);
            self.shift_counts(keys, false, &mut affected);
        }
        if let Some(keys) = new {
            self.right_index.insert(&keys, tuple);
            self.shift_counts(&keys, true, &mut affected);
            self.right.insert(tuple, keys);
        }

        for (left, was) in affected {
            let Some(entry) = self.left.get(&left) else {
                continue;
            };
            match (was, self.mode.passes(entry.count)) {
                (false, true) => out.push(Event::insert(left)),
                (true, false) => out.push(Event::retract(left)),
                _ => {}
            }
        }
    }

    fn shift_counts(
        &mut self,
        right_keys: &JoinKeys,
        increment: bool,
        affected: &mut BTreeMap<TupleId, bool>,
    ) {
        for left in self.left_index.candidates(right_keys) {
            let Some(entry) = self.left.get_mut(&left) else {
                continue;
            };
            if !keys_match(&self.types, &entry.keys, right_keys) {
                continue;
            }
            let passed = self.mode.passes(entry.count);
            affected.entry(left).or_insert(passed);
            if increment {
                entry.count += 1;
            } else {
                entry.count -= 1;
            }
        }
    }
}
