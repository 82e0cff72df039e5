//! Tuple indexes serving join and existence lookups.
//!
//! Equality joiners form a composite hash key; the first ordering joiner, if
//! any, is served by a range scan over an ordered map inside each hash
//! bucket. Candidates returned by [`TupleIndex::candidates`] satisfy those
//! joiners only; callers recheck the remaining ordering joiners on the
//! cached keys.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;

use smallvec::SmallVec;

use crate::stream::joiner::JoinerType;
use crate::tuple::TupleId;
use crate::value::Value;

/// Key values extracted by a node's joiners, one per joiner.
pub(crate) type JoinKeys = SmallVec<[Value; 2]>;

/// Which side of a join a tuple arrives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// Returns true if every joiner holds between the two key vectors.
pub(crate) fn keys_match(types: &[JoinerType], left: &[Value], right: &[Value]) -> bool {
    types
        .iter()
        .zip(left.iter().zip(right.iter()))
        .all(|(joiner, (l, r))| joiner.matches(l, r))
}

/// Index over the tuples of one side of a join.
#[derive(Debug)]
pub(crate) struct TupleIndex {
    // Side whose keys are stored; probes come from the other side.
    stored: Side,
    equal: SmallVec<[usize; 2]>,
    range: Option<(usize, JoinerType)>,
    buckets: HashMap<JoinKeys, BTreeMap<Value, BTreeSet<TupleId>>>,
    len: usize,
}

impl TupleIndex {
    pub(crate) fn new(stored: Side, types: &[JoinerType]) -> Self {
        let equal = types
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_ordering())
            .map(|(i, _)| i)
            .collect();
        let range = types
            .iter()
            .enumerate()
            .find(|(_, t)| t.is_ordering())
            .map(|(i, t)| (i, *t));
        Self {
            stored,
            equal,
            range,
            buckets: HashMap::new(),
            len: 0,
        }
    }

    fn bucket_key(&self, keys: &[Value]) -> JoinKeys {
        self.equal.iter().map(|&i| keys[i].clone()).collect()
    }

    fn range_key(&self, keys: &[Value]) -> Value {
        match self.range {
            Some((i, _)) => keys[i].clone(),
            None => Value::Null,
        }
    }

    pub(crate) fn insert(&mut self, keys: &[Value], id: TupleId) {
        let bucket = self.bucket_key(keys);
        let range = self.range_key(keys);
        if self
            .buckets
            .entry(bucket)
            .or_default()
            .entry(range)
            .or_default()
            .insert(id)
        {
            self.len += 1;
        }
    }

    pub(crate) fn remove(&mut self, keys: &[Value], id: TupleId) {
        let bucket_key = self.bucket_key(keys);
        let range = self.range_key(keys);
        let Some(bucket) = self.buckets.get_mut(&bucket_key) else {
            return;
        };
        if let Some(ids) = bucket.get_mut(&range) {
            if ids.remove(&id) {
                self.len -= 1;
            }
            if ids.is_empty() {
                bucket.remove(&range);
            }
        }
        if bucket.is_empty() {
            self.buckets.remove(&bucket_key);
        }
    }

    // Bounds on stored range keys `s` such that the joiner holds between the
    // probe `p` and `s`, reading `left <op> right` with the probe on the
    // opposite side.
    fn bounds<'a>(
        &self,
        joiner: JoinerType,
        probe: &'a Value,
    ) -> (Bound<&'a Value>, Bound<&'a Value>) {
        use Bound::{Excluded, Included, Unbounded};
        use JoinerType::*;
        match (self.stored, joiner) {
            (Side::Right, LessThan) => (Excluded(probe), Unbounded),
            (Side::Right, LessThanOrEqual) => (Included(probe), Unbounded),
            (Side::Right, GreaterThan) => (Unbounded, Excluded(probe)),
            (Side::Right, GreaterThanOrEqual) => (Unbounded, Included(probe)),
            (Side::Left, LessThan) => (Unbounded, Excluded(probe)),
            (Side::Left, LessThanOrEqual) => (Unbounded, Included(probe)),
            (Side::Left, GreaterThan) => (Excluded(probe), Unbounded),
            (Side::Left, GreaterThanOrEqual) => (Included(probe), Unbounded),
            (_, Equal) => (Included(probe), Included(probe)),
        }
    }

    /// Returns stored tuples satisfying the equality joiners and the first
    /// ordering joiner against `probe`, in ascending id order per range key.
    pub(crate) fn candidates(&self, probe: &[Value]) -> Vec<TupleId> {
        let Some(bucket) = self.buckets.get(&self.bucket_key(probe)) else {
            return Vec::new();
        };
        match self.range {
            None => bucket.values().flatten().copied().collect(),
            Some((i, joiner)) => bucket
                .range::<Value, _>(self.bounds(joiner, &probe[i]))
                .flat_map(|(_, ids)| ids.iter().copied())
                .collect(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
