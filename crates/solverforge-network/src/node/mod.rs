//! Propagation nodes.
//!
//! Every node kind implements the same contract: it receives insert, update
//! and retract events for tuples arriving on one of its inputs, updates its
//! private state and appends the events it derives to `out`. The network
//! delivers `out` to the node's children depth-first.

mod exists;
mod filter;
mod group;
mod join;
mod source;
mod terminal;


pub(crate) use exists::ExistsNode;
pub(crate) use filter::FilterNode;
pub(crate) use group::GroupNode;
pub(crate) use join::JoinNode;
pub(crate) use source::SourceNode;
pub(crate) use terminal::TerminalNode;

use solverforge_core::{Fact, Score};

use crate::fact_store::FactStore;
use crate::index::Side;
use crate::tuple::{TupleArena, TupleId, TupleRef, TupleValues};

/// Index of a node in its network.
pub(crate) type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventKind {
    Insert,
    Update,
    Retract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Event {
    pub kind: EventKind,
    pub tuple: TupleId,
}

impl Event {
    #[inline]
    pub fn insert(tuple: TupleId) -> Self {
        Self {
            kind: EventKind::Insert,
            tuple,
        }
    }

    #[inline]
    pub fn update(tuple: TupleId) -> Self {
        Self {
            kind: EventKind::Update,
            tuple,
        }
    }

    #[inline]
    pub fn retract(tuple: TupleId) -> Self {
        Self {
            kind: EventKind::Retract,
            tuple,
        }
    }
}

/// Connection from a node to the input `side` of `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Edge {
    pub target: NodeId,
    pub side: Side,
}

/// Session state shared by all nodes during one propagation.
pub(crate) struct Context<'a, F: Fact, Sc: Score> {
    pub facts: &'a FactStore<F>,
    pub tuples: &'a mut TupleArena,
    // Released tuples, freed once the mutation reaches quiescence.
    pub graveyard: &'a mut Vec<TupleId>,
    pub score: &'a mut Sc,
}

impl<'a, F: Fact, Sc: Score> Context<'a, F, Sc> {
    #[inline]
    pub fn view(&self, tuple: TupleId) -> TupleRef<'_, F> {
        TupleRef::new(self.tuples.get(tuple), self.facts)
    }

    #[inline]
    pub fn alloc(&mut self, values: TupleValues) -> TupleId {
        self.tuples.alloc(values)
    }

    #[inline]
    pub fn release(&mut self, tuple: TupleId) {
        self.graveyard.push(tuple);
    }
}

/// A node of the propagation graph.
pub(crate) enum Node<F: Fact, Sc: Score> {
    Source(SourceNode),
    Filter(FilterNode<F>),
    Join(JoinNode<F>),
    Exists(ExistsNode<F>),
    Group(GroupNode<F>),
    Terminal(TerminalNode<F, Sc>),
}

impl<F: Fact, Sc: Score> Node<F, Sc> {
    /// Handles one tuple event arriving on `side`.
    pub fn on_event(
        &mut self,
        side: Side,
        event: Event,
        ctx: &mut Context<'_, F, Sc>,
        out: &mut Vec<Event>,
    ) {
        match self {
            // sources are fed fact events by the session, never tuple events
            Node::Source(_) => {}
            Node::Filter(node) => node.on_event(event, ctx, out),
            Node::Join(node) => node.on_event(side, event, ctx, out),
            Node::Exists(node) => node.on_event(side, event, ctx, out),
            Node::Group(node) => node.on_event(event, ctx, out),
            Node::Terminal(node) => node.on_event(event, ctx),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Source(_) => "source",
            Node::Filter(_) => "filter",
            Node::Join(_) => "join",
            Node::Exists(_) => "exists",
            Node::Group(_) => "group",
            Node::Terminal(_) => "terminal",
        }
    }
}
