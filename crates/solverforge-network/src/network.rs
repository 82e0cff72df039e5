//! Materialised propagation graph of one session.

use std::collections::HashMap;
use std::sync::Arc;

use solverforge_core::{Fact, Score};
use tracing::debug;

use crate::blueprint::NetworkBlueprint;
use crate::error::{NetworkError, Result};
use crate::fact_store::{FactHandle, FactStore};
use crate::hierarchy::ClassHierarchy;
use crate::index::Side;
use crate::node::{
    Context, Edge, Event, ExistsNode, FilterNode, GroupNode, JoinNode, Node, NodeId, SourceNode,
    TerminalNode,
};
use crate::stream::StreamOp;
use crate::tuple::{TupleArena, TupleId};
use crate::value::Value;

/// Node graph plus all runtime state derived from the live facts.
///
/// The topology is fixed by [`Network::build`]; only node state, tuples and
/// the score change afterwards.
pub(crate) struct Network<F: Fact, Sc: Score> {
    nodes: Vec<Node<F, Sc>>,
    children: Vec<Vec<Edge>>,
    sources: HashMap<(&'static str, bool), NodeId>,
    // one terminal per constraint, in declaration order
    terminals: Vec<NodeId>,
    hierarchy: Arc<ClassHierarchy>,
    routes: HashMap<&'static str, Vec<NodeId>>,
    tuples: TupleArena,
    graveyard: Vec<TupleId>,
    score: Sc,
    stack: Vec<(Edge, Event)>,
}

#[derive(Clone, Copy)]
enum FactEvent {
    Insert { initialized: bool },
    Update { initialized: bool },
    Retract,
}

impl<F: Fact, Sc: Score> Network<F, Sc> {
    pub fn build(blueprint: &NetworkBlueprint<F, Sc>) -> Result<Self> {
        let mut network = Self {
            nodes: Vec::new(),
            children: Vec::new(),
            sources: HashMap::new(),
            terminals: Vec::with_capacity(blueprint.definitions().len()),
            hierarchy: blueprint.shared_hierarchy(),
            routes: HashMap::new(),
            tuples: TupleArena::new(),
            graveyard: Vec::new(),
            score: Sc::zero(),
            stack: Vec::new(),
        };

        for definition in blueprint.definitions() {
            let name = || definition.constraint_ref().full_name();
            let mut current: Option<NodeId> = None;
            for op in definition.ops() {
                let next = match op {
                    StreamOp::ForEach {
                        class,
                        include_uninitialized,
                    } => {
                        current = Some(network.source(*class, *include_uninitialized));
                        continue;
                    }
                    StreamOp::Filter { predicate } => {
                        Node::Filter(FilterNode::new(predicate.clone()))
                    }
                    StreamOp::Join { joiners, .. } => Node::Join(JoinNode::new(joiners.clone())),
                    StreamOp::IfExists { joiners, mode, .. } => {
                        Node::Exists(ExistsNode::new(*mode, joiners.clone()))
                    }
                    StreamOp::GroupBy { keys, collectors } => {
                        Node::Group(GroupNode::new(keys.clone(), collectors.clone()))
                    }
                };
                let parent = current.ok_or_else(|| NetworkError::MissingSource {
                    constraint: name(),
                })?;
                let node = network.add(next);
                network.connect(parent, node, Side::Left);
                if let StreamOp::Join { class, .. } | StreamOp::IfExists { class, .. } = op {
                    let right = network.source(*class, false);
                    network.connect(right, node, Side::Right);
                }
                current = Some(node);
            }

            let parent = current.ok_or_else(|| NetworkError::MissingSource {
                constraint: name(),
            })?;
            let terminal = definition
                .terminal()
                .ok_or_else(|| NetworkError::MissingTerminal {
                    constraint: name(),
                })?;
            let node = network.add(Node::Terminal(TerminalNode::new(terminal.clone())));
            network.connect(parent, node, Side::Left);
            network.terminals.push(node);
        }

        debug!(
            event = "network_build",
            nodes = network.nodes.len(),
            sources = network.sources.len(),
            constraints = network.terminals.len(),
        );
        Ok(network)
    }

    fn add(&mut self, node: Node<F, Sc>) -> NodeId {
        self.nodes.push(node);
        self.children.push(Vec::new());
        self.nodes.len() - 1
    }

    fn connect(&mut self, parent: NodeId, target: NodeId, side: Side) {
        self.children[parent].push(Edge { target, side });
    }

    fn source(&mut self, class: &'static str, include_uninitialized: bool) -> NodeId {
        if let Some(&node) = self.sources.get(&(class, include_uninitialized)) {
            return node;
        }
        let node = self.add(Node::Source(SourceNode::new(class, include_uninitialized)));
        self.sources.insert((class, include_uninitialized), node);
        node
    }

    // Sources receiving facts of `class`: those declared for the class or one
    // of its ancestors.
    fn route(&mut self, class: &'static str) -> Vec<NodeId> {
        if let Some(route) = self.routes.get(class) {
            return route.clone();
        }
        let lineage = self.hierarchy.lineage(class);
        let route: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(id, node)| match node {
                Node::Source(source) if lineage.contains(&source.class()) => Some(id),
                _ => None,
            })
            .collect();
        self.routes.insert(class, route.clone());
        route
    }

    pub fn insert_fact(
        &mut self,
        facts: &FactStore<F>,
        handle: FactHandle,
        class: &'static str,
        initialized: bool,
    ) {
        self.fact_event(facts, handle, class, FactEvent::Insert { initialized });
    }

    pub fn update_fact(
        &mut self,
        facts: &FactStore<F>,
        handle: FactHandle,
        class: &'static str,
        initialized: bool,
    ) {
        self.fact_event(facts, handle, class, FactEvent::Update { initialized });
    }

    pub fn retract_fact(&mut self, facts: &FactStore<F>, handle: FactHandle, class: &'static str) {
        self.fact_event(facts, handle, class, FactEvent::Retract);
    }

    fn fact_event(
        &mut self,
        facts: &FactStore<F>,
        handle: FactHandle,
        class: &'static str,
        event: FactEvent,
    ) {
        let mut out = Vec::new();
        for source in self.route(class) {
            out.clear();
            let mut ctx = Context {
                facts,
                tuples: &mut self.tuples,
                graveyard: &mut self.graveyard,
                score: &mut self.score,
            };
            if let Node::Source(node) = &mut self.nodes[source] {
                match event {
                    FactEvent::Insert { initialized } => {
                        node.on_insert(handle, initialized, &mut ctx, &mut out)
                    }
                    FactEvent::Update { initialized } => {
                        node.on_update(handle, initialized, &mut ctx, &mut out)
                    }
                    FactEvent::Retract => node.on_retract(handle, &mut ctx, &mut out),
                }
            }
            self.propagate(facts, source, &out);
        }
        for tuple in self.graveyard.drain(..) {
            self.tuples.release(tuple);
        }
    }

    // Delivers `events` from `origin` to its children depth-first: each event
    // reaches every child, and everything it derives, before the next event.
    fn propagate(&mut self, facts: &FactStore<F>, origin: NodeId, events: &[Event]) {
        let mut stack = std::mem::take(&mut self.stack);
        push_children(&mut stack, &self.children[origin], events);
        let mut out = Vec::new();
        while let Some((edge, event)) = stack.pop() {
            out.clear();
            let mut ctx = Context {
                facts,
                tuples: &mut self.tuples,
                graveyard: &mut self.graveyard,
                score: &mut self.score,
            };
            self.nodes[edge.target].on_event(edge.side, event, &mut ctx, &mut out);
            push_children(&mut stack, &self.children[edge.target], &out);
        }
        self.stack = stack;
    }

    #[inline]
    pub fn score(&self) -> Sc {
        self.score
    }

    pub fn terminal(&self, constraint: usize) -> &TerminalNode<F, Sc> {
        match &self.nodes[self.terminals[constraint]] {
            Node::Terminal(node) => node,
            other => unreachable!("terminal slot holds a {} node", other.kind()),
        }
    }

    /// Sum of every constraint's total.
    pub fn terminal_sum(&self) -> Sc {
        (0..self.terminals.len()).fold(Sc::zero(), |sum, c| sum + self.terminal(c).total())
    }

    pub fn tuple_values(&self, tuple: TupleId) -> &[Value] {
        self.tuples.get(tuple)
    }

    pub fn live_tuples(&self) -> usize {
        self.tuples.live()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Number of tuples held by each node, keyed by node kind.
    pub fn node_sizes(&self) -> Vec<(&'static str, usize)> {
        self.nodes
            .iter()
            .map(|node| {
                let size = match node {
                    Node::Source(n) => n.len(),
                    Node::Filter(n) => n.len(),
                    Node::Join(n) => n.len(),
                    Node::Exists(n) => n.len(),
                    Node::Group(n) => n.len(),
                    Node::Terminal(n) => n.match_count(),
                };
                (node.kind(), size)
            })
            .collect()
    }
}

fn push_children(stack: &mut Vec<(Edge, Event)>, children: &[Edge], events: &[Event]) {
    for event in events.iter().rev() {
        for edge in children.iter().rev() {
            stack.push((*edge, *event));
        }
    }
}
