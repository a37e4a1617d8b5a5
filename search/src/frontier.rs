//! Frontier containers.
//!
//! The search template only talks to the [`Frontier`] trait. Three orderings
//! ship with the crate: [`FifoFrontier`] (breadth-first), [`LifoFrontier`]
//! (depth-first) and [`PriorityFrontier`] (lowest evaluation first, ties in
//! insertion order).
//!
//! Frontiers store [`NodeId`] handles; the nodes themselves stay in the run's
//! arena. `push` receives the node so priority orderings can evaluate it once.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

use crate::node::{Node, NodeId};
use crate::problem::PathCost;

/// Node evaluation function for priority frontiers (e.g. `g`, `h`, `g + h`).
pub type Evaluation<S, A> = Rc<dyn Fn(&Node<S, A>) -> PathCost>;

/// An ordered container of node handles.
pub trait Frontier<S, A> {
    /// Insert a node.
    fn push(&mut self, id: NodeId, node: &Node<S, A>);

    /// Remove and return the head.
    fn pop(&mut self) -> Option<NodeId>;

    /// The head, without removing it.
    fn peek(&self) -> Option<NodeId>;

    /// Remove a specific node. Returns `false` if it was not present.
    fn remove(&mut self, id: NodeId) -> bool;

    /// Number of entries.
    fn len(&self) -> usize;

    /// Whether the frontier holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    fn clear(&mut self);

    /// The frontier's own ordering between two nodes, if it has one.
    ///
    /// `Some(Ordering::Less)` means `a` would leave the frontier before `b`.
    /// Insertion-ordered frontiers return `None`.
    fn compare(&self, _a: &Node<S, A>, _b: &Node<S, A>) -> Option<Ordering> {
        None
    }

    /// Short name for logs and traces.
    fn kind(&self) -> &'static str;
}

/// First-in first-out frontier.
#[derive(Debug, Default)]
pub struct FifoFrontier {
    queue: VecDeque<NodeId>,
}

impl FifoFrontier {
    /// Create an empty FIFO frontier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, A> Frontier<S, A> for FifoFrontier {
    fn push(&mut self, id: NodeId, _node: &Node<S, A>) {
        self.queue.push_back(id);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.queue.pop_front()
    }

    fn peek(&self) -> Option<NodeId> {
        self.queue.front().copied()
    }

    // Linear scan; only the reduced-frontier strategy removes by handle.
    fn remove(&mut self, id: NodeId) -> bool {
        match self.queue.iter().position(|&n| n == id) {
            Some(pos) => self.queue.remove(pos).is_some(),
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }

    fn kind(&self) -> &'static str {
        "fifo"
    }
}

/// Last-in first-out frontier.
#[derive(Debug, Default)]
pub struct LifoFrontier {
    stack: Vec<NodeId>,
}

impl LifoFrontier {
    /// Create an empty LIFO frontier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S, A> Frontier<S, A> for LifoFrontier {
    fn push(&mut self, id: NodeId, _node: &Node<S, A>) {
        self.stack.push(id);
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.stack.pop()
    }

    fn peek(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    fn remove(&mut self, id: NodeId) -> bool {
        match self.stack.iter().rposition(|&n| n == id) {
            Some(pos) => {
                self.stack.remove(pos);
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.stack.len()
    }

    fn clear(&mut self) {
        self.stack.clear();
    }

    fn kind(&self) -> &'static str {
        "lifo"
    }
}

/// Ordering key of a priority entry: evaluation first, then insertion
/// sequence so equal evaluations leave in FIFO order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PriorityKey {
    value: PathCost,
    sequence: u64,
}

/// Lowest-evaluation-first frontier.
///
/// Backed by a `BTreeMap` rather than a binary heap so that arbitrary entries
/// can be removed in `O(log n)`.
pub struct PriorityFrontier<S, A> {
    evaluation: Evaluation<S, A>,
    entries: BTreeMap<PriorityKey, NodeId>,
    keys: HashMap<NodeId, PriorityKey>,
    next_sequence: u64,
}

impl<S, A> PriorityFrontier<S, A> {
    /// Create an empty frontier ordered by `evaluation`.
    #[must_use]
    pub fn new(evaluation: Evaluation<S, A>) -> Self {
        Self {
            evaluation,
            entries: BTreeMap::new(),
            keys: HashMap::new(),
            next_sequence: 0,
        }
    }

    /// Frontier ordered by path cost `g`.
    #[must_use]
    pub fn by_path_cost() -> Self {
        Self::new(Rc::new(|n: &Node<S, A>| n.path_cost))
    }
}

impl<S, A> std::fmt::Debug for PriorityFrontier<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriorityFrontier")
            .field("len", &self.entries.len())
            .field("next_sequence", &self.next_sequence)
            .finish_non_exhaustive()
    }
}

impl<S, A> Frontier<S, A> for PriorityFrontier<S, A> {
    fn push(&mut self, id: NodeId, node: &Node<S, A>) {
        let key = PriorityKey {
            value: (self.evaluation)(node),
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        if let Some(old) = self.keys.insert(id, key) {
            self.entries.remove(&old);
        }
        self.entries.insert(key, id);
    }

    fn pop(&mut self) -> Option<NodeId> {
        let (_, id) = self.entries.pop_first()?;
        self.keys.remove(&id);
        Some(id)
    }

    fn peek(&self) -> Option<NodeId> {
        self.entries.first_key_value().map(|(_, &id)| id)
    }

    fn remove(&mut self, id: NodeId) -> bool {
        match self.keys.remove(&id) {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.keys.clear();
        self.next_sequence = 0;
    }

    fn compare(&self, a: &Node<S, A>, b: &Node<S, A>) -> Option<Ordering> {
        Some((self.evaluation)(a).cmp(&(self.evaluation)(b)))
    }

    fn kind(&self) -> &'static str {
        "priority"
    }
}
