//! Search nodes, the run-scoped node arena, and node construction.
//!
//! Every node of a run lives in one [`NodeArena`]. Parent links are
//! [`NodeId`] handles into that arena, so the node graph is a tree by
//! construction and the whole run is released by dropping the arena.

use crate::error::{ProblemStage, SearchError};
use crate::problem::{guarded, PathCost, Problem};

/// Stable handle to a node in a [`NodeArena`]. Handles are assigned in
/// creation order, so they double as a deterministic tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// One partial solution path: a state plus a back-pointer to the node it was
/// generated from. Immutable once created.
#[derive(Debug, Clone)]
pub struct Node<S, A> {
    /// The state this path ends in.
    pub state: S,
    /// The node this one was generated from (`None` for the root).
    pub parent: Option<NodeId>,
    /// The action applied to the parent (`None` for the root).
    pub action: Option<A>,
    /// Cumulative cost from the root.
    pub path_cost: PathCost,
    /// Number of actions from the root (root = 0).
    pub depth: u32,
}

impl<S, A> Node<S, A> {
    /// Whether this is the root of its run.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Owner of every node created during one search run.
#[derive(Debug, Clone)]
pub struct NodeArena<S, A> {
    nodes: Vec<Node<S, A>>,
}

impl<S, A> NodeArena<S, A> {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn insert(&mut self, node: Node<S, A>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// The node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different arena and is out of range.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node<S, A> {
        &self.nodes[id.index()]
    }

    /// Number of nodes created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop `id` and every node created after it.
    pub(crate) fn truncate(&mut self, id: NodeId) {
        self.nodes.truncate(id.index());
    }

    /// Iterate nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<S, A>)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Node handles from the root to `id` inclusive.
    #[must_use]
    pub fn path_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            path.push(cur);
            current = self.get(cur).parent;
        }
        path.reverse();
        path
    }
}

impl<S, A: Clone> NodeArena<S, A> {
    /// The actions leading from the root to `id`, in application order.
    #[must_use]
    pub fn reconstruct_path(&self, id: NodeId) -> Vec<A> {
        self.path_ids(id)
            .into_iter()
            .filter_map(|n| self.get(n).action.clone())
            .collect()
    }
}

impl<S, A> Default for NodeArena<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds root and child nodes into an arena, applying the problem's
/// transition model and step costs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeFactory;

impl NodeFactory {
    /// Create the root node for `state`: no parent, no action, cost 0, depth 0.
    pub fn root<S, A>(self, arena: &mut NodeArena<S, A>, state: S) -> NodeId {
        arena.insert(Node {
            state,
            parent: None,
            action: None,
            path_cost: 0,
            depth: 0,
        })
    }

    /// Create the child of `parent` reached by `action`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ProblemPanicked`] if the transition or step-cost
    /// callback panics, [`SearchError::NegativeStepCost`] if the step cost is
    /// negative, and [`SearchError::PathCostOverflow`] if the cumulative cost
    /// exceeds [`PathCost::MAX`].
    pub fn child<P: Problem>(
        self,
        problem: &P,
        arena: &mut NodeArena<P::State, P::Action>,
        parent: NodeId,
        action: P::Action,
    ) -> Result<NodeId, SearchError> {
        let parent_node = arena.get(parent);
        let state = guarded(ProblemStage::Transition, || {
            problem.transition(&parent_node.state, &action)
        })?;
        let step = guarded(ProblemStage::StepCost, || {
            problem.step_cost(&parent_node.state, &action, &state)
        })?;
        let depth = parent_node.depth + 1;
        if step < 0 {
            return Err(SearchError::NegativeStepCost { depth, cost: step });
        }
        let path_cost = parent_node
            .path_cost
            .checked_add(step)
            .ok_or(SearchError::PathCostOverflow { depth })?;
        Ok(arena.insert(Node {
            state,
            parent: Some(parent),
            action: Some(action),
            path_cost,
            depth,
        }))
    }
}
