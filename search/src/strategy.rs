//! Duplicate-state handling strategies.
//!
//! A [`QueueStrategy`] supplies the three frontier hooks the search template
//! calls: [`QueueStrategy::add_to_frontier`],
//! [`QueueStrategy::remove_from_frontier`] and
//! [`QueueStrategy::is_frontier_empty`]. Each variant owns its run-scoped
//! bookkeeping, which [`QueueStrategy::reset`] clears before every run.
//!
//! | Variant           | Revisits states | Frontier duplicates | Removal cost  |
//! |-------------------|-----------------|---------------------|---------------|
//! | `Tree`            | yes             | yes                 | pop           |
//! | `Graph`           | no              | yes (lazy cleanup)  | pop + skips   |
//! | `ReducedFrontier` | no              | no                  | pop; replace = frontier remove |

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::rc::Rc;

use crate::frontier::Frontier;
use crate::node::{Node, NodeArena, NodeId};

/// Ranks two nodes; `Ordering::Less` means the first is better.
pub type NodeComparator<S, A> = Rc<dyn Fn(&Node<S, A>, &Node<S, A>) -> Ordering>;

/// Configuration tag naming a strategy without its run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// No duplicate detection.
    Tree,
    /// Explored set; frontier may hold several nodes per state.
    Graph,
    /// Explored set plus a state → frontier-node index.
    ReducedFrontier,
}

impl DuplicatePolicy {
    /// Stable lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Graph => "graph",
            Self::ReducedFrontier => "reduced_frontier",
        }
    }
}

/// What `add_to_frontier` did with a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The node entered the frontier.
    Inserted,
    /// The node entered the frontier in place of a worse node for the same state.
    Replaced { evicted: NodeId },
    /// Dropped: its state was already expanded.
    DroppedExplored,
    /// Dropped: the frontier already holds an equal or better node for its state.
    DroppedDominated,
}

impl Admission {
    /// Whether the node is now in the frontier.
    #[must_use]
    pub fn admitted(self) -> bool {
        matches!(self, Self::Inserted | Self::Replaced { .. })
    }
}

/// Duplicate-handling strategy with its run-scoped state.
pub enum QueueStrategy<S, A> {
    /// Plain tree search. Only safe on acyclic state spaces.
    Tree,
    /// Graph search with an explored set.
    Graph {
        /// States already removed from the frontier.
        explored: HashSet<S>,
    },
    /// Graph search keeping at most one frontier node per state.
    ReducedFrontier {
        /// States already removed from the frontier.
        explored: HashSet<S>,
        /// The live frontier node for each state in the frontier.
        index: HashMap<S, NodeId>,
        /// Overrides the frontier's own comparator when set.
        comparator: Option<NodeComparator<S, A>>,
    },
}

impl<S, A> QueueStrategy<S, A>
where
    S: Clone + Eq + Hash,
{
    /// Plain tree search.
    #[must_use]
    pub fn tree() -> Self {
        Self::Tree
    }

    /// Explored-set graph search.
    #[must_use]
    pub fn graph() -> Self {
        Self::Graph {
            explored: HashSet::new(),
        }
    }

    /// Reduced-frontier graph search ranking duplicates with the frontier's
    /// own comparator (if the frontier has one).
    #[must_use]
    pub fn reduced_frontier() -> Self {
        Self::ReducedFrontier {
            explored: HashSet::new(),
            index: HashMap::new(),
            comparator: None,
        }
    }

    /// Reduced-frontier graph search with an explicit comparator.
    #[must_use]
    pub fn reduced_frontier_with(comparator: NodeComparator<S, A>) -> Self {
        Self::ReducedFrontier {
            explored: HashSet::new(),
            index: HashMap::new(),
            comparator: Some(comparator),
        }
    }

    /// Build the strategy named by `policy`.
    #[must_use]
    pub fn from_policy(policy: DuplicatePolicy) -> Self {
        match policy {
            DuplicatePolicy::Tree => Self::tree(),
            DuplicatePolicy::Graph => Self::graph(),
            DuplicatePolicy::ReducedFrontier => Self::reduced_frontier(),
        }
    }

    /// The configuration tag of this strategy.
    #[must_use]
    pub fn policy(&self) -> DuplicatePolicy {
        match self {
            Self::Tree => DuplicatePolicy::Tree,
            Self::Graph { .. } => DuplicatePolicy::Graph,
            Self::ReducedFrontier { .. } => DuplicatePolicy::ReducedFrontier,
        }
    }

    /// Clear all run-scoped state.
    pub fn reset(&mut self) {
        match self {
            Self::Tree => {}
            Self::Graph { explored } => explored.clear(),
            Self::ReducedFrontier {
                explored, index, ..
            } => {
                explored.clear();
                index.clear();
            }
        }
    }

    /// Whether `state` has been expanded in the current run. Always `false`
    /// for tree search.
    #[must_use]
    pub fn is_explored(&self, state: &S) -> bool {
        match self {
            Self::Tree => false,
            Self::Graph { explored } | Self::ReducedFrontier { explored, .. } => {
                explored.contains(state)
            }
        }
    }

    /// Number of explored states.
    #[must_use]
    pub fn explored_len(&self) -> usize {
        match self {
            Self::Tree => 0,
            Self::Graph { explored } | Self::ReducedFrontier { explored, .. } => explored.len(),
        }
    }

    /// The indexed frontier node for `state` (reduced frontier only).
    #[must_use]
    pub fn frontier_node_for(&self, state: &S) -> Option<NodeId> {
        match self {
            Self::ReducedFrontier { index, .. } => index.get(state).copied(),
            _ => None,
        }
    }

    /// Offer a node to the frontier.
    pub fn add_to_frontier<F>(
        &mut self,
        id: NodeId,
        arena: &NodeArena<S, A>,
        frontier: &mut F,
    ) -> Admission
    where
        F: Frontier<S, A> + ?Sized,
    {
        let node = arena.get(id);
        match self {
            Self::Tree => {
                frontier.push(id, node);
                Admission::Inserted
            }
            Self::Graph { explored } => {
                if explored.contains(&node.state) {
                    return Admission::DroppedExplored;
                }
                frontier.push(id, node);
                Admission::Inserted
            }
            Self::ReducedFrontier {
                explored,
                index,
                comparator,
            } => {
                if explored.contains(&node.state) {
                    return Admission::DroppedExplored;
                }
                let Some(&existing) = index.get(&node.state) else {
                    frontier.push(id, node);
                    index.insert(node.state.clone(), id);
                    return Admission::Inserted;
                };
                let existing_node = arena.get(existing);
                let ordering = match comparator {
                    Some(cmp) => Some(cmp(node, existing_node)),
                    None => frontier.compare(node, existing_node),
                };
                if ordering != Some(Ordering::Less) {
                    return Admission::DroppedDominated;
                }
                let removed = frontier.remove(existing);
                debug_assert!(removed, "frontier lost entry {existing} of an indexed state");
                frontier.push(id, node);
                index.insert(node.state.clone(), id);
                Admission::Replaced { evicted: existing }
            }
        }
    }

    /// Remove the next node to expand and mark its state explored.
    ///
    /// Returns `None` only if the frontier holds no expandable node.
    pub fn remove_from_frontier<F>(
        &mut self,
        arena: &NodeArena<S, A>,
        frontier: &mut F,
    ) -> Option<NodeId>
    where
        F: Frontier<S, A> + ?Sized,
    {
        match self {
            Self::Tree => frontier.pop(),
            Self::Graph { explored } => {
                discard_explored_head(explored, arena, frontier);
                let id = frontier.pop()?;
                explored.insert(arena.get(id).state.clone());
                Some(id)
            }
            Self::ReducedFrontier {
                explored, index, ..
            } => {
                let id = frontier.pop()?;
                let state = &arena.get(id).state;
                index.remove(state);
                explored.insert(state.clone());
                Some(id)
            }
        }
    }

    /// Whether the frontier holds no expandable node.
    pub fn is_frontier_empty<F>(&mut self, arena: &NodeArena<S, A>, frontier: &mut F) -> bool
    where
        F: Frontier<S, A> + ?Sized,
    {
        if let Self::Graph { explored } = self {
            discard_explored_head(explored, arena, frontier);
        }
        frontier.is_empty()
    }
}

/// Pop head nodes whose state was expanded after they were queued.
fn discard_explored_head<S, A, F>(explored: &HashSet<S>, arena: &NodeArena<S, A>, frontier: &mut F)
where
    S: Eq + Hash,
    F: Frontier<S, A> + ?Sized,
{
    while let Some(head) = frontier.peek() {
        if !explored.contains(&arena.get(head).state) {
            break;
        }
        frontier.pop();
    }
}

impl<S, A> std::fmt::Debug for QueueStrategy<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tree => f.write_str("Tree"),
            Self::Graph { explored } => f
                .debug_struct("Graph")
                .field("explored", &explored.len())
                .finish(),
            Self::ReducedFrontier {
                explored,
                index,
                comparator,
            } => f
                .debug_struct("ReducedFrontier")
                .field("explored", &explored.len())
                .field("index", &index.len())
                .field("comparator", &comparator.is_some())
                .finish(),
        }
    }
}
