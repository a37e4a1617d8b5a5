//! Duplicate-handling strategy locks: agreement on acyclic spaces,
//! termination on cyclic ones, and the per-strategy frontier invariants.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use lock_tests::{expanded_states, init_logging, run};
use waymark_harness::runner::FrontierOrdering;
use waymark_harness::worlds::eight_puzzle::EightPuzzle;
use waymark_harness::worlds::n_queens::NQueens;
use waymark_harness::worlds::ring::Ring;
use waymark_harness::worlds::route_map::romania;
use waymark_search::frontier::{FifoFrontier, Frontier, PriorityFrontier};
use waymark_search::metrics::Termination;
use waymark_search::node::{Node, NodeId};
use waymark_search::policy::SearchPolicy;
use waymark_search::search::QueueSearch;
use waymark_search::strategy::{DuplicatePolicy, QueueStrategy};

const ALL_POLICIES: [DuplicatePolicy; 3] = [
    DuplicatePolicy::Tree,
    DuplicatePolicy::Graph,
    DuplicatePolicy::ReducedFrontier,
];

/// Frontier wrapper counting live entries per state.
struct Audited<F, S> {
    inner: F,
    states: HashMap<NodeId, S>,
    live: HashMap<S, usize>,
    max_per_state: usize,
}

impl<F, S> Audited<F, S> {
    fn new(inner: F) -> Self {
        Self {
            inner,
            states: HashMap::new(),
            live: HashMap::new(),
            max_per_state: 0,
        }
    }
}

impl<F, S, A> Frontier<S, A> for Audited<F, S>
where
    F: Frontier<S, A>,
    S: Clone + Eq + Hash,
{
    fn push(&mut self, id: NodeId, node: &Node<S, A>) {
        self.inner.push(id, node);
        self.states.insert(id, node.state.clone());
        let count = self.live.entry(node.state.clone()).or_insert(0);
        *count += 1;
        self.max_per_state = self.max_per_state.max(*count);
    }

    fn pop(&mut self) -> Option<NodeId> {
        let id = self.inner.pop()?;
        if let Some(state) = self.states.remove(&id) {
            *self.live.entry(state).or_insert(1) -= 1;
        }
        Some(id)
    }

    fn peek(&self) -> Option<NodeId> {
        self.inner.peek()
    }

    fn remove(&mut self, id: NodeId) -> bool {
        let removed = self.inner.remove(id);
        if removed {
            if let Some(state) = self.states.remove(&id) {
                *self.live.entry(state).or_insert(1) -= 1;
            }
        }
        removed
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn clear(&mut self) {
        self.inner.clear();
        self.states.clear();
        self.live.clear();
    }

    fn compare(&self, a: &Node<S, A>, b: &Node<S, A>) -> Option<Ordering> {
        self.inner.compare(a, b)
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }
}

// ---------------------------------------------------------------------------
// Acyclic spaces: all strategies agree
// ---------------------------------------------------------------------------

#[test]
fn strategies_agree_on_acyclic_space() {
    let queens = NQueens::new(6);
    for ordering in [
        FrontierOrdering::BreadthFirst,
        FrontierOrdering::DepthFirst,
        FrontierOrdering::UniformCost,
    ] {
        let goals: Vec<_> = ALL_POLICIES
            .iter()
            .map(|&dup| run(&queens, ordering, dup).outcome.actions())
            .collect();
        assert!(goals[0].is_some(), "{ordering:?} found no solution");
        assert!(
            goals.iter().all(|g| *g == goals[0]),
            "{ordering:?}: strategies disagree: {goals:?}"
        );
    }
}

#[test]
fn six_queens_goals_per_ordering() {
    let queens = NQueens::new(6);
    for dup in ALL_POLICIES {
        let bfs = run(&queens, FrontierOrdering::BreadthFirst, dup);
        assert_eq!(bfs.outcome.actions(), Some(vec![1, 3, 5, 0, 2, 4]));
        assert_eq!(bfs.outcome.metrics.nodes_expanded, 114);

        let dfs = run(&queens, FrontierOrdering::DepthFirst, dup);
        assert_eq!(dfs.outcome.actions(), Some(vec![4, 2, 0, 5, 3, 1]));
        assert_eq!(dfs.outcome.metrics.nodes_expanded, 31);

        let ucs = run(&queens, FrontierOrdering::UniformCost, dup);
        assert_eq!(ucs.outcome.actions(), Some(vec![1, 3, 5, 0, 2, 4]));
        assert_eq!(ucs.outcome.metrics.nodes_expanded, 149);
    }
}

// ---------------------------------------------------------------------------
// Cyclic spaces: tree search needs a cap, graph searches terminate
// ---------------------------------------------------------------------------

#[test]
fn tree_search_on_ring_hits_expansion_cap() {
    init_logging();
    let policy = SearchPolicy::default().with_max_expansions(100);
    let mut search = QueueSearch::with_policy(QueueStrategy::tree(), policy);
    let outcome = search.run(&Ring::new(6), &mut FifoFrontier::new()).unwrap();
    assert_eq!(outcome.termination, Termination::Cancelled);
    assert_eq!(outcome.goal, None);
    assert_eq!(outcome.metrics.nodes_expanded, 100);
}

#[test]
fn graph_strategies_exhaust_ring() {
    for dup in [DuplicatePolicy::Graph, DuplicatePolicy::ReducedFrontier] {
        for ordering in [FrontierOrdering::BreadthFirst, FrontierOrdering::DepthFirst] {
            let outcome = run(&Ring::new(6), ordering, dup).outcome;
            assert_eq!(outcome.termination, Termination::FrontierExhausted);
            assert_eq!(outcome.metrics.nodes_expanded, 6, "{dup:?}/{ordering:?}");
            assert_eq!(outcome.metrics.queue_size, 0);
        }
    }
}

#[test]
fn graph_search_reaches_ring_goal_either_way_round() {
    let ring = Ring::new(6).with_goal(4);
    let run = run(&ring, FrontierOrdering::BreadthFirst, DuplicatePolicy::Graph);
    // Prev twice is shorter than Next four times.
    assert_eq!(
        run.outcome.actions().map(|a| a.len()),
        Some(2),
        "got {:?}",
        run.outcome.actions()
    );
}

// ---------------------------------------------------------------------------
// Explored-set invariant: no state is expanded twice
// ---------------------------------------------------------------------------

#[test]
fn graph_strategies_expand_each_state_once() {
    let puzzle = EightPuzzle::new([1, 3, 4, 8, 0, 5, 7, 2, 6]);
    for dup in [DuplicatePolicy::Graph, DuplicatePolicy::ReducedFrontier] {
        for ordering in FrontierOrdering::ALL {
            if ordering == FrontierOrdering::DepthFirst {
                continue;
            }
            let outcome = run(&puzzle, ordering, dup).outcome;
            let states = expanded_states(&outcome);
            let unique: HashSet<_> = states.iter().collect();
            assert_eq!(unique.len(), states.len(), "{dup:?}/{ordering:?} re-expanded a state");
        }
    }
}

#[test]
fn tree_search_re_expands_states() {
    let outcome = run(&romania(), FrontierOrdering::BreadthFirst, DuplicatePolicy::Tree).outcome;
    let states = expanded_states(&outcome);
    let unique: HashSet<_> = states.iter().collect();
    assert!(unique.len() < states.len());
}

// ---------------------------------------------------------------------------
// Reduced-frontier invariant: at most one frontier node per state
// ---------------------------------------------------------------------------

#[test]
fn reduced_frontier_holds_one_node_per_state() {
    init_logging();
    let map = romania();

    let mut reduced = QueueSearch::new(QueueStrategy::reduced_frontier());
    let mut frontier = Audited::new(PriorityFrontier::by_path_cost());
    let outcome = reduced.run(&map, &mut frontier).unwrap();
    assert_eq!(outcome.metrics.path_cost, Some(418));
    assert_eq!(frontier.max_per_state, 1);

    // The plain explored-set strategy does queue the same city twice.
    let mut graph = QueueSearch::new(QueueStrategy::graph());
    let mut frontier = Audited::new(PriorityFrontier::by_path_cost());
    graph.run(&map, &mut frontier).unwrap();
    assert!(frontier.max_per_state >= 2);
}

#[test]
fn reduced_frontier_invariant_on_eight_puzzle() {
    init_logging();
    let puzzle = EightPuzzle::new([1, 3, 4, 8, 0, 5, 7, 2, 6]);
    let mut search = QueueSearch::new(QueueStrategy::reduced_frontier());
    let mut frontier = Audited::new(PriorityFrontier::by_path_cost());
    let outcome = search.run(&puzzle, &mut frontier).unwrap();
    assert_eq!(outcome.metrics.path_cost, Some(6));
    assert_eq!(outcome.metrics.nodes_expanded, 93);
    assert_eq!(frontier.max_per_state, 1);
}
