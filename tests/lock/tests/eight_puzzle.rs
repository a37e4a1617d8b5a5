//! 8-puzzle locks: solution shape, per-ordering expansion counts, and the
//! expansion cap on an unsolvable board.

use lock_tests::{init_logging, run};
use waymark_harness::runner::{run_world, FrontierOrdering, RunConfig};
use waymark_harness::worlds::eight_puzzle::{EightPuzzle, Move, GOAL};
use waymark_search::frontier::FifoFrontier;
use waymark_search::metrics::Termination;
use waymark_search::policy::SearchPolicy;
use waymark_search::search::{verify_solution, QueueSearch};
use waymark_search::strategy::{DuplicatePolicy, QueueStrategy};

const SIX_MOVES: [u8; 9] = [1, 3, 4, 8, 0, 5, 7, 2, 6];
const FIVE_MOVES: [u8; 9] = [2, 8, 3, 1, 6, 4, 7, 0, 5];
const UNSOLVABLE: [u8; 9] = [8, 1, 3, 4, 0, 2, 7, 6, 5];

#[test]
fn breadth_first_solution_is_consistent() {
    let puzzle = EightPuzzle::new(SIX_MOVES);
    let outcome = run(&puzzle, FrontierOrdering::BreadthFirst, DuplicatePolicy::Graph).outcome;

    assert!(outcome.is_goal_reached());
    assert_eq!(outcome.goal_state(), Some(&GOAL));
    let actions = outcome.actions().unwrap();
    assert_eq!(outcome.metrics.path_cost, Some(i64::try_from(actions.len()).unwrap()));
    let trace = outcome.trace.as_ref().unwrap();
    assert_eq!(outcome.metrics.nodes_expanded, trace.expansions.len() as u64);
    assert_eq!(verify_solution(&puzzle, &actions).unwrap(), GOAL);
}

#[test]
fn breadth_first_finds_shortest_sequence() {
    use Move::{Down, Left, Right, Up};
    let puzzle = EightPuzzle::new(SIX_MOVES);
    for dup in [DuplicatePolicy::Graph, DuplicatePolicy::ReducedFrontier] {
        let outcome = run(&puzzle, FrontierOrdering::BreadthFirst, dup).outcome;
        assert_eq!(outcome.actions(), Some(vec![Down, Right, Up, Up, Left, Down]));
        assert_eq!(outcome.metrics.nodes_expanded, 50);
    }
    let tree = run(&puzzle, FrontierOrdering::BreadthFirst, DuplicatePolicy::Tree).outcome;
    assert_eq!(tree.metrics.path_cost, Some(6));
    assert_eq!(tree.metrics.nodes_expanded, 259);
}

#[test]
fn informed_orderings_expand_fewer_nodes() {
    let puzzle = EightPuzzle::new(SIX_MOVES);
    let expansions = |ordering| {
        run(&puzzle, ordering, DuplicatePolicy::ReducedFrontier)
            .outcome
            .metrics
            .nodes_expanded
    };
    assert_eq!(expansions(FrontierOrdering::UniformCost), 93);
    assert_eq!(expansions(FrontierOrdering::AStar), 6);
    assert_eq!(expansions(FrontierOrdering::Greedy), 6);
}

#[test]
fn five_move_instance_per_ordering() {
    use Move::{Down, Left, Right, Up};
    let puzzle = EightPuzzle::new(FIVE_MOVES);
    let cases = [
        (FrontierOrdering::BreadthFirst, 20),
        (FrontierOrdering::UniformCost, 34),
        (FrontierOrdering::AStar, 5),
        (FrontierOrdering::Greedy, 5),
    ];
    for (ordering, expansions) in cases {
        let outcome = run(&puzzle, ordering, DuplicatePolicy::Graph).outcome;
        assert_eq!(outcome.actions(), Some(vec![Up, Up, Left, Down, Right]), "{ordering:?}");
        assert_eq!(outcome.metrics.nodes_expanded, expansions, "{ordering:?}");
    }
}

#[test]
fn unsolvable_board_runs_into_expansion_cap() {
    init_logging();
    let puzzle = EightPuzzle::new(UNSOLVABLE);
    assert!(!puzzle.is_solvable());

    let policy = SearchPolicy::default().with_max_expansions(2000);
    let mut search = QueueSearch::with_policy(QueueStrategy::graph(), policy.clone());
    let outcome = search.run(&puzzle, &mut FifoFrontier::new()).unwrap();
    assert_eq!(outcome.termination, Termination::Cancelled);
    assert_eq!(outcome.goal, None);
    assert_eq!(outcome.metrics.nodes_expanded, 2000);
    assert_eq!(outcome.metrics.path_cost, None);

    // The harness still bundles a cancelled run.
    let config = RunConfig::new(FrontierOrdering::BreadthFirst, DuplicatePolicy::Graph).with_policy(policy);
    let run = run_world(&puzzle, &config).unwrap();
    let solution = run.bundle.json("solution.json").unwrap();
    assert_eq!(solution["goal_reached"], false);
    assert_eq!(solution["termination"], "cancelled");
    assert_eq!(solution["nodes_expanded"], 2000);
}
