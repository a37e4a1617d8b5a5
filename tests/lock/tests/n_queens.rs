//! N-queens locks: incremental placement under every ordering, and the
//! depth-limited family on the same space.

use lock_tests::{init_logging, run};
use waymark_harness::runner::FrontierOrdering;
use waymark_harness::worlds::n_queens::NQueens;
use waymark_search::depth_limited::{DepthLimitedResult, DepthLimitedSearch, IterativeDeepeningSearch};
use waymark_search::frontier::{FifoFrontier, LifoFrontier};
use waymark_search::metrics::Termination;
use waymark_search::policy::SearchPolicy;
use waymark_search::search::QueueSearch;
use waymark_search::strategy::{DuplicatePolicy, QueueStrategy};

#[test]
fn eight_queens_breadth_first() {
    init_logging();
    let queens = NQueens::new(8);

    let run = run(&queens, FrontierOrdering::BreadthFirst, DuplicatePolicy::Tree);
    assert_eq!(run.outcome.actions(), Some(vec![0, 4, 7, 5, 2, 6, 1, 3]));
    assert_eq!(run.outcome.metrics.nodes_expanded, 1665);

    // Without the early goal test the last layer is expanded before the goal
    // is recognised.
    let policy = SearchPolicy::default();
    let mut late = QueueSearch::with_policy(QueueStrategy::tree(), policy);
    let outcome = late.run(&queens, &mut FifoFrontier::new()).unwrap();
    assert_eq!(outcome.actions(), Some(vec![0, 4, 7, 5, 2, 6, 1, 3]));
    assert_eq!(outcome.metrics.nodes_expanded, 1965);
}

#[test]
fn eight_queens_depth_first() {
    init_logging();
    let queens = NQueens::new(8);
    let mut search = QueueSearch::new(QueueStrategy::tree());
    let outcome = search.run(&queens, &mut LifoFrontier::new()).unwrap();
    let placement = outcome.actions().unwrap();
    assert_eq!(placement, vec![7, 3, 0, 2, 5, 1, 6, 4]);
    assert!(queens.is_solution(&placement));
    assert_eq!(outcome.metrics.nodes_expanded, 113);
}

#[test]
fn every_ordering_places_every_queen() {
    let queens = NQueens::new(6);
    for ordering in FrontierOrdering::ALL {
        let run = run(&queens, ordering, DuplicatePolicy::Tree);
        let placement = run.outcome.goal_state().unwrap();
        assert_eq!(placement.len(), 6);
        assert!(queens.is_solution(placement), "{ordering:?}: {placement:?}");
        assert_eq!(run.outcome.metrics.path_cost, Some(6));
    }
}

#[test]
fn three_queens_has_no_solution() {
    for dup in [DuplicatePolicy::Tree, DuplicatePolicy::Graph] {
        let run = run(&NQueens::new(3), FrontierOrdering::DepthFirst, dup);
        assert_eq!(run.outcome.termination, Termination::FrontierExhausted);
        assert_eq!(run.outcome.goal, None);
        assert_eq!(run.outcome.metrics.nodes_expanded, 6);
        let solution = run.bundle.json("solution.json").unwrap();
        assert_eq!(solution["goal_reached"], false);
        assert_eq!(solution["actions"], serde_json::json!([]));
        assert!(solution["final_state"].is_null());
    }
}

// ---------------------------------------------------------------------------
// Depth-limited and iterative deepening
// ---------------------------------------------------------------------------

#[test]
fn depth_limit_distinguishes_cutoff_from_failure() {
    init_logging();
    let queens = NQueens::new(3);

    let mut shallow = DepthLimitedSearch::new(1);
    let outcome = shallow.run(&queens).unwrap();
    assert_eq!(outcome.result, DepthLimitedResult::Cutoff);
    assert_eq!(outcome.metrics.termination, Some(Termination::DepthCutoff));

    let mut deep = DepthLimitedSearch::new(3);
    let outcome = deep.run(&queens).unwrap();
    assert_eq!(outcome.result, DepthLimitedResult::Failure);
    assert_eq!(outcome.metrics.termination, Some(Termination::FrontierExhausted));
    assert_eq!(outcome.actions(), None);
}

#[test]
fn depth_limit_at_board_size_solves() {
    let queens = NQueens::new(8);
    let mut search = DepthLimitedSearch::new(8);
    let outcome = search.run(&queens).unwrap();
    let placement = outcome.actions().unwrap();
    assert!(queens.is_solution(&placement));
    assert_eq!(outcome.metrics.path_cost, Some(8));
    // Only the root-to-goal path survives the pass.
    assert_eq!(outcome.nodes.len(), 9);
}

#[test]
fn iterative_deepening_finds_first_solution() {
    init_logging();
    let queens = NQueens::new(8);
    let mut ids = IterativeDeepeningSearch::new();
    let outcome = ids.run(&queens).unwrap();
    assert_eq!(outcome.actions(), Some(vec![0, 4, 7, 5, 2, 6, 1, 3]));
    assert_eq!(outcome.metrics.termination, Some(Termination::GoalReached));
}

#[test]
fn iterative_deepening_respects_max_limit() {
    let mut ids = IterativeDeepeningSearch::new().with_max_limit(4);
    let outcome = ids.run(&NQueens::new(8)).unwrap();
    assert_eq!(outcome.result, DepthLimitedResult::Cutoff);
    assert_eq!(outcome.metrics.termination, Some(Termination::DepthCutoff));
    assert_eq!(outcome.actions(), None);
}

#[test]
fn iterative_deepening_cancels_on_budget() {
    let mut ids = IterativeDeepeningSearch::new();
    let outcome = ids.run_until(&NQueens::new(8), |m| m.nodes_expanded < 50).unwrap();
    assert_eq!(outcome.result, DepthLimitedResult::Cutoff);
    assert_eq!(outcome.metrics.termination, Some(Termination::Cancelled));
}
