//! Shared helpers for waymark benchmark suites.

use std::rc::Rc;

use waymark_harness::runner::{FrontierOrdering, RunConfig};
use waymark_harness::worlds::eight_puzzle::{Board, EightPuzzle, Move};
use waymark_search::algorithms::{Heuristic, QueueBasedSearch};
use waymark_search::search::SearchOutcome;
use waymark_search::strategy::{DuplicatePolicy, QueueStrategy};

/// A named 8-puzzle instance with an optional expansion cap.
pub struct Regime {
    pub name: &'static str,
    pub puzzle: EightPuzzle,
    pub max_expansions: Option<u64>,
}

/// The benchmark regimes: two solvable boards of increasing depth and one
/// unsolvable board that runs into its cap.
#[must_use]
pub fn regimes() -> Vec<Regime> {
    vec![
        Regime {
            name: "five_moves",
            puzzle: EightPuzzle::new([2, 8, 3, 1, 6, 4, 7, 0, 5]),
            max_expansions: None,
        },
        Regime {
            name: "six_moves",
            puzzle: EightPuzzle::new([1, 3, 4, 8, 0, 5, 7, 2, 6]),
            max_expansions: None,
        },
        Regime {
            name: "unsolvable_capped",
            puzzle: EightPuzzle::new([8, 1, 3, 4, 0, 2, 7, 6, 5]),
            max_expansions: Some(2000),
        },
    ]
}

/// Run configuration for a regime: the ordering's default policy plus the
/// regime's cap.
#[must_use]
pub fn run_config(regime: &Regime, ordering: FrontierOrdering, duplicates: DuplicatePolicy) -> RunConfig {
    let config = RunConfig::new(ordering, duplicates);
    match regime.max_expansions {
        Some(cap) => {
            let policy = config.policy.clone().with_max_expansions(cap);
            config.with_policy(policy)
        }
        None => config,
    }
}

/// Search only: no trace, no replay, no bundle.
///
/// # Panics
///
/// Panics if the search fails. Benchmark runs are expected to succeed.
#[must_use]
pub fn search_only(regime: &Regime, ordering: FrontierOrdering, duplicates: DuplicatePolicy) -> SearchOutcome<Board, Move> {
    let strategy = QueueStrategy::from_policy(duplicates);
    let puzzle = regime.puzzle.clone();
    let h: Heuristic<Board> = Rc::new(move |board: &Board| puzzle.manhattan(board));
    let search = match ordering {
        FrontierOrdering::BreadthFirst => QueueBasedSearch::breadth_first(strategy),
        FrontierOrdering::DepthFirst => QueueBasedSearch::depth_first(strategy),
        FrontierOrdering::UniformCost => QueueBasedSearch::uniform_cost(strategy),
        FrontierOrdering::Greedy => QueueBasedSearch::greedy_best_first(strategy, h),
        FrontierOrdering::AStar => QueueBasedSearch::astar(strategy, h),
    };
    let config = run_config(regime, ordering, duplicates);
    search
        .with_policy(config.policy)
        .search(&regime.puzzle)
        .expect("search should succeed in benchmarks")
}
