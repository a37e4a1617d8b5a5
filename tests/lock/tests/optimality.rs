//! Route-map locks: cost-optimality of uniform-cost and A* search, and the
//! exact routes every ordering returns on the Romania map.

use std::rc::Rc;

use lock_tests::{init_logging, run};
use waymark_harness::contract::SearchWorld;
use waymark_harness::runner::FrontierOrdering;
use waymark_harness::worlds::route_map::{abc_triangle, romania, RouteMap};
use waymark_search::algorithms::QueueBasedSearch;
use waymark_search::search::verify_solution;
use waymark_search::strategy::{DuplicatePolicy, QueueStrategy};

fn route(cities: &[&str]) -> Vec<String> {
    cities.iter().map(ToString::to_string).collect()
}

// ---------------------------------------------------------------------------
// A–B–C triangle
// ---------------------------------------------------------------------------

#[test]
fn uniform_cost_takes_cheap_detour() {
    init_logging();
    let mut ucs = QueueBasedSearch::uniform_cost(QueueStrategy::reduced_frontier());
    let node = ucs.find_node(&abc_triangle()).unwrap().unwrap();
    assert_eq!(node.path_cost, 3);
    assert_eq!(ucs.find_actions(&abc_triangle()).unwrap(), Some(route(&["B", "C"])));
    assert_eq!(ucs.metrics().nodes_expanded, 2);
}

#[test]
fn every_strategy_finds_cost_three_under_uniform_cost() {
    let expected_expansions = [
        (DuplicatePolicy::Tree, 3),
        (DuplicatePolicy::Graph, 2),
        (DuplicatePolicy::ReducedFrontier, 2),
    ];
    for (dup, expansions) in expected_expansions {
        let run = run(&abc_triangle(), FrontierOrdering::UniformCost, dup);
        assert_eq!(run.outcome.metrics.path_cost, Some(3), "{dup:?}");
        assert_eq!(run.outcome.metrics.nodes_expanded, expansions, "{dup:?}");
    }
}

#[test]
fn breadth_first_takes_direct_road() {
    let run = run(&abc_triangle(), FrontierOrdering::BreadthFirst, DuplicatePolicy::Graph);
    assert_eq!(run.outcome.actions(), Some(route(&["C"])));
    assert_eq!(run.outcome.metrics.path_cost, Some(5));
}

// ---------------------------------------------------------------------------
// Romania
// ---------------------------------------------------------------------------

const OPTIMAL: &[&str] = &["Sibiu", "RimnicuVilcea", "Pitesti", "Bucharest"];
const VIA_FAGARAS: &[&str] = &["Sibiu", "Fagaras", "Bucharest"];

#[test]
fn romania_routes_per_ordering() {
    let map = romania();
    let cases: [(FrontierOrdering, &[&str], i64, u64); 4] = [
        (FrontierOrdering::UniformCost, OPTIMAL, 418, 12),
        (FrontierOrdering::AStar, OPTIMAL, 418, 5),
        (FrontierOrdering::Greedy, VIA_FAGARAS, 450, 3),
        (FrontierOrdering::BreadthFirst, VIA_FAGARAS, 450, 6),
    ];
    for dup in [DuplicatePolicy::Graph, DuplicatePolicy::ReducedFrontier] {
        for (ordering, cities, cost, expansions) in cases {
            let run = run(&map, ordering, dup);
            assert_eq!(run.outcome.actions(), Some(route(cities)), "{ordering:?}/{dup:?}");
            assert_eq!(run.outcome.metrics.path_cost, Some(cost), "{ordering:?}/{dup:?}");
            assert_eq!(run.outcome.metrics.nodes_expanded, expansions, "{ordering:?}/{dup:?}");
        }
    }
}

#[test]
fn depth_first_dives_down_the_last_road() {
    let run = run(&romania(), FrontierOrdering::DepthFirst, DuplicatePolicy::Graph);
    assert_eq!(
        run.outcome.actions(),
        Some(route(&[
            "Timisoara",
            "Lugoj",
            "Mehadia",
            "Drobeta",
            "Craiova",
            "Pitesti",
            "Bucharest"
        ]))
    );
    assert_eq!(run.outcome.metrics.path_cost, Some(733));
    assert_eq!(run.outcome.metrics.nodes_expanded, 7);
}

#[test]
fn astar_tree_search_is_optimal_with_admissible_heuristic() {
    let run = run(&romania(), FrontierOrdering::AStar, DuplicatePolicy::Tree);
    assert_eq!(run.outcome.actions(), Some(route(OPTIMAL)));
    assert_eq!(run.outcome.metrics.nodes_expanded, 5);
}

#[test]
fn breadth_first_tree_search_matches_graph_route() {
    let run = run(&romania(), FrontierOrdering::BreadthFirst, DuplicatePolicy::Tree);
    assert_eq!(run.outcome.actions(), Some(route(VIA_FAGARAS)));
    assert_eq!(run.outcome.metrics.nodes_expanded, 9);
}

#[test]
fn solution_cost_matches_map_distance() {
    let map = romania();
    for ordering in FrontierOrdering::ALL {
        let run = run(&map, ordering, DuplicatePolicy::ReducedFrontier);
        let actions = run.outcome.actions().unwrap();
        assert_eq!(map.route_length(&actions), run.outcome.metrics.path_cost);
        assert_eq!(verify_solution(&map, &actions).unwrap(), "Bucharest");
    }
}

#[test]
fn astar_front_end_matches_harness_run() {
    init_logging();
    let map = romania();
    let h_map: RouteMap = map.clone();
    let mut astar = QueueBasedSearch::astar(
        QueueStrategy::reduced_frontier(),
        Rc::new(move |city: &String| h_map.heuristic(city)),
    );
    let front_end = astar.find_actions(&map).unwrap();
    let harness = run(&map, FrontierOrdering::AStar, DuplicatePolicy::ReducedFrontier);
    assert_eq!(front_end, harness.outcome.actions());
    assert_eq!(astar.metrics().nodes_expanded, harness.outcome.metrics.nodes_expanded);
}

#[test]
fn reverse_route_is_as_cheap() {
    let map = romania().with_route("Bucharest", "Arad");
    let run = run(&map, FrontierOrdering::UniformCost, DuplicatePolicy::ReducedFrontier);
    assert_eq!(run.outcome.metrics.path_cost, Some(418));
    assert_eq!(run.outcome.goal_state().map(String::as_str), Some("Arad"));
}
