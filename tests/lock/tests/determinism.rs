//! In-process determinism locks: repeated runs produce byte-identical
//! traces and bundle digests, and the digests move when the run does.

use lock_tests::run;
use waymark_harness::runner::FrontierOrdering;
use waymark_harness::worlds::eight_puzzle::EightPuzzle;
use waymark_harness::worlds::n_queens::NQueens;
use waymark_harness::worlds::route_map::romania;
use waymark_search::strategy::DuplicatePolicy;

const GRAPH_POLICIES: [DuplicatePolicy; 2] = [DuplicatePolicy::Graph, DuplicatePolicy::ReducedFrontier];

// ---------------------------------------------------------------------------
// Repeated runs
// ---------------------------------------------------------------------------

#[test]
fn trace_bytes_identical_across_runs_n10() {
    let map = romania();
    for ordering in FrontierOrdering::ALL {
        for dup in GRAPH_POLICIES {
            let first = run(&map, ordering, dup);
            let first_trace = first.outcome.trace.as_ref().unwrap().to_canonical_json_bytes().unwrap();
            for _ in 1..10 {
                let other = run(&map, ordering, dup);
                let other_trace = other.outcome.trace.as_ref().unwrap().to_canonical_json_bytes().unwrap();
                assert_eq!(first_trace, other_trace, "{ordering:?}/{dup:?} trace differs");
                assert_eq!(first.bundle.digest, other.bundle.digest);
            }
        }
    }
}

#[test]
fn bundle_digest_stable_on_eight_puzzle() {
    let puzzle = EightPuzzle::new([1, 3, 4, 8, 0, 5, 7, 2, 6]);
    for ordering in [FrontierOrdering::BreadthFirst, FrontierOrdering::AStar] {
        let a = run(&puzzle, ordering, DuplicatePolicy::Graph);
        let b = run(&puzzle, ordering, DuplicatePolicy::Graph);
        assert_eq!(a.bundle.digest, b.bundle.digest);
        assert_eq!(
            a.outcome.trace.as_ref().unwrap().digest().unwrap(),
            b.outcome.trace.as_ref().unwrap().digest().unwrap()
        );
    }
}

// ---------------------------------------------------------------------------
// Digest sensitivity
// ---------------------------------------------------------------------------

#[test]
fn digest_distinguishes_orderings() {
    let map = romania();
    let digests: Vec<_> = FrontierOrdering::ALL
        .iter()
        .map(|&o| run(&map, o, DuplicatePolicy::Graph).bundle.digest)
        .collect();
    for (i, a) in digests.iter().enumerate() {
        for b in &digests[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn digest_distinguishes_worlds() {
    let a = run(&NQueens::new(5), FrontierOrdering::DepthFirst, DuplicatePolicy::Tree);
    let b = run(&NQueens::new(6), FrontierOrdering::DepthFirst, DuplicatePolicy::Tree);
    assert_ne!(a.bundle.digest, b.bundle.digest);
    assert_ne!(
        a.bundle.artifacts["fixture.json"].content_hash,
        b.bundle.artifacts["fixture.json"].content_hash
    );
}

#[test]
fn wall_clock_only_reaches_observational_artifacts() {
    // metrics.json carries time_taken; it is excluded from the digest basis.
    let puzzle = EightPuzzle::new([2, 8, 3, 1, 6, 4, 7, 0, 5]);
    let run = run(&puzzle, FrontierOrdering::UniformCost, DuplicatePolicy::ReducedFrontier);
    let basis: serde_json::Value = serde_json::from_slice(&run.bundle.digest_basis).unwrap();
    let names: Vec<&str> = basis["artifacts"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["name"].as_str())
        .collect();
    assert!(!names.contains(&"metrics.json"));
    assert_eq!(names.len(), 5);
    let manifest: serde_json::Value = serde_json::from_slice(&run.bundle.manifest).unwrap();
    assert_eq!(manifest["artifacts"].as_array().unwrap().len(), 6);
}
