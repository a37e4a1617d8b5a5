//! World contract: what a fixture world must provide to be run by the
//! harness runner.
//!
//! A world is a [`Problem`] plus an identity, a fixture description and an
//! optional heuristic. Worlds do NOT hash, bundle, or verify anything; those
//! are runner concerns.

use waymark_search::problem::{PathCost, Problem};

/// A search problem the harness can run and bundle.
///
/// The runner additionally requires `Action: PartialEq` so it can replay a
/// solution against `Problem::actions()`.
pub trait SearchWorld: Problem {
    /// Unique world identifier (e.g., `"eight_puzzle"`).
    fn world_id(&self) -> &str;

    /// Instance parameters as JSON (integers, strings, booleans only).
    ///
    /// Two worlds with the same id and fixture must define the same problem;
    /// the runner binds the fixture's digest into the verification report.
    fn fixture(&self) -> serde_json::Value;

    /// Admissible estimate of the remaining cost from `state`. Defaults to 0,
    /// which turns A* into uniform-cost search.
    fn heuristic(&self, _state: &Self::State) -> PathCost {
        0
    }
}
