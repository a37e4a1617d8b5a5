//! Harness runner: search a world, verify the solution, bundle the evidence.
//!
//! `run_world` runs one fixture world under a [`RunConfig`], replays any
//! solution it finds against the world, and packages the run as an
//! [`ArtifactBundle`]:
//!
//! | Artifact                   | Normative | Content                              |
//! |----------------------------|-----------|--------------------------------------|
//! | `fixture.json`             | yes       | world id and instance parameters     |
//! | `search_policy.json`       | yes       | ordering, duplicate policy, budgets  |
//! | `search_trace.json`        | yes       | expansion events and counters        |
//! | `solution.json`            | yes       | actions, path cost, termination      |
//! | `verification_report.json` | yes       | digests binding the four above       |
//! | `metrics.json`             | no        | run metrics including wall-clock time |

use std::rc::Rc;

use waymark_search::digest::{
    canonical_json_bytes, content_hash, CanonError, ContentHash, DOMAIN_BUNDLE_ARTIFACT,
};
use waymark_search::error::SearchError;
use waymark_search::frontier::{FifoFrontier, Frontier, LifoFrontier, PriorityFrontier};
use waymark_search::node::Node;
use waymark_search::policy::SearchPolicy;
use waymark_search::search::{verify_solution, QueueSearch, SearchOutcome};
use waymark_search::strategy::{DuplicatePolicy, QueueStrategy};

use crate::bundle::{build_bundle, ArtifactBundle, BundleBuildError};
use crate::contract::SearchWorld;

/// Frontier ordering for a harness run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontierOrdering {
    /// FIFO.
    BreadthFirst,
    /// LIFO.
    DepthFirst,
    /// Priority by path cost `g`.
    UniformCost,
    /// Priority by the world's heuristic `h`.
    Greedy,
    /// Priority by `g + h`.
    AStar,
}

impl FrontierOrdering {
    /// Every ordering, in a fixed order.
    pub const ALL: [Self; 5] = [
        Self::BreadthFirst,
        Self::DepthFirst,
        Self::UniformCost,
        Self::Greedy,
        Self::AStar,
    ];

    /// Stable lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BreadthFirst => "breadth_first",
            Self::DepthFirst => "depth_first",
            Self::UniformCost => "uniform_cost",
            Self::Greedy => "greedy",
            Self::AStar => "astar",
        }
    }
}

/// What to run: ordering, duplicate handling and budgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub ordering: FrontierOrdering,
    pub duplicate_policy: DuplicatePolicy,
    /// Trace recording is forced on by the runner.
    pub policy: SearchPolicy,
}

impl RunConfig {
    /// Config with the default policy. Breadth-first runs get the early
    /// goal test, like `QueueBasedSearch::breadth_first`.
    #[must_use]
    pub fn new(ordering: FrontierOrdering, duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            ordering,
            duplicate_policy,
            policy: SearchPolicy::default()
                .with_early_goal_test(ordering == FrontierOrdering::BreadthFirst),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SearchPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// A finished run: the typed outcome and its bundle.
#[derive(Debug, Clone)]
pub struct WorldRun<S, A> {
    pub outcome: SearchOutcome<S, A>,
    pub bundle: ArtifactBundle,
}

/// Error during a harness run.
#[derive(Debug)]
pub enum RunError {
    /// The search itself failed (policy or problem contract).
    Search(SearchError),
    /// Replaying the found solution against the world failed.
    ReplayFailed(SearchError),
    /// Replay reached a different state than the search's goal node.
    ReplayMismatch { expected: String, actual: String },
    /// The search returned without a trace although one was requested.
    TraceMissing,
    /// Canonical JSON serialization failed.
    CanonFailed { detail: String },
    /// Bundle assembly failed.
    BundleFailed(BundleBuildError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Search(e) => write!(f, "search failed: {e}"),
            Self::ReplayFailed(e) => write!(f, "solution replay failed: {e}"),
            Self::ReplayMismatch { expected, actual } => {
                write!(f, "replay reached {actual}, search goal was {expected}")
            }
            Self::TraceMissing => f.write_str("search returned no trace"),
            Self::CanonFailed { detail } => write!(f, "canonical JSON failed: {detail}"),
            Self::BundleFailed(e) => write!(f, "bundle assembly failed: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Search(e) | Self::ReplayFailed(e) => Some(e),
            Self::BundleFailed(e) => Some(e),
            _ => None,
        }
    }
}

fn canon(value: &serde_json::Value) -> Result<Vec<u8>, RunError> {
    canonical_json_bytes(value).map_err(|e: CanonError| RunError::CanonFailed {
        detail: e.to_string(),
    })
}

/// Run `world` under `config` and bundle the result.
///
/// A run that ends without a goal (exhausted or cancelled) still produces a
/// bundle; `solution.json` then records `goal_reached: false`.
///
/// # Errors
///
/// Returns [`RunError`] if the search fails, the solution does not replay,
/// or bundle assembly fails.
pub fn run_world<W>(world: &W, config: &RunConfig) -> Result<WorldRun<W::State, W::Action>, RunError>
where
    W: SearchWorld + Clone + 'static,
    W::State: 'static,
    W::Action: PartialEq + 'static,
{
    let policy = config.policy.clone().with_trace(true);
    let mut search = QueueSearch::with_policy(
        QueueStrategy::from_policy(config.duplicate_policy),
        policy.clone(),
    );
    let mut frontier = frontier_for(world, config.ordering);
    let outcome = search
        .run(world, frontier.as_mut())
        .map_err(RunError::Search)?;

    // Phase 1: replay the solution independently of the search's nodes.
    let actions = outcome.actions().unwrap_or_default();
    let replayed = match outcome.goal_state() {
        Some(goal) => {
            let reached = verify_solution(world, &actions).map_err(RunError::ReplayFailed)?;
            if reached != *goal {
                return Err(RunError::ReplayMismatch {
                    expected: format!("{goal:?}"),
                    actual: format!("{reached:?}"),
                });
            }
            true
        }
        None => false,
    };

    // Phase 2: normative artifacts.
    let fixture_json = canon(&serde_json::json!({
        "fixture": world.fixture(),
        "schema_version": "fixture.v1",
        "world_id": world.world_id(),
    }))?;
    let policy_json = canon(&search_policy_to_json(config, &policy))?;
    let trace_json = outcome
        .trace
        .as_ref()
        .ok_or(RunError::TraceMissing)?
        .to_canonical_json_bytes()
        .map_err(|e| RunError::CanonFailed {
            detail: e.to_string(),
        })?;
    let solution_json = canon(&serde_json::json!({
        "actions": actions.iter().map(|a| format!("{a:?}")).collect::<Vec<_>>(),
        "final_state": outcome.goal_state().map(|s| format!("{s:?}")),
        "goal_reached": outcome.is_goal_reached(),
        "nodes_expanded": outcome.metrics.nodes_expanded,
        "path_cost": outcome.metrics.path_cost,
        "schema_version": "solution.v1",
        "solution_length": actions.len(),
        "termination": outcome.termination.as_str(),
    }))?;

    let report_json = build_verification_report(
        world.world_id(),
        &artifact_hash(&fixture_json),
        &artifact_hash(&policy_json),
        &artifact_hash(&trace_json),
        &artifact_hash(&solution_json),
        replayed,
    )?;

    // Phase 3: observational artifacts.
    let metrics_json = canon(&outcome.metrics.to_json())?;

    let bundle = build_bundle(vec![
        ("fixture.json".into(), fixture_json, true),
        ("search_policy.json".into(), policy_json, true),
        ("search_trace.json".into(), trace_json, true),
        ("solution.json".into(), solution_json, true),
        ("verification_report.json".into(), report_json, true),
        ("metrics.json".into(), metrics_json, false),
    ])
    .map_err(RunError::BundleFailed)?;

    log::debug!(
        "run {} ({} / {}): {} after {} expansions, bundle {}",
        world.world_id(),
        config.ordering.as_str(),
        config.duplicate_policy.as_str(),
        outcome.termination.as_str(),
        outcome.metrics.nodes_expanded,
        bundle.digest
    );

    Ok(WorldRun { outcome, bundle })
}

fn artifact_hash(bytes: &[u8]) -> ContentHash {
    content_hash(DOMAIN_BUNDLE_ARTIFACT, bytes)
}

/// The frontier for `ordering`; heuristic orderings consult a clone of
/// `world`.
fn frontier_for<W>(world: &W, ordering: FrontierOrdering) -> Box<dyn Frontier<W::State, W::Action>>
where
    W: SearchWorld + Clone + 'static,
    W::State: 'static,
    W::Action: 'static,
{
    match ordering {
        FrontierOrdering::BreadthFirst => Box::new(FifoFrontier::new()),
        FrontierOrdering::DepthFirst => Box::new(LifoFrontier::new()),
        FrontierOrdering::UniformCost => Box::new(PriorityFrontier::by_path_cost()),
        FrontierOrdering::Greedy => {
            let w = world.clone();
            Box::new(PriorityFrontier::new(Rc::new(
                move |n: &Node<W::State, W::Action>| w.heuristic(&n.state),
            )))
        }
        FrontierOrdering::AStar => {
            let w = world.clone();
            Box::new(PriorityFrontier::new(Rc::new(
                move |n: &Node<W::State, W::Action>| n.path_cost.saturating_add(w.heuristic(&n.state)),
            )))
        }
    }
}

/// Serialize a run configuration to JSON for digest binding.
///
/// `policy` is the effective policy (trace recording forced on).
#[must_use]
pub fn search_policy_to_json(config: &RunConfig, policy: &SearchPolicy) -> serde_json::Value {
    serde_json::json!({
        "duplicate_policy": config.duplicate_policy.as_str(),
        "ordering": config.ordering.as_str(),
        "policy": policy.to_json(),
        "schema_version": "search_policy.v1",
    })
}

/// Build the verification report binding the normative artifacts.
fn build_verification_report(
    world_id: &str,
    fixture_hash: &ContentHash,
    policy_hash: &ContentHash,
    trace_hash: &ContentHash,
    solution_hash: &ContentHash,
    replay_verified: bool,
) -> Result<Vec<u8>, RunError> {
    canon(&serde_json::json!({
        // BINDING: verified against fixture.json content_hash.
        "fixture_digest": fixture_hash.as_str(),
        "mode": "search",
        // BINDING: verified against search_policy.json content_hash.
        "policy_digest": policy_hash.as_str(),
        // DIAGNOSTIC: the runner replayed the solution before bundling.
        "replay_verified": replay_verified,
        "schema_version": "verification_report.v1",
        // BINDING: verified against solution.json content_hash.
        "solution_digest": solution_hash.as_str(),
        // BINDING: verified against search_trace.json content_hash.
        "trace_digest": trace_hash.as_str(),
        // BINDING: cross-verified against fixture.json world_id.
        "world_id": world_id,
    }))
}
