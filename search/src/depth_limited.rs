//! Recursive depth-limited search and iterative deepening.
//!
//! Both are tree searches with no explored set. The arena holds only the
//! path from the root to the node being expanded: a child's subtree is
//! truncated away when the recursion backtracks, so memory is linear in the
//! limit. A run distinguishes "no goal within the limit, but the limit cut branches
//! off" ([`DepthLimitedResult::Cutoff`]) from "no goal anywhere below the
//! root" ([`DepthLimitedResult::Failure`]).

use std::time::Instant;

use crate::error::{ProblemStage, SearchError};
use crate::metrics::{Metrics, Termination};
use crate::node::{NodeArena, NodeFactory, NodeId};
use crate::problem::{guarded, Problem};

/// How a depth-limited run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthLimitedResult {
    /// A goal node.
    Found(NodeId),
    /// The limit (or cancellation) stopped at least one branch.
    Cutoff,
    /// The space below the root holds no goal.
    Failure,
}

/// Outcome of a depth-limited or iterative-deepening run.
#[derive(Debug, Clone)]
pub struct DepthLimitedOutcome<S, A> {
    pub result: DepthLimitedResult,
    /// The root-to-goal path of the last iteration, or just the root when
    /// no goal was found.
    pub nodes: NodeArena<S, A>,
    /// Counters as of the end of the run.
    pub metrics: Metrics,
}

impl<S, A: Clone> DepthLimitedOutcome<S, A> {
    /// Actions to the goal, if one was found.
    #[must_use]
    pub fn actions(&self) -> Option<Vec<A>> {
        match self.result {
            DepthLimitedResult::Found(id) => Some(self.nodes.reconstruct_path(id)),
            _ => None,
        }
    }
}

/// Depth-limited tree search.
#[derive(Debug, Clone)]
pub struct DepthLimitedSearch {
    limit: u32,
    metrics: Metrics,
}

impl DepthLimitedSearch {
    /// Search that expands nodes down to depth `limit`.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            metrics: Metrics::default(),
        }
    }

    /// The configured depth limit.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Metrics of the last run.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Search to the configured depth.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when the problem breaks its contract.
    pub fn run<P: Problem>(&mut self, problem: &P) -> Result<DepthLimitedOutcome<P::State, P::Action>, SearchError> {
        self.run_until(problem, |_| true)
    }

    /// Search to the configured depth, treating a `false` from
    /// `should_continue` as a cutoff.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when the problem breaks its contract.
    pub fn run_until<P: Problem>(
        &mut self,
        problem: &P,
        mut should_continue: impl FnMut(&Metrics) -> bool,
    ) -> Result<DepthLimitedOutcome<P::State, P::Action>, SearchError> {
        let started = Instant::now();
        self.metrics.reset();
        let mut arena = NodeArena::new();
        let result = limited(problem, self.limit, &mut arena, &mut self.metrics, &mut should_continue);
        self.metrics.time_taken = started.elapsed();
        let result = result?;
        finish(&mut self.metrics, result, &arena);
        log::debug!(
            "depth-limited search (limit {}): {result:?} after {} expansions",
            self.limit,
            self.metrics.nodes_expanded
        );
        Ok(DepthLimitedOutcome {
            result,
            nodes: arena,
            metrics: self.metrics.clone(),
        })
    }
}

/// Iterative deepening: depth-limited search with limits 0, 1, 2, ...
/// until a run does not end in a cutoff.
#[derive(Debug, Clone, Default)]
pub struct IterativeDeepeningSearch {
    max_limit: Option<u32>,
    metrics: Metrics,
}

impl IterativeDeepeningSearch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop deepening after this limit; the run then ends in
    /// [`DepthLimitedResult::Cutoff`].
    #[must_use]
    pub fn with_max_limit(mut self, limit: u32) -> Self {
        self.max_limit = Some(limit);
        self
    }

    /// Counters summed over all iterations of the last run.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// # Errors
    ///
    /// Returns [`SearchError`] when the problem breaks its contract.
    pub fn run<P: Problem>(&mut self, problem: &P) -> Result<DepthLimitedOutcome<P::State, P::Action>, SearchError> {
        self.run_until(problem, |_| true)
    }

    /// # Errors
    ///
    /// Returns [`SearchError`] when the problem breaks its contract.
    pub fn run_until<P: Problem>(
        &mut self,
        problem: &P,
        mut should_continue: impl FnMut(&Metrics) -> bool,
    ) -> Result<DepthLimitedOutcome<P::State, P::Action>, SearchError> {
        let started = Instant::now();
        self.metrics.reset();
        let mut limit = 0;
        loop {
            let mut arena = NodeArena::new();
            let result = limited(problem, limit, &mut arena, &mut self.metrics, &mut should_continue);
            self.metrics.time_taken = started.elapsed();
            let result = result?;
            log::trace!("iterative deepening: limit {limit} gave {result:?}");
            let cancelled = self.metrics.termination == Some(Termination::Cancelled);
            let last = self.max_limit.is_some_and(|max| limit >= max);
            if result != DepthLimitedResult::Cutoff || cancelled || last {
                finish(&mut self.metrics, result, &arena);
                log::debug!(
                    "iterative deepening: {result:?} at limit {limit} after {} expansions",
                    self.metrics.nodes_expanded
                );
                return Ok(DepthLimitedOutcome {
                    result,
                    nodes: arena,
                    metrics: self.metrics.clone(),
                });
            }
            limit += 1;
        }
    }
}

/// Record the final termination and path cost. A cancelled run keeps
/// `Cancelled`; a limit that cut branches off is `DepthCutoff`.
fn finish<S, A>(metrics: &mut Metrics, result: DepthLimitedResult, arena: &NodeArena<S, A>) {
    match result {
        DepthLimitedResult::Found(id) => {
            metrics.termination = Some(Termination::GoalReached);
            metrics.path_cost = Some(arena.get(id).path_cost);
        }
        _ if metrics.termination == Some(Termination::Cancelled) => {
            log::warn!("depth-limited search cancelled after {} expansions", metrics.nodes_expanded);
        }
        DepthLimitedResult::Cutoff => metrics.termination = Some(Termination::DepthCutoff),
        DepthLimitedResult::Failure => metrics.termination = Some(Termination::FrontierExhausted),
    }
}

/// One depth-limited pass from a fresh root.
fn limited<P: Problem>(
    problem: &P,
    limit: u32,
    arena: &mut NodeArena<P::State, P::Action>,
    metrics: &mut Metrics,
    should_continue: &mut dyn FnMut(&Metrics) -> bool,
) -> Result<DepthLimitedResult, SearchError> {
    let initial = guarded(ProblemStage::InitialState, || problem.initial_state())?;
    let root = NodeFactory.root(arena, initial);
    recurse(problem, root, limit, arena, metrics, should_continue)
}

fn recurse<P: Problem>(
    problem: &P,
    id: NodeId,
    limit: u32,
    arena: &mut NodeArena<P::State, P::Action>,
    metrics: &mut Metrics,
    should_continue: &mut dyn FnMut(&Metrics) -> bool,
) -> Result<DepthLimitedResult, SearchError> {
    if guarded(ProblemStage::IsGoal, || problem.is_goal(&arena.get(id).state))? {
        return Ok(DepthLimitedResult::Found(id));
    }
    if arena.get(id).depth >= limit {
        return Ok(DepthLimitedResult::Cutoff);
    }
    if metrics.termination == Some(Termination::Cancelled) || !should_continue(&*metrics) {
        metrics.termination = Some(Termination::Cancelled);
        return Ok(DepthLimitedResult::Cutoff);
    }

    metrics.nodes_expanded += 1;
    let actions = guarded(ProblemStage::Actions, || problem.actions(&arena.get(id).state))?;
    let mut cutoff = false;
    for action in actions {
        let child = NodeFactory.child(problem, arena, id, action)?;
        metrics.nodes_generated += 1;
        match recurse(problem, child, limit, arena, metrics, should_continue)? {
            DepthLimitedResult::Cutoff => cutoff = true,
            DepthLimitedResult::Failure => {}
            found @ DepthLimitedResult::Found(_) => return Ok(found),
        }
        arena.truncate(child);
    }
    Ok(if cutoff {
        DepthLimitedResult::Cutoff
    } else {
        DepthLimitedResult::Failure
    })
}
