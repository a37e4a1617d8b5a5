//! Search template and expansion loop.
//!
//! [`QueueSearch`] drives the generic loop: test the frontier, check budgets
//! and the continue predicate, remove a node, goal-test it, expand it. All
//! duplicate handling is delegated to the [`QueueStrategy`] hooks, all
//! ordering to the [`Frontier`].

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Instant;

use crate::error::{ProblemStage, SearchError};
use crate::frontier::Frontier;
use crate::metrics::{Metrics, Termination};
use crate::node::{Node, NodeArena, NodeFactory, NodeId};
use crate::policy::SearchPolicy;
use crate::problem::{guarded, Problem};
use crate::strategy::{Admission, QueueStrategy};
use crate::trace::{ChildOutcome, ChildRecord, ExpandEvent, SearchTrace, TraceMetadata};

/// Result of a search run that did not hit a contract violation.
///
/// Owns every node created during the run. Check
/// [`SearchOutcome::is_goal_reached`] or [`SearchOutcome::termination`] to
/// see how the run ended.
#[derive(Debug, Clone)]
pub struct SearchOutcome<S, A> {
    /// The goal node, if one was found.
    pub goal: Option<NodeId>,
    /// All nodes created during the run.
    pub nodes: NodeArena<S, A>,
    /// Counters as of the end of the run.
    pub metrics: Metrics,
    /// Why the run stopped.
    pub termination: Termination,
    /// Audit trail, when `SearchPolicy::record_trace` was set.
    pub trace: Option<SearchTrace>,
}

impl<S, A> SearchOutcome<S, A> {
    /// Returns `true` if the run ended on a goal.
    #[must_use]
    pub fn is_goal_reached(&self) -> bool {
        self.goal.is_some()
    }

    /// The goal node, if any.
    #[must_use]
    pub fn goal_node(&self) -> Option<&Node<S, A>> {
        self.goal.map(|id| self.nodes.get(id))
    }

    /// The goal state, if any.
    #[must_use]
    pub fn goal_state(&self) -> Option<&S> {
        self.goal_node().map(|n| &n.state)
    }
}

impl<S, A: Clone> SearchOutcome<S, A> {
    /// Actions from the initial state to the goal; `None` without a goal.
    #[must_use]
    pub fn actions(&self) -> Option<Vec<A>> {
        self.goal.map(|id| self.nodes.reconstruct_path(id))
    }
}

/// The generic queue-based search template.
///
/// Holds the duplicate-handling strategy, the policy and the metrics of the
/// last run. One instance runs one search at a time; reusing it for another
/// run resets all run-scoped state.
#[derive(Debug)]
pub struct QueueSearch<S, A> {
    strategy: QueueStrategy<S, A>,
    policy: SearchPolicy,
    metrics: Metrics,
}

impl<S, A> QueueSearch<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Debug,
{
    /// Template with the default policy.
    #[must_use]
    pub fn new(strategy: QueueStrategy<S, A>) -> Self {
        Self::with_policy(strategy, SearchPolicy::default())
    }

    /// Template with an explicit policy. The policy is validated when a
    /// run starts.
    #[must_use]
    pub fn with_policy(strategy: QueueStrategy<S, A>, policy: SearchPolicy) -> Self {
        Self {
            strategy,
            policy,
            metrics: Metrics::default(),
        }
    }

    /// The policy used by the next run.
    #[must_use]
    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Replace the policy for subsequent runs.
    pub fn set_policy(&mut self, policy: SearchPolicy) {
        self.policy = policy;
    }

    /// The duplicate-handling strategy, with the run state of the last run.
    #[must_use]
    pub fn strategy(&self) -> &QueueStrategy<S, A> {
        &self.strategy
    }

    /// Metrics of the last run (partial if it was aborted by an error).
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Run to a goal, frontier exhaustion, or a policy budget.
    ///
    /// The frontier is cleared first, so any ordering object can be reused
    /// across runs.
    ///
    /// # Errors
    ///
    /// See [`QueueSearch::run_until`].
    pub fn run<P, F>(&mut self, problem: &P, frontier: &mut F) -> Result<SearchOutcome<S, A>, SearchError>
    where
        P: Problem<State = S, Action = A>,
        F: Frontier<S, A> + ?Sized,
    {
        self.run_until(problem, frontier, |_| true)
    }

    /// Like [`QueueSearch::run`], but stops with [`Termination::Cancelled`]
    /// as soon as `should_continue` returns `false`. The predicate sees the
    /// live metrics and is called once per loop iteration, after the frontier
    /// emptiness check.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidPolicy`] if the policy fails validation; no
    ///   node is created.
    /// - [`SearchError::NegativeStepCost`], [`SearchError::PathCostOverflow`]
    ///   or [`SearchError::ProblemPanicked`] when the problem breaks its
    ///   contract. The run is abandoned; [`QueueSearch::metrics`] keeps the
    ///   partial counters.
    pub fn run_until<P, F>(
        &mut self,
        problem: &P,
        frontier: &mut F,
        should_continue: impl FnMut(&Metrics) -> bool,
    ) -> Result<SearchOutcome<S, A>, SearchError>
    where
        P: Problem<State = S, Action = A>,
        F: Frontier<S, A> + ?Sized,
    {
        self.policy.validate()?;
        let started = Instant::now();
        self.metrics.reset();
        self.strategy.reset();
        frontier.clear();
        log::debug!(
            "search start: strategy={} frontier={} early_goal_test={}",
            self.strategy.policy().as_str(),
            frontier.kind(),
            self.policy.early_goal_test
        );

        let mut arena = NodeArena::new();
        let mut events = self.policy.record_trace.then(Vec::new);
        let result = self.drive(problem, frontier, should_continue, started, &mut arena, &mut events);
        self.metrics.time_taken = started.elapsed();

        let (goal, termination, root_state) = match result {
            Ok(done) => done,
            Err(err) => {
                log::warn!(
                    "search aborted after {} expansions: {err}",
                    self.metrics.nodes_expanded
                );
                return Err(err);
            }
        };

        self.metrics.termination = Some(termination);
        self.metrics.path_cost = goal.map(|id| arena.get(id).path_cost);
        match termination {
            Termination::Cancelled => log::warn!(
                "search cancelled after {} expansions",
                self.metrics.nodes_expanded
            ),
            _ => log::debug!(
                "search done: {} after {} expansions, max frontier {}",
                termination.as_str(),
                self.metrics.nodes_expanded,
                self.metrics.max_queue_size
            ),
        }

        let trace = events.map(|expansions| SearchTrace {
            expansions,
            metadata: TraceMetadata {
                duplicate_policy: self.strategy.policy(),
                frontier_kind: frontier.kind().to_string(),
                early_goal_test: self.policy.early_goal_test,
                root_state,
                termination,
                goal_node: goal,
                total_expansions: self.metrics.nodes_expanded,
                total_generated: self.metrics.nodes_generated,
                total_duplicates_dropped: self.metrics.duplicates_dropped,
                total_duplicates_replaced: self.metrics.duplicates_replaced,
                max_queue_size: self.metrics.max_queue_size,
            },
        });

        Ok(SearchOutcome {
            goal,
            nodes: arena,
            metrics: self.metrics.clone(),
            termination,
            trace,
        })
    }

    /// The loop proper. Returns the goal (if any), why the loop stopped and
    /// the rendered root state for the trace.
    #[allow(clippy::too_many_lines)]
    fn drive<P, F>(
        &mut self,
        problem: &P,
        frontier: &mut F,
        mut should_continue: impl FnMut(&Metrics) -> bool,
        started: Instant,
        arena: &mut NodeArena<S, A>,
        events: &mut Option<Vec<ExpandEvent>>,
    ) -> Result<(Option<NodeId>, Termination, String), SearchError>
    where
        P: Problem<State = S, Action = A>,
        F: Frontier<S, A> + ?Sized,
    {
        let early = self.policy.early_goal_test;
        let initial = guarded(ProblemStage::InitialState, || problem.initial_state())?;
        let root_state = if events.is_some() {
            format!("{initial:?}")
        } else {
            String::new()
        };
        let root = NodeFactory.root(arena, initial);

        if early && goal_test(problem, arena.get(root))? {
            return Ok((Some(root), Termination::GoalReached, root_state));
        }
        self.admit(root, arena, frontier)?;

        loop {
            if self.strategy.is_frontier_empty(arena, frontier) {
                self.metrics.set_queue_size(0);
                return Ok((None, Termination::FrontierExhausted, root_state));
            }
            if self.budget_spent(started) || !should_continue(&self.metrics) {
                return Ok((None, Termination::Cancelled, root_state));
            }
            let Some(id) = self.strategy.remove_from_frontier(arena, frontier) else {
                return Ok((None, Termination::FrontierExhausted, root_state));
            };
            self.metrics.set_queue_size(frontier.len());

            if !early && goal_test(problem, arena.get(id))? {
                return Ok((Some(id), Termination::GoalReached, root_state));
            }

            self.metrics.nodes_expanded += 1;
            let (depth, path_cost) = {
                let node = arena.get(id);
                (node.depth, node.path_cost)
            };
            log::trace!(
                "expand #{} {id} depth={depth} g={path_cost} frontier={}",
                self.metrics.nodes_expanded,
                frontier.len()
            );
            let frontier_size = frontier.len() as u64;
            let actions = guarded(ProblemStage::Actions, || problem.actions(&arena.get(id).state))?;
            let depth_capped = self.policy.max_depth.is_some_and(|max| depth >= max);

            let mut children = Vec::new();
            let mut found = None;
            for (index, action) in actions.into_iter().enumerate() {
                let rendered = if events.is_some() {
                    format!("{action:?}")
                } else {
                    String::new()
                };
                if depth_capped {
                    children.push(ChildRecord {
                        index: index as u64,
                        action: rendered,
                        node_id: None,
                        outcome: ChildOutcome::SkippedByDepthLimit,
                    });
                    continue;
                }
                let child = NodeFactory.child(problem, arena, id, action)?;
                self.metrics.nodes_generated += 1;
                let mut outcome = ChildOutcome::from(self.admit(child, arena, frontier)?);
                if early && goal_test(problem, arena.get(child))? {
                    outcome = ChildOutcome::GoalFound;
                    found = Some(child);
                }
                children.push(ChildRecord {
                    index: index as u64,
                    action: rendered,
                    node_id: Some(child),
                    outcome,
                });
                if found.is_some() {
                    break;
                }
            }

            if let Some(events) = events.as_mut() {
                events.push(ExpandEvent {
                    expansion_order: self.metrics.nodes_expanded - 1,
                    node_id: id,
                    depth,
                    path_cost,
                    frontier_size,
                    children,
                });
            }
            if let Some(goal) = found {
                return Ok((Some(goal), Termination::GoalReached, root_state));
            }
        }
    }

    /// `add_to_frontier` plus metric bookkeeping. Priority frontiers call
    /// caller-supplied evaluations here, hence the panic guard.
    fn admit<F>(&mut self, id: NodeId, arena: &NodeArena<S, A>, frontier: &mut F) -> Result<Admission, SearchError>
    where
        F: Frontier<S, A> + ?Sized,
    {
        let strategy = &mut self.strategy;
        let admission = guarded(ProblemStage::Evaluation, || {
            strategy.add_to_frontier(id, arena, frontier)
        })?;
        match admission {
            Admission::Inserted => {}
            Admission::Replaced { .. } => self.metrics.duplicates_replaced += 1,
            Admission::DroppedExplored | Admission::DroppedDominated => {
                self.metrics.duplicates_dropped += 1;
            }
        }
        self.metrics.set_queue_size(frontier.len());
        Ok(admission)
    }

    fn budget_spent(&self, started: Instant) -> bool {
        self.policy
            .max_expansions
            .is_some_and(|max| self.metrics.nodes_expanded >= max)
            || self
                .policy
                .time_limit
                .is_some_and(|limit| started.elapsed() >= limit)
    }
}

fn goal_test<P: Problem>(problem: &P, node: &Node<P::State, P::Action>) -> Result<bool, SearchError> {
    guarded(ProblemStage::IsGoal, || problem.is_goal(&node.state))
}

/// Apply `actions` from the initial state and return the state reached.
///
/// Each action must be one of those `Problem::actions()` offers at that
/// point.
///
/// # Errors
///
/// Returns [`SearchError::ReplayDiverged`] at the first inapplicable action,
/// or [`SearchError::ProblemPanicked`] if a callback panics.
pub fn replay_actions<P>(problem: &P, actions: &[P::Action]) -> Result<P::State, SearchError>
where
    P: Problem,
    P::Action: PartialEq,
{
    let mut state = guarded(ProblemStage::InitialState, || problem.initial_state())?;
    for (step, action) in actions.iter().enumerate() {
        let applicable = guarded(ProblemStage::Actions, || problem.actions(&state))?;
        if !applicable.contains(action) {
            return Err(SearchError::ReplayDiverged {
                step,
                detail: format!("action {action:?} not applicable in {state:?}"),
            });
        }
        state = guarded(ProblemStage::Transition, || problem.transition(&state, action))?;
    }
    Ok(state)
}

/// Replay `actions` and require the final state to be a goal.
///
/// # Errors
///
/// As [`replay_actions`], plus [`SearchError::ReplayDiverged`] when the final
/// state fails the goal test.
pub fn verify_solution<P>(problem: &P, actions: &[P::Action]) -> Result<P::State, SearchError>
where
    P: Problem,
    P::Action: PartialEq,
{
    let state = replay_actions(problem, actions)?;
    if guarded(ProblemStage::IsGoal, || problem.is_goal(&state))? {
        Ok(state)
    } else {
        Err(SearchError::ReplayDiverged {
            step: actions.len(),
            detail: format!("final state {state:?} is not a goal"),
        })
    }
}
