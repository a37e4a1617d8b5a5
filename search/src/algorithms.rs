//! Classic uninformed and informed searches as (ordering, strategy) pairs.
//!
//! | Constructor          | Frontier                  | Policy default        |
//! |----------------------|---------------------------|-----------------------|
//! | `breadth_first`      | FIFO                      | early goal test on    |
//! | `depth_first`        | LIFO                      |                       |
//! | `uniform_cost`       | priority by `g`           |                       |
//! | `greedy_best_first`  | priority by `h`           |                       |
//! | `astar`              | priority by `g + h`       |                       |

use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use crate::error::SearchError;
use crate::frontier::{FifoFrontier, Frontier, LifoFrontier, PriorityFrontier};
use crate::metrics::Metrics;
use crate::node::Node;
use crate::policy::SearchPolicy;
use crate::problem::{PathCost, Problem};
use crate::search::{QueueSearch, SearchOutcome};
use crate::strategy::QueueStrategy;

/// Estimated cost from a state to the nearest goal.
pub type Heuristic<S> = Rc<dyn Fn(&S) -> PathCost>;

/// A [`QueueSearch`] bound to a frontier ordering.
pub struct QueueBasedSearch<S, A> {
    search: QueueSearch<S, A>,
    frontier: Box<dyn Frontier<S, A>>,
}

impl<S, A> QueueBasedSearch<S, A>
where
    S: Clone + Eq + Hash + Debug + 'static,
    A: Clone + Debug + 'static,
{
    /// Pair an arbitrary template with an arbitrary ordering.
    #[must_use]
    pub fn new(search: QueueSearch<S, A>, frontier: Box<dyn Frontier<S, A>>) -> Self {
        Self { search, frontier }
    }

    /// FIFO ordering with the early goal test switched on.
    #[must_use]
    pub fn breadth_first(strategy: QueueStrategy<S, A>) -> Self {
        let policy = SearchPolicy::default().with_early_goal_test(true);
        Self::new(QueueSearch::with_policy(strategy, policy), Box::new(FifoFrontier::new()))
    }

    #[must_use]
    pub fn depth_first(strategy: QueueStrategy<S, A>) -> Self {
        Self::new(QueueSearch::new(strategy), Box::new(LifoFrontier::new()))
    }

    /// Cheapest-first by path cost. Cost-optimal with
    /// [`QueueStrategy::reduced_frontier`] (or tree search).
    #[must_use]
    pub fn uniform_cost(strategy: QueueStrategy<S, A>) -> Self {
        Self::new(QueueSearch::new(strategy), Box::new(PriorityFrontier::by_path_cost()))
    }

    /// Ordered by `h` alone.
    #[must_use]
    pub fn greedy_best_first(strategy: QueueStrategy<S, A>, h: Heuristic<S>) -> Self {
        let evaluation = Rc::new(move |n: &Node<S, A>| h(&n.state));
        Self::new(QueueSearch::new(strategy), Box::new(PriorityFrontier::new(evaluation)))
    }

    /// Ordered by `g + h`.
    #[must_use]
    pub fn astar(strategy: QueueStrategy<S, A>, h: Heuristic<S>) -> Self {
        let evaluation = Rc::new(move |n: &Node<S, A>| n.path_cost.saturating_add(h(&n.state)));
        Self::new(QueueSearch::new(strategy), Box::new(PriorityFrontier::new(evaluation)))
    }

    /// Replace the policy, including the early-goal-test default.
    #[must_use]
    pub fn with_policy(mut self, policy: SearchPolicy) -> Self {
        self.search.set_policy(policy);
        self
    }

    /// Run and return the full outcome.
    ///
    /// # Errors
    ///
    /// See [`QueueSearch::run_until`].
    pub fn search<P>(&mut self, problem: &P) -> Result<SearchOutcome<S, A>, SearchError>
    where
        P: Problem<State = S, Action = A>,
    {
        self.search.run(problem, self.frontier.as_mut())
    }

    /// The goal node, or `None` if the run ended without one.
    ///
    /// # Errors
    ///
    /// See [`QueueSearch::run_until`].
    pub fn find_node<P>(&mut self, problem: &P) -> Result<Option<Node<S, A>>, SearchError>
    where
        P: Problem<State = S, Action = A>,
    {
        let outcome = self.search(problem)?;
        Ok(outcome.goal_node().cloned())
    }

    /// Actions from the initial state to the goal.
    ///
    /// # Errors
    ///
    /// See [`QueueSearch::run_until`].
    pub fn find_actions<P>(&mut self, problem: &P) -> Result<Option<Vec<A>>, SearchError>
    where
        P: Problem<State = S, Action = A>,
    {
        Ok(self.search(problem)?.actions())
    }

    /// The goal state reached.
    ///
    /// # Errors
    ///
    /// See [`QueueSearch::run_until`].
    pub fn find_state<P>(&mut self, problem: &P) -> Result<Option<S>, SearchError>
    where
        P: Problem<State = S, Action = A>,
    {
        Ok(self.search(problem)?.goal_state().cloned())
    }

    /// Metrics of the last run.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        self.search.metrics()
    }

    /// Name of the frontier ordering.
    #[must_use]
    pub fn frontier_kind(&self) -> &'static str {
        self.frontier.kind()
    }
}

impl<S, A> std::fmt::Debug for QueueBasedSearch<S, A>
where
    S: Debug,
    A: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueBasedSearch")
            .field("search", &self.search)
            .field("frontier", &self.frontier.kind())
            .finish()
    }
}
