//! The problem contract consumed by the search core.

use std::fmt::Debug;
use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::error::{ProblemStage, SearchError};

/// Cumulative path cost. Integer so priority ordering stays total and traces
/// stay bit-reproducible.
pub type PathCost = i64;

/// A search problem: state space, actions, transition model, goal test and
/// step costs.
///
/// # Contract
///
/// - `actions` must be deterministic; its order is the expansion and
///   tie-break order.
/// - `transition` is only called with actions returned by `actions` for the
///   same state.
/// - `step_cost` must be non-negative. A negative value aborts the run with
///   [`SearchError::NegativeStepCost`].
pub trait Problem {
    /// A point in the state space. Structural equality is the only identity.
    type State: Clone + Eq + Hash + Debug;
    /// A transition label.
    type Action: Clone + Debug;

    /// The state the search starts from.
    fn initial_state(&self) -> Self::State;

    /// Actions applicable in `state`, in expansion order. Empty if terminal.
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// The state reached by applying `action` in `state`.
    fn transition(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// Whether `state` satisfies the goal.
    fn is_goal(&self, state: &Self::State) -> bool;

    /// Cost of the step `from --action--> to`. Defaults to 1.
    fn step_cost(&self, _from: &Self::State, _action: &Self::Action, _to: &Self::State) -> PathCost {
        1
    }
}

type ActionsFn<S, A> = Box<dyn Fn(&S) -> Vec<A>>;
type TransitionFn<S, A> = Box<dyn Fn(&S, &A) -> S>;
type GoalFn<S> = Box<dyn Fn(&S) -> bool>;
type StepCostFn<S, A> = Box<dyn Fn(&S, &A, &S) -> PathCost>;

/// A [`Problem`] assembled from closures.
///
/// Useful for small problems and tests where a dedicated type would be noise.
pub struct GeneralProblem<S, A> {
    initial: S,
    actions: ActionsFn<S, A>,
    transition: TransitionFn<S, A>,
    goal: GoalFn<S>,
    step_cost: Option<StepCostFn<S, A>>,
}

impl<S, A> GeneralProblem<S, A> {
    /// Build a unit-cost problem.
    pub fn new(
        initial: S,
        actions: impl Fn(&S) -> Vec<A> + 'static,
        transition: impl Fn(&S, &A) -> S + 'static,
        goal: impl Fn(&S) -> bool + 'static,
    ) -> Self {
        Self {
            initial,
            actions: Box::new(actions),
            transition: Box::new(transition),
            goal: Box::new(goal),
            step_cost: None,
        }
    }

    /// Replace the unit step cost.
    #[must_use]
    pub fn with_step_cost(mut self, step_cost: impl Fn(&S, &A, &S) -> PathCost + 'static) -> Self {
        self.step_cost = Some(Box::new(step_cost));
        self
    }
}

impl<S, A> Problem for GeneralProblem<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + Debug,
{
    type State = S;
    type Action = A;

    fn initial_state(&self) -> S {
        self.initial.clone()
    }

    fn actions(&self, state: &S) -> Vec<A> {
        (self.actions)(state)
    }

    fn transition(&self, state: &S, action: &A) -> S {
        (self.transition)(state, action)
    }

    fn is_goal(&self, state: &S) -> bool {
        (self.goal)(state)
    }

    fn step_cost(&self, from: &S, action: &A, to: &S) -> PathCost {
        self.step_cost.as_ref().map_or(1, |f| f(from, action, to))
    }
}

/// Run a problem callback, turning a panic into
/// [`SearchError::ProblemPanicked`].
pub(crate) fn guarded<T>(stage: ProblemStage, f: impl FnOnce() -> T) -> Result<T, SearchError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|_| {
        log::warn!("problem callback panicked in {}", stage.as_str());
        SearchError::ProblemPanicked { stage }
    })
}
