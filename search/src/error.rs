//! Typed search errors.
//!
//! `SearchError` covers pre-flight policy failures and fatal problem-contract
//! violations. Running out of frontier or being cancelled is not an error:
//! those runs return `Ok(SearchOutcome)` with no goal and a
//! [`crate::metrics::Termination`] saying why.

use crate::problem::PathCost;

/// The problem callback that was executing when a panic was caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemStage {
    /// `Problem::initial_state()`.
    InitialState,
    /// `Problem::actions()`.
    Actions,
    /// `Problem::transition()`.
    Transition,
    /// `Problem::step_cost()`.
    StepCost,
    /// `Problem::is_goal()`.
    IsGoal,
    /// A caller-supplied evaluation, heuristic or comparator.
    Evaluation,
}

impl ProblemStage {
    /// Stable lowercase name, used in traces and log lines.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InitialState => "initial_state",
            Self::Actions => "actions",
            Self::Transition => "transition",
            Self::StepCost => "step_cost",
            Self::IsGoal => "is_goal",
            Self::Evaluation => "evaluation",
        }
    }
}

/// Fatal failure of a search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The search policy failed pre-flight validation. No node was created.
    InvalidPolicy { detail: String },
    /// `Problem::step_cost()` returned a negative value.
    NegativeStepCost {
        /// Depth of the child whose step cost was negative.
        depth: u32,
        cost: PathCost,
    },
    /// A child's cumulative path cost does not fit in [`PathCost`].
    PathCostOverflow { depth: u32 },
    /// A problem callback panicked; the run was aborted.
    ProblemPanicked { stage: ProblemStage },
    /// Replaying an action sequence did not reproduce the expected state.
    ReplayDiverged { step: usize, detail: String },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPolicy { detail } => write!(f, "invalid search policy: {detail}"),
            Self::NegativeStepCost { depth, cost } => {
                write!(f, "negative step cost {cost} for child at depth {depth}")
            }
            Self::PathCostOverflow { depth } => {
                write!(f, "path cost overflow for child at depth {depth}")
            }
            Self::ProblemPanicked { stage } => {
                write!(f, "problem callback panicked in {}", stage.as_str())
            }
            Self::ReplayDiverged { step, detail } => {
                write!(f, "replay diverged at step {step}: {detail}")
            }
        }
    }
}

impl std::error::Error for SearchError {}
