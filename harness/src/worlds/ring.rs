//! `Ring`: a cyclic state space with no goal unless one is set.
//!
//! States `0..size` sit on a cycle; `Next` and `Prev` step around it. Tree
//! search never terminates here on its own, which makes the ring the
//! fixture for budget and duplicate-detection behaviour.

use waymark_search::problem::Problem;

use crate::contract::SearchWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Next,
    Prev,
}

/// A cycle of `size` states starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ring {
    size: u32,
    goal: Option<u32>,
}

impl Ring {
    /// A ring with no goal state.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    #[must_use]
    pub fn new(size: u32) -> Self {
        assert!(size > 0, "ring needs at least one state");
        Self { size, goal: None }
    }

    #[must_use]
    pub fn with_goal(mut self, goal: u32) -> Self {
        self.goal = Some(goal % self.size);
        self
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }
}

impl Problem for Ring {
    type State = u32;
    type Action = Step;

    fn initial_state(&self) -> u32 {
        0
    }

    fn actions(&self, _state: &u32) -> Vec<Step> {
        vec![Step::Next, Step::Prev]
    }

    fn transition(&self, &state: &u32, step: &Step) -> u32 {
        match step {
            Step::Next => (state + 1) % self.size,
            Step::Prev => (state + self.size - 1) % self.size,
        }
    }

    fn is_goal(&self, state: &u32) -> bool {
        self.goal == Some(*state)
    }
}

impl SearchWorld for Ring {
    #[allow(clippy::unnecessary_literal_bound)]
    fn world_id(&self) -> &str {
        "ring"
    }

    fn fixture(&self) -> serde_json::Value {
        serde_json::json!({
            "goal": self.goal,
            "size": self.size,
        })
    }
}
