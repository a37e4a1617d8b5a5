//! Search policy: budgets and loop options.

use std::time::Duration;

use crate::error::SearchError;

/// Budget and loop configuration for one search run.
///
/// Budgets end a run with `Termination::Cancelled`; they are checked once per
/// loop iteration, after the frontier emptiness check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Hard cap on node expansions.
    pub max_expansions: Option<u64>,
    /// Children deeper than this are not generated.
    pub max_depth: Option<u32>,
    /// Wall-clock budget for the run.
    pub time_limit: Option<Duration>,
    /// Goal-test the root before insertion and each child as it is generated.
    pub early_goal_test: bool,
    /// Record one `ExpandEvent` per expansion.
    pub record_trace: bool,
}

impl SearchPolicy {
    /// Pre-flight check. Zero budgets and limits are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] naming the offending field.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_expansions == Some(0) {
            return Err(SearchError::InvalidPolicy {
                detail: "max_expansions must be at least 1".into(),
            });
        }
        if self.max_depth == Some(0) {
            return Err(SearchError::InvalidPolicy {
                detail: "max_depth must be at least 1".into(),
            });
        }
        if self.time_limit == Some(Duration::ZERO) {
            return Err(SearchError::InvalidPolicy {
                detail: "time_limit must be non-zero".into(),
            });
        }
        Ok(())
    }

    /// Same policy with an expansion budget.
    #[must_use]
    pub fn with_max_expansions(mut self, max: u64) -> Self {
        self.max_expansions = Some(max);
        self
    }

    /// Same policy with a depth limit.
    #[must_use]
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Same policy with a wall-clock budget.
    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Same policy with early goal testing switched on or off.
    #[must_use]
    pub fn with_early_goal_test(mut self, on: bool) -> Self {
        self.early_goal_test = on;
        self
    }

    /// Same policy with trace recording switched on or off.
    #[must_use]
    pub fn with_trace(mut self, on: bool) -> Self {
        self.record_trace = on;
        self
    }

    /// Canonical JSON form, used to bind the policy into run bundles.
    ///
    /// The time limit is wall-clock dependent and reported in milliseconds.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "early_goal_test": self.early_goal_test,
            "max_depth": self.max_depth,
            "max_expansions": self.max_expansions,
            "record_trace": self.record_trace,
            "time_limit_ms": self
                .time_limit
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        })
    }
}
