//! Per-run search metrics.
//!
//! Counters are mutated only by the search loop and reset at the start of
//! every run. They are a plain value returned with each outcome; nothing is
//! global.

use std::time::Duration;

use crate::problem::PathCost;

// Metric names, as used by `Metrics::get` and `Metrics::to_json`.

/// Nodes whose successors were generated.
pub const NODES_EXPANDED: &str = "nodes_expanded";
/// Child nodes created.
pub const NODES_GENERATED: &str = "nodes_generated";
/// Current frontier size.
pub const QUEUE_SIZE: &str = "queue_size";
/// Largest frontier size of the run.
pub const MAX_QUEUE_SIZE: &str = "max_queue_size";
/// Cost of the returned solution.
pub const PATH_COST: &str = "path_cost";
/// Wall-clock duration in milliseconds.
pub const TIME_TAKEN: &str = "time_taken";
/// Children dropped as explored or dominated.
pub const DUPLICATES_DROPPED: &str = "duplicates_dropped";
/// Frontier entries replaced by a better node.
pub const DUPLICATES_REPLACED: &str = "duplicates_replaced";

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// A goal node was found.
    GoalReached,
    /// The frontier ran out of expandable nodes.
    FrontierExhausted,
    /// The continue predicate or a policy budget stopped the run.
    Cancelled,
    /// A depth-limited run found no goal and its limit cut branches off.
    DepthCutoff,
}

impl Termination {
    /// Stable lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GoalReached => "goal_reached",
            Self::FrontierExhausted => "frontier_exhausted",
            Self::Cancelled => "cancelled",
            Self::DepthCutoff => "depth_cutoff",
        }
    }
}

/// Counters of one search run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Nodes whose successors were generated.
    pub nodes_expanded: u64,
    /// Child nodes created.
    pub nodes_generated: u64,
    /// Current frontier size.
    pub queue_size: u64,
    /// Largest frontier size seen during the run.
    pub max_queue_size: u64,
    /// Cost of the returned solution; `None` until a goal is reached.
    pub path_cost: Option<PathCost>,
    /// Children dropped because their state was explored or dominated.
    pub duplicates_dropped: u64,
    /// Frontier entries replaced by a better node for the same state.
    pub duplicates_replaced: u64,
    /// Wall-clock duration of the run.
    pub time_taken: Duration,
    /// Set once the run has stopped.
    pub termination: Option<Termination>,
}

impl Metrics {
    /// Zero every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record the current frontier size and update the high-water mark.
    pub fn set_queue_size(&mut self, size: usize) {
        self.queue_size = size as u64;
        self.max_queue_size = self.max_queue_size.max(self.queue_size);
    }

    /// Look a counter up by name. `time_taken` is reported in milliseconds.
    /// Returns `None` for unknown names and for `path_cost` before a goal.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<i64> {
        let saturate = |v: u64| i64::try_from(v).unwrap_or(i64::MAX);
        match name {
            NODES_EXPANDED => Some(saturate(self.nodes_expanded)),
            QUEUE_SIZE => Some(saturate(self.queue_size)),
            MAX_QUEUE_SIZE => Some(saturate(self.max_queue_size)),
            PATH_COST => self.path_cost,
            TIME_TAKEN => Some(i64::try_from(self.time_taken.as_millis()).unwrap_or(i64::MAX)),
            NODES_GENERATED => Some(saturate(self.nodes_generated)),
            DUPLICATES_DROPPED => Some(saturate(self.duplicates_dropped)),
            DUPLICATES_REPLACED => Some(saturate(self.duplicates_replaced)),
            _ => None,
        }
    }

    /// Name → value mapping. Integers only; `time_taken` is in milliseconds.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            DUPLICATES_DROPPED: self.duplicates_dropped,
            DUPLICATES_REPLACED: self.duplicates_replaced,
            MAX_QUEUE_SIZE: self.max_queue_size,
            NODES_EXPANDED: self.nodes_expanded,
            NODES_GENERATED: self.nodes_generated,
            PATH_COST: self.path_cost,
            QUEUE_SIZE: self.queue_size,
            "termination": self.termination.map(Termination::as_str),
            TIME_TAKEN: u64::try_from(self.time_taken.as_millis()).unwrap_or(u64::MAX),
        })
    }
}
