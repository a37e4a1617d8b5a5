//! `SearchTrace`: expansion-event audit log.
//!
//! The normative record of a run is its ordered list of [`ExpandEvent`]s:
//! which node was expanded, in what order, and what happened to each child
//! it generated. Two runs with the same problem, ordering, strategy and
//! policy produce byte-identical canonical JSON and therefore the same
//! digest.

use crate::digest::{canonical_json_bytes, content_hash, CanonError, ContentHash, DOMAIN_SEARCH_TRACE};
use crate::metrics::Termination;
use crate::node::NodeId;
use crate::problem::PathCost;
use crate::strategy::{Admission, DuplicatePolicy};

/// Complete audit trail of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTrace {
    /// Expansion events in expansion order.
    pub expansions: Vec<ExpandEvent>,
    pub metadata: TraceMetadata,
}

/// One node expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandEvent {
    /// Zero-based position in the run's expansion sequence.
    pub expansion_order: u64,
    pub node_id: NodeId,
    pub depth: u32,
    pub path_cost: PathCost,
    /// Frontier entries left after this node was removed.
    pub frontier_size: u64,
    /// One record per applicable action, in the problem's action order.
    pub children: Vec<ChildRecord>,
}

/// What happened to one applicable action during an expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRecord {
    /// Position of the action in `Problem::actions()`.
    pub index: u64,
    /// `Debug` rendering of the action.
    pub action: String,
    /// The child node, unless it was skipped before construction.
    pub node_id: Option<NodeId>,
    pub outcome: ChildOutcome,
}

/// Fate of a generated (or skipped) child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOutcome {
    Inserted,
    Replaced { evicted: NodeId },
    DroppedExplored,
    DroppedDominated,
    /// Not constructed: the child would exceed `SearchPolicy::max_depth`.
    SkippedByDepthLimit,
    /// The child passed the early goal test and ended the run.
    GoalFound,
}

impl From<Admission> for ChildOutcome {
    fn from(admission: Admission) -> Self {
        match admission {
            Admission::Inserted => Self::Inserted,
            Admission::Replaced { evicted } => Self::Replaced { evicted },
            Admission::DroppedExplored => Self::DroppedExplored,
            Admission::DroppedDominated => Self::DroppedDominated,
        }
    }
}

/// Run-level bindings and counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceMetadata {
    pub duplicate_policy: DuplicatePolicy,
    /// `Frontier::kind()` of the frontier the run used.
    pub frontier_kind: String,
    pub early_goal_test: bool,
    /// `Debug` rendering of the initial state.
    pub root_state: String,
    pub termination: Termination,
    pub goal_node: Option<NodeId>,
    pub total_expansions: u64,
    pub total_generated: u64,
    pub total_duplicates_dropped: u64,
    pub total_duplicates_replaced: u64,
    pub max_queue_size: u64,
}

// ---------------------------------------------------------------------------
// Canonical JSON serialization
// ---------------------------------------------------------------------------

impl SearchTrace {
    /// Canonical JSON bytes of the whole trace.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails. The trace holds only
    /// integers, strings and booleans, so this does not happen in practice.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Domain-separated SHA-256 of the canonical bytes.
    ///
    /// # Errors
    ///
    /// Propagates [`CanonError`] from [`Self::to_canonical_json_bytes`].
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        Ok(content_hash(DOMAIN_SEARCH_TRACE, &self.to_canonical_json_bytes()?))
    }

    #[must_use]
    fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "expansions": self.expansions.iter().map(expand_event_to_json).collect::<Vec<_>>(),
            "metadata": metadata_to_json(&self.metadata),
        })
    }
}

fn node_id_to_json(id: NodeId) -> serde_json::Value {
    serde_json::json!(id.index())
}

fn expand_event_to_json(e: &ExpandEvent) -> serde_json::Value {
    serde_json::json!({
        "children": e.children.iter().map(child_record_to_json).collect::<Vec<_>>(),
        "depth": e.depth,
        "expansion_order": e.expansion_order,
        "frontier_size": e.frontier_size,
        "node_id": node_id_to_json(e.node_id),
        "path_cost": e.path_cost,
    })
}

fn child_record_to_json(r: &ChildRecord) -> serde_json::Value {
    serde_json::json!({
        "action": r.action,
        "index": r.index,
        "node_id": r.node_id.map(node_id_to_json),
        "outcome": outcome_to_json(r.outcome),
    })
}

fn outcome_to_json(o: ChildOutcome) -> serde_json::Value {
    match o {
        ChildOutcome::Inserted => serde_json::json!({"type": "inserted"}),
        ChildOutcome::Replaced { evicted } => {
            serde_json::json!({"evicted": node_id_to_json(evicted), "type": "replaced"})
        }
        ChildOutcome::DroppedExplored => serde_json::json!({"type": "dropped_explored"}),
        ChildOutcome::DroppedDominated => serde_json::json!({"type": "dropped_dominated"}),
        ChildOutcome::SkippedByDepthLimit => {
            serde_json::json!({"type": "skipped_by_depth_limit"})
        }
        ChildOutcome::GoalFound => serde_json::json!({"type": "goal_found"}),
    }
}

fn metadata_to_json(m: &TraceMetadata) -> serde_json::Value {
    serde_json::json!({
        "duplicate_policy": m.duplicate_policy.as_str(),
        "early_goal_test": m.early_goal_test,
        "frontier_kind": m.frontier_kind,
        "goal_node": m.goal_node.map(node_id_to_json),
        "max_queue_size": m.max_queue_size,
        "root_state": m.root_state,
        "termination": m.termination.as_str(),
        "total_duplicates_dropped": m.total_duplicates_dropped,
        "total_duplicates_replaced": m.total_duplicates_replaced,
        "total_expansions": m.total_expansions,
        "total_generated": m.total_generated,
    })
}
