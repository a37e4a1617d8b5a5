//! Waymark Search: a generic state-space search core.
//!
//! The crate depends only on the abstract [`Problem`] contract. It knows
//! nothing about concrete state representations; `waymark_harness` supplies
//! fixture worlds and run bundles on top of it.
//!
//! # Crate dependency graph
//!
//! ```text
//! waymark_search  ←  waymark_harness
//! (nodes, frontier,   (worlds, runner, bundles)
//!  strategies, loop)
//! ```
//!
//! # Key types
//!
//! - [`Problem`]: the state space, actions, transitions, goal test and costs
//! - [`NodeArena`] / [`NodeFactory`]: run-scoped parent-linked nodes
//! - [`Frontier`]: FIFO, LIFO and priority orderings
//! - [`QueueStrategy`]: tree, explored-set graph and reduced-frontier search
//! - [`QueueSearch`]: the expand/test loop over the strategy hooks
//! - [`QueueBasedSearch`]: BFS, DFS, UCS, greedy and A* front-ends
//! - [`SearchTrace`]: expansion-event audit log with a canonical digest
//!
//! # Example
//!
//! ```
//! use waymark_search::{FifoFrontier, GeneralProblem, QueueSearch, QueueStrategy};
//!
//! // Count from 0 to 5 by steps of +1 or +2.
//! let problem = GeneralProblem::new(0u32, |_| vec![1u32, 2], |&s, &a| s + a, |&s| s == 5);
//! let mut search = QueueSearch::new(QueueStrategy::graph());
//! let outcome = search.run(&problem, &mut FifoFrontier::new()).unwrap();
//! assert_eq!(outcome.actions().map(|a| a.len()), Some(3));
//! ```

#![forbid(unsafe_code)]

pub mod algorithms;
pub mod depth_limited;
pub mod digest;
pub mod error;
pub mod frontier;
pub mod metrics;
pub mod node;
pub mod policy;
pub mod problem;
pub mod search;
pub mod strategy;
pub mod trace;

pub use algorithms::{Heuristic, QueueBasedSearch};
pub use error::{ProblemStage, SearchError};
pub use frontier::{Evaluation, FifoFrontier, Frontier, LifoFrontier, PriorityFrontier};
pub use metrics::{Metrics, Termination};
pub use node::{Node, NodeArena, NodeFactory, NodeId};
pub use policy::SearchPolicy;
pub use problem::{GeneralProblem, PathCost, Problem};
pub use search::{replay_actions, verify_solution, QueueSearch, SearchOutcome};
pub use strategy::{Admission, DuplicatePolicy, QueueStrategy};
pub use trace::SearchTrace;
