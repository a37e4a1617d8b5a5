//! Waymark Harness: fixture worlds and run bundles for the search core.
//!
//! The harness runs a [`contract::SearchWorld`] through `waymark_search`,
//! replays the solution it finds, and packages the run as a self-contained
//! in-memory artifact bundle.
//!
//! The harness does NOT implement search logic; it delegates to the core.
//! Worlds provide domain data only; the harness owns orchestration.

#![forbid(unsafe_code)]

pub mod bundle;
pub mod contract;
pub mod runner;
pub mod worlds;
