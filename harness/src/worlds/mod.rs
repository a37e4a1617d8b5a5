//! Fixture worlds for the harness runner.

pub mod eight_puzzle;
pub mod n_queens;
pub mod ring;
pub mod route_map;
