//! kinorrt - kinodynamic motion planning in Rust
//!
//! This crate grows a tree of reachable states for a controlled dynamical
//! system, extracts and smooths the resulting state/control trajectory, and
//! derives open-loop and trajectory-tracking feedback controllers from it.

// Core modules
pub mod common;

// Algorithm modules
pub mod planning;
pub mod signal;
pub mod control;
pub mod systems;

// Re-export common types for convenience
pub use common::{Node, Tree, Solution, PdGains, GainWiring};
pub use common::{Dynamics, FeedbackPolicy, SignalFilter};
pub use common::{PlannerError, PlannerResult};
pub use planning::{KinodynamicRrt, KinodynamicRrtConfig};
