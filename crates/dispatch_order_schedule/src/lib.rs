// SPDX-License-Identifier: MIT OR Apache-2.0
//! Execution-order scheduling for compute graphs.
//!
//! Given a [`Graph`](dispatch_order_graph::Graph) this crate decides the
//! order in which its nodes are dispatched:
//! - Topological ordering by depth-first traversal from the graph inputs
//! - A position index for O(1) "is before" queries
//! - Critical-path leveling that groups nodes into parallel batches
//! - Validators that check an order against the graph
//!
//! ## Architecture
//!
//! [`ProcessingOrder`] owns an order and its [`PositionIndex`] and rebuilds
//! the index on every edit. [`Scheduler`] is the front door used by the
//! dispatch stage and is configured by [`ScheduleOptions`]. Nodes not
//! reachable from a designated input are never scheduled.

pub mod ordering;
pub mod position;
pub mod leveling;
pub mod validation;
pub mod processing_order;
pub mod config;
pub mod scheduler;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod proptests;

pub use ordering::{compute_topological_order, OrderingError};
pub use position::PositionIndex;
pub use leveling::{level_order, Leveling};
pub use validation::{find_violations, is_correct, verify_order, Violation};
pub use processing_order::ProcessingOrder;
pub use config::{ConfigError, ScheduleOptions};
pub use scheduler::{Schedule, Scheduler};
