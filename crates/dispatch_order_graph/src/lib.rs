// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compute graph model for dispatch ordering.
//!
//! This crate owns the nodes a scheduler orders:
//! - An arena of nodes keyed by stable [`NodeId`] handles
//! - Dependency/user relations kept in sync on both endpoints
//! - Designated input nodes where traversal starts
//! - RON persistence
//!
//! The graph never stores traversal state; schedulers keep their own marks.

pub mod node;
pub mod edge;
pub mod graph;

pub use node::{Node, NodeId};
pub use edge::Edge;
pub use graph::{Graph, GraphError};
