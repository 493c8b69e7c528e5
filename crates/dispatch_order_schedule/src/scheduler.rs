// SPDX-License-Identifier: MIT OR Apache-2.0
//! Front door used by the dispatch stage.

use crate::config::ScheduleOptions;
use crate::leveling::Leveling;
use crate::ordering::OrderingError;
use crate::processing_order::ProcessingOrder;
use dispatch_order_graph::Graph;

/// Output of a scheduling run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Dispatch order with its position index
    pub order: ProcessingOrder,
    /// Parallel-dispatch batches, when leveling was requested
    pub levels: Option<Leveling>,
}

/// Computes processing orders according to [`ScheduleOptions`]
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    options: ScheduleOptions,
}

impl Scheduler {
    /// Create a scheduler with the given options
    pub fn new(options: ScheduleOptions) -> Self {
        Self { options }
    }

    /// The active options
    pub fn options(&self) -> &ScheduleOptions {
        &self.options
    }

    /// Schedule every node reachable from the graph inputs
    ///
    /// Must be re-run after any edit to the graph's nodes or edges.
    pub fn schedule(&self, graph: &Graph) -> Result<Schedule, OrderingError> {
        let mut order = ProcessingOrder::calculate(graph)?;

        let unscheduled = order.unscheduled(graph);
        if !unscheduled.is_empty() {
            if self.options.require_complete {
                return Err(OrderingError::Incomplete(unscheduled));
            }
            tracing::warn!(
                graph = %graph.name,
                count = unscheduled.len(),
                "nodes unreachable from any input were not scheduled"
            );
        }

        let levels = self.options.leveled.then(|| order.level(graph));

        if self.options.verify {
            order.verify(graph)?;
        }

        tracing::debug!(
            graph = %graph.name,
            nodes = order.len(),
            levels = levels.as_ref().map(|l| l.buckets().len()),
            "scheduled graph"
        );
        Ok(Schedule { order, levels })
    }
}
