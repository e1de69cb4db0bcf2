use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::{debug, trace, warn};

use crate::error::{SortError, SortResult};

// ======================================================
// ENTRY POINTS
// ======================================================

/// Sorts a graph that may be absent.
///
/// `None` is reported as [`SortError::NullInput`], which keeps an absent graph
/// distinct from an empty one (`Some(&[])` sorts to an empty order).
pub fn sort(graph: Option<&[Vec<usize>]>) -> SortResult<Vec<usize>> {
    let graph = graph.ok_or_else(|| {
        warn!("sort called without a graph");
        SortError::NullInput
    })?;

    topological_sort(graph)
}

/// Returns one topological order of `graph`.
///
/// `graph[i]` lists the targets of the edges leaving node `i`. Duplicate edges
/// are allowed. Among nodes that are ready at the same time the lowest
/// identifier is placed first, so the result is deterministic.
///
/// Fails with [`SortError::InvalidNode`] when an edge leaves `[0, len)` and with
/// [`SortError::CycleDetected`] when no order exists.
pub fn topological_sort(graph: &[Vec<usize>]) -> SortResult<Vec<usize>> {
    validate(graph)?;

    let len = graph.len();
    debug!(nodes = len, edges = edge_count(graph), "sorting graph");

    let mut in_degree = in_degrees(graph);
    let mut placed = vec![false; len];
    let mut order = Vec::with_capacity(len);

    let mut frontier: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(node, _)| Reverse(node))
        .collect();

    while let Some(Reverse(node)) = frontier.pop() {
        debug_assert!(!placed[node]);
        placed[node] = true;
        order.push(node);
        trace!(node, position = order.len() - 1, "placed node");

        for &target in &graph[node] {
            in_degree[target] -= 1;
            if in_degree[target] == 0 {
                frontier.push(Reverse(target));
            }
        }
    }

    if order.len() < len {
        let remaining: Vec<usize> = placed
            .iter()
            .enumerate()
            .filter(|(_, done)| !**done)
            .map(|(node, _)| node)
            .collect();

        warn!(
            placed = order.len(),
            remaining = remaining.len(),
            "ordering stalled, graph has a cycle"
        );
        return Err(SortError::cycle(remaining));
    }

    debug!(nodes = len, "graph sorted");
    Ok(order)
}

// ======================================================
// VALIDATION
// ======================================================

/// Checks that every edge target names a node of the graph.
///
/// Stops at the first bad edge, scanning nodes in ascending order.
pub fn validate(graph: &[Vec<usize>]) -> SortResult<()> {
    let len = graph.len();

    for (node, targets) in graph.iter().enumerate() {
        if let Some(&target) = targets.iter().find(|&&target| target >= len) {
            warn!(
                node,
                edge_target = target,
                len,
                "edge targets a node outside the graph"
            );
            return Err(SortError::invalid_node(node, target as i128, len));
        }
    }

    Ok(())
}

// ======================================================
// HELPERS
// ======================================================

/// In-degree of every node. Callers must validate first.
pub(crate) fn in_degrees(graph: &[Vec<usize>]) -> Vec<usize> {
    let mut in_degree = vec![0; graph.len()];
    for targets in graph {
        for &target in targets {
            in_degree[target] += 1;
        }
    }
    in_degree
}

pub fn edge_count(graph: &[Vec<usize>]) -> usize {
    graph.iter().map(Vec::len).sum()
}
