use tracing::debug;

use crate::engine::graph::validate;
use crate::error::{OrderViolation, VerifyError};

/// Checks that `order` is a topological order of `graph`.
///
/// The graph is validated first, so a malformed graph is reported as
/// [`VerifyError::Graph`] before the order is looked at.
pub fn verify_order(graph: &[Vec<usize>], order: &[usize]) -> Result<(), VerifyError> {
    validate(graph)?;

    let len = graph.len();
    if order.len() != len {
        return Err(OrderViolation::LengthMismatch {
            expected: len,
            actual: order.len(),
        }
        .into());
    }

    let mut position = vec![usize::MAX; len];
    for (index, &node) in order.iter().enumerate() {
        if node >= len {
            return Err(OrderViolation::UnknownNode { node }.into());
        }
        if position[node] != usize::MAX {
            return Err(OrderViolation::DuplicateNode { node }.into());
        }
        position[node] = index;
    }

    for (from, targets) in graph.iter().enumerate() {
        for &to in targets {
            if position[from] >= position[to] {
                return Err(OrderViolation::EdgeViolated { from, to }.into());
            }
        }
    }

    debug!(nodes = len, "order verified");
    Ok(())
}
