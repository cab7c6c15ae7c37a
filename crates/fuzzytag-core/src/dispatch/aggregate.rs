//! Winner selection over one line's node results

use std::sync::Arc;

use super::worker::{LineItem, NodeResult};
use crate::node::{Decision, MatchNode};

/// Floor a winning score must exceed
pub const DEFAULT_FLOOR: f64 = 0.1;

/// The winning node for a line
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub index: usize,
    pub node: Arc<str>,
    pub score: f64,
    pub decision: Decision,
}

/// Pick the strictly highest score above `floor`.
///
/// Ties keep the node with the lowest configuration index, whatever order the
/// results arrived in.
pub fn aggregate(results: &[NodeResult], floor: f64) -> Option<Classification> {
    let mut best: Option<&NodeResult> = None;
    for result in results {
        best = match best {
            Some(b) if result.score > b.score => Some(result),
            Some(b) if result.score == b.score && result.index < b.index => Some(result),
            Some(b) => Some(b),
            None => Some(result),
        };
    }

    best.filter(|b| b.score > floor).map(|b| Classification {
        index: b.index,
        node: Arc::clone(&b.node),
        score: b.score,
        decision: b.decision,
    })
}

/// Evaluate `line` against every node on the calling thread.
///
/// Same normalization and aggregation as the concurrent dispatcher.
pub fn evaluate_sequential(
    nodes: &mut [MatchNode],
    line: &str,
    floor: f64,
) -> Option<Classification> {
    let item = LineItem {
        round: 0,
        text: line.to_lowercase(),
    };
    let results: Vec<NodeResult> = nodes
        .iter_mut()
        .enumerate()
        .map(|(index, node)| {
            let name: Arc<str> = Arc::from(node.name());
            NodeResult::evaluate(index, node, &name, &item)
        })
        .collect();
    aggregate(&results, floor)
}
