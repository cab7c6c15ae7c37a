//! Persistent per-node workers
//!
//! Each worker owns one [`MatchNode`] for its whole lifetime and evaluates one
//! line at a time, so the node's marker buffer is never shared.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::node::{Decision, MatchNode};

/// A line dispatched to every node
#[derive(Debug)]
pub struct LineItem {
    /// Dispatch round counter, one per classified line. Skipped input lines
    /// never reach the dispatcher, so this is not the input line number.
    pub round: u64,
    pub text: String,
}

/// One node's verdict on one line
#[derive(Debug, Clone)]
pub struct NodeResult {
    /// Position of the node in configuration order
    pub index: usize,
    pub node: Arc<str>,
    pub round: u64,
    pub score: f64,
    pub decision: Decision,
}

impl NodeResult {
    pub(crate) fn evaluate(
        index: usize,
        node: &mut MatchNode,
        name: &Arc<str>,
        item: &LineItem,
    ) -> Self {
        let decision = node.evaluate(&item.text);
        trace!(
            node = %name,
            round = item.round,
            decision = decision.kind(),
            score = decision.score(),
            "node evaluated"
        );
        Self {
            index,
            node: Arc::clone(name),
            round: item.round,
            score: decision.score(),
            decision,
        }
    }
}

/// Dispatcher-side handle of a running worker
pub(crate) struct WorkerHandle {
    pub name: Arc<str>,
    pub lines: mpsc::Sender<Arc<LineItem>>,
    pub task: JoinHandle<()>,
}

impl WorkerHandle {
    /// Spawn a worker for `node` that reports into `results`
    pub fn spawn(index: usize, node: MatchNode, results: mpsc::Sender<NodeResult>) -> Self {
        let name: Arc<str> = Arc::from(node.name());
        // capacity 1: a node never has more than one line in flight
        let (lines, rx) = mpsc::channel(1);
        let task = tokio::spawn(run(index, node, Arc::clone(&name), rx, results));
        Self { name, lines, task }
    }
}

async fn run(
    index: usize,
    mut node: MatchNode,
    name: Arc<str>,
    mut lines: mpsc::Receiver<Arc<LineItem>>,
    results: mpsc::Sender<NodeResult>,
) {
    debug!(node = %name, index, keyword_code = node.keyword_code(), "worker started");

    while let Some(item) = lines.recv().await {
        let result = NodeResult::evaluate(index, &mut node, &name, &item);
        if results.send(result).await.is_err() {
            break;
        }
    }

    debug!(node = %name, "worker stopped");
}
