//! Concurrent dispatch and aggregation
//!
//! One persistent worker task per node. For every line the dispatcher sends
//! the same [`LineItem`] to all workers, then waits for exactly one
//! [`NodeResult`] per node before returning (no overlap between lines).
//!
//! There is no per-line timeout: a slow node stalls the line.
//!
//! # Example
//!
//! ```rust
//! use fuzzytag_core::config::{validate_nodes, MatchNodeConfig};
//! use fuzzytag_core::dispatch::{DispatchConfig, Dispatcher};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let rules = validate_nodes(
//!     vec![
//!         MatchNodeConfig::fuzzy("A", "apple"),
//!         MatchNodeConfig::fuzzy("B", "orange"),
//!     ],
//!     0.5,
//! )
//! .unwrap();
//!
//! let mut dispatcher = Dispatcher::from_rules(rules, DispatchConfig::default());
//! let winner = dispatcher.classify("I bought an appel today").await.unwrap();
//! assert_eq!(winner.map(|w| w.node.to_string()), Some("A".to_string()));
//! dispatcher.shutdown().await;
//! # }
//! ```

mod aggregate;
mod worker;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use std::sync::Arc;

use crate::config::{ConfigError, NodeRules};
use crate::node::MatchNode;

pub use aggregate::{aggregate, evaluate_sequential, Classification, DEFAULT_FLOOR};
pub use worker::{LineItem, NodeResult};

use worker::WorkerHandle;

/// Errors from a dispatch round. After any of these the dispatcher should be
/// shut down.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("worker for node '{node}' is gone")]
    WorkerGone { node: String },

    #[error("result channel closed before all nodes reported")]
    ResultsClosed,

    #[error("node '{node}' reported twice in round {round}")]
    DuplicateResult { node: String, round: u64 },

    #[error("result for round {got} arrived while collecting round {expected}")]
    StaleResult { expected: u64, got: u64 },
}

/// Aggregation settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchConfig {
    /// Score a winner must exceed
    pub floor: f64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            floor: DEFAULT_FLOOR,
        }
    }
}

impl DispatchConfig {
    pub fn new(floor: f64) -> Result<Self, ConfigError> {
        if !(0.0..1.0).contains(&floor) {
            return Err(ConfigError::InvalidFloor(floor));
        }
        Ok(Self { floor })
    }
}

/// Fans each line out to all node workers and aggregates their scores
pub struct Dispatcher {
    workers: Vec<WorkerHandle>,
    results: mpsc::Receiver<NodeResult>,
    config: DispatchConfig,
    next_round: u64,
}

impl Dispatcher {
    /// Spawn one worker per node. Must be called within a tokio runtime.
    pub fn spawn(nodes: Vec<MatchNode>, config: DispatchConfig) -> Self {
        let (results_tx, results) = mpsc::channel(nodes.len().max(1));
        let workers = nodes
            .into_iter()
            .enumerate()
            .map(|(index, node)| WorkerHandle::spawn(index, node, results_tx.clone()))
            .collect();

        Self {
            workers,
            results,
            config,
            next_round: 0,
        }
    }

    /// Build nodes from validated rules and spawn them
    pub fn from_rules(rules: Vec<NodeRules>, config: DispatchConfig) -> Self {
        Self::spawn(rules.into_iter().map(MatchNode::new).collect(), config)
    }

    pub fn node_count(&self) -> usize {
        self.workers.len()
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.workers.iter().map(|w| &*w.name)
    }

    pub fn config(&self) -> DispatchConfig {
        self.config
    }

    /// Lower-case `line` and classify it
    pub async fn classify(&mut self, line: &str) -> Result<Option<Classification>, DispatchError> {
        self.classify_normalized(line.to_lowercase()).await
    }

    /// Classify a line that is already lower-cased
    pub async fn classify_normalized(
        &mut self,
        text: String,
    ) -> Result<Option<Classification>, DispatchError> {
        if self.workers.is_empty() {
            return Ok(None);
        }

        let round = self.next_round;
        self.next_round += 1;
        let item = Arc::new(LineItem { round, text });

        for worker in &self.workers {
            worker
                .lines
                .send(Arc::clone(&item))
                .await
                .map_err(|_| DispatchError::WorkerGone {
                    node: worker.name.to_string(),
                })?;
        }

        // barrier: one result per node for this line
        let mut slots: Vec<Option<NodeResult>> = vec![None; self.workers.len()];
        for _ in 0..self.workers.len() {
            let result = self
                .results
                .recv()
                .await
                .ok_or(DispatchError::ResultsClosed)?;
            if result.round != round {
                return Err(DispatchError::StaleResult {
                    expected: round,
                    got: result.round,
                });
            }
            let slot = &mut slots[result.index];
            if slot.is_some() {
                return Err(DispatchError::DuplicateResult {
                    node: result.node.to_string(),
                    round,
                });
            }
            *slot = Some(result);
        }

        let results: Vec<NodeResult> = slots.into_iter().flatten().collect();
        let winner = aggregate(&results, self.config.floor);
        match &winner {
            Some(w) => debug!(
                round,
                node = %w.node,
                score = w.score,
                decision = w.decision.kind(),
                "line classified"
            ),
            None => debug!(round, "no node passed the floor"),
        }
        Ok(winner)
    }

    /// Close every worker's input and wait for the tasks to finish
    pub async fn shutdown(self) {
        let Self { workers, results, .. } = self;
        drop(results);
        for worker in workers {
            let WorkerHandle { name, lines, task } = worker;
            drop(lines);
            if let Err(e) = task.await {
                warn!(node = %name, error = %e, "worker task failed");
            }
        }
    }
}
