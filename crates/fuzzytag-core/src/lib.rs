//! fuzzytag Core Engine
//!
//! Tags lines of text with the best-scoring of several independently
//! configured fuzzy/phonetic match nodes.
//!
//! - [`fuzzy`] - windowed Jaro similarity, Soundex-style codes, word matcher
//! - [`config`] - node configuration and validation
//! - [`node`] - per-node rule evaluation (exclusions, requirements, literals, fuzzy)
//! - [`dispatch`] - persistent per-node workers and winner aggregation
//! - [`pipeline`] - line extraction/normalization driving the dispatcher
//! - [`sink`] - output boundary
//!
//! # Example
//!
//! ```rust
//! use fuzzytag_core::config::MatchNodeConfig;
//! use fuzzytag_core::dispatch::{evaluate_sequential, DEFAULT_FLOOR};
//! use fuzzytag_core::node::MatchNode;
//!
//! let mut nodes = vec![
//!     MatchNode::new(MatchNodeConfig::fuzzy("A", "apple").validate(0.5).unwrap()),
//!     MatchNode::new(MatchNodeConfig::fuzzy("B", "orange").validate(0.5).unwrap()),
//! ];
//!
//! let winner = evaluate_sequential(&mut nodes, "I bought an appel today", DEFAULT_FLOOR).unwrap();
//! assert_eq!(&*winner.node, "A");
//! ```

pub mod config;
pub mod dispatch;
pub mod fuzzy;
pub mod node;
pub mod pipeline;
pub mod sink;

// Re-export main types at crate root
pub use config::{validate_nodes, ConfigError, MatchNodeConfig, NodeRules, DEFAULT_THRESHOLD};
pub use dispatch::{Classification, DispatchConfig, DispatchError, Dispatcher, DEFAULT_FLOOR};
pub use fuzzy::{jaro_similarity, phonetic_code, FuzzyOutcome};
pub use node::{Decision, MatchNode};
pub use pipeline::{LineOptions, Pipeline, PipelineError, RunStats};
pub use sink::{Sink, SinkError, TaggedLine};
