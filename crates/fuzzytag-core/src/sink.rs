//! Output boundary
//!
//! The core hands every accepted line to a [`Sink`]. Where the records end up
//! (console, structured file) is the sink's business.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a sink can report
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize record: {0}")]
    Serialize(String),
}

/// A line tagged with the node that won it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedLine {
    /// Original input line, before extraction and normalization
    pub line: String,
    pub node: String,
    pub score: f64,
}

/// Receiver of tagged lines
pub trait Sink {
    fn emit(&mut self, record: TaggedLine) -> Result<(), SinkError>;

    /// Called once after the last record
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl Sink for Vec<TaggedLine> {
    fn emit(&mut self, record: TaggedLine) -> Result<(), SinkError> {
        self.push(record);
        Ok(())
    }
}
