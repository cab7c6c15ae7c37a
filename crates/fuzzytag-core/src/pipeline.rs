//! Line pipeline
//!
//! Reads lines from a [`BufRead`], optionally extracts one field, normalizes,
//! classifies through the [`Dispatcher`] and forwards winners to a [`Sink`].
//! Per-line anomalies skip the line; only I/O, dispatch and sink failures
//! end the run.

use std::io::BufRead;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::dispatch::{DispatchError, Dispatcher};
use crate::sink::{Sink, SinkError, TaggedLine};

/// Extracted text of this many bytes or fewer is skipped
pub const MIN_LINE_LEN: usize = 2;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// How raw lines become classifier input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineOptions {
    /// Field separator; the whole line is used when unset
    pub separator: Option<String>,
    /// Zero-based field index, used with `separator`
    pub position: usize,
    /// Phrases deleted from the lower-cased text before matching
    pub remove: Vec<String>,
}

impl LineOptions {
    /// Turn a raw line into classifier input, or `None` to skip it
    pub fn prepare(&self, raw: &str) -> Option<String> {
        let field = match self.separator.as_deref().filter(|s| !s.is_empty()) {
            Some(sep) => raw.split(sep).nth(self.position)?.trim_matches(' '),
            None => raw,
        };

        if field.len() <= MIN_LINE_LEN {
            return None;
        }

        let mut text = field.to_lowercase();
        for phrase in &self.remove {
            if !phrase.is_empty() {
                text = text.replace(phrase.as_str(), "");
            }
        }
        Some(text)
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub read: u64,
    /// Too short, or not enough fields
    pub skipped: u64,
    /// Not valid UTF-8
    pub malformed: u64,
    pub matched: u64,
    /// Classified with no winner
    pub dropped: u64,
}

pub struct Pipeline {
    dispatcher: Dispatcher,
    options: LineOptions,
}

impl Pipeline {
    pub fn new(dispatcher: Dispatcher, mut options: LineOptions) -> Self {
        options.remove = options
            .remove
            .into_iter()
            .map(|p| p.to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self {
            dispatcher,
            options,
        }
    }

    /// Classify every line of `reader`, emitting winners into `sink`
    pub async fn run<R, S>(
        &mut self,
        mut reader: R,
        sink: &mut S,
    ) -> Result<RunStats, PipelineError>
    where
        R: BufRead,
        S: Sink + ?Sized,
    {
        info!(
            nodes = self.dispatcher.node_count(),
            floor = self.dispatcher.config().floor,
            separator = ?self.options.separator,
            position = self.options.position,
            "classification started"
        );

        let mut stats = RunStats::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            stats.read += 1;

            let raw = match std::str::from_utf8(&buf) {
                Ok(s) => s.trim_end_matches(['\n', '\r']),
                Err(e) => {
                    warn!(line = stats.read, error = %e, "skipping malformed line");
                    stats.malformed += 1;
                    continue;
                }
            };

            let Some(text) = self.options.prepare(raw) else {
                stats.skipped += 1;
                continue;
            };

            match self.dispatcher.classify_normalized(text).await? {
                Some(winner) => {
                    debug!(line = stats.read, node = %winner.node, score = winner.score, "match");
                    sink.emit(TaggedLine {
                        line: raw.to_string(),
                        node: winner.node.to_string(),
                        score: winner.score,
                    })?;
                    stats.matched += 1;
                }
                None => stats.dropped += 1,
            }
        }

        sink.finish()?;

        info!(
            read = stats.read,
            matched = stats.matched,
            dropped = stats.dropped,
            skipped = stats.skipped,
            malformed = stats.malformed,
            "classification finished"
        );
        Ok(stats)
    }

    /// Stop the node workers
    pub async fn shutdown(self) {
        self.dispatcher.shutdown().await;
    }
}
