//! Writer-backed sinks

use std::io::Write;

use fuzzytag_core::{Sink, SinkError, TaggedLine};

use crate::cli::Format;

/// Writes `node<TAB>line` per record
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for TextSink<W> {
    fn emit(&mut self, record: TaggedLine) -> Result<(), SinkError> {
        writeln!(self.out, "{}\t{}", record.node, record.line)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.out.flush()?;
        Ok(())
    }
}

/// Writes one JSON object per record: `{"line", "node", "score"}`
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for JsonLinesSink<W> {
    fn emit(&mut self, record: TaggedLine) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.out, &record)
            .map_err(|e| SinkError::Serialize(e.to_string()))?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.out.flush()?;
        Ok(())
    }
}

/// Sink for the requested format over `out`
pub fn sink_for<'a, W: Write + 'a>(format: Format, out: W) -> Box<dyn Sink + 'a> {
    match format {
        Format::Text => Box::new(TextSink::new(out)),
        Format::Jsonl => Box::new(JsonLinesSink::new(out)),
    }
}
