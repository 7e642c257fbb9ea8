//! Singer NDJSON sink
//!
//! Writes one JSON object per line to the given writer, usually stdout.
//! Records are buffered and written out on flush, or earlier when the
//! buffer fills.

use super::types::{Record, SchemaMessage, StateMessage};
use super::RecordSink;
use crate::catalog::Stream;
use crate::error::Result;
use crate::state::State;
use async_trait::async_trait;
use std::io::Write;

/// Records buffered before a forced write
const DEFAULT_BUFFER_SIZE: usize = 10_000;

/// NDJSON writer for Singer messages
pub struct SingerSink<W: Write + Send> {
    out: W,
    records: Vec<Record>,
    buffer_size: usize,
}

impl SingerSink<std::io::Stdout> {
    /// A sink writing to stdout with the default buffer size
    pub fn stdout() -> Self {
        Self::new(std::io::stdout(), DEFAULT_BUFFER_SIZE)
    }
}

impl<W: Write + Send> SingerSink<W> {
    /// A sink writing to the given writer
    pub fn new(out: W, buffer_size: usize) -> Self {
        Self {
            out,
            records: Vec::with_capacity(buffer_size.min(DEFAULT_BUFFER_SIZE)),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Consume the sink and return its writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_records(&mut self) -> Result<()> {
        for record in self.records.drain(..) {
            serde_json::to_writer(&mut self.out, &record)?;
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }
}

#[async_trait]
impl<W: Write + Send> RecordSink for SingerSink<W> {
    async fn schema(&mut self, stream: &Stream) -> Result<()> {
        serde_json::to_writer(&mut self.out, &SchemaMessage::new(stream))?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    async fn record(&mut self, record: Record, _stream: &Stream) -> Result<()> {
        self.records.push(record);
        if self.records.len() >= self.buffer_size {
            self.write_records()?;
        }
        Ok(())
    }

    async fn flush(&mut self, _stream: &Stream) -> Result<()> {
        self.write_records()?;
        self.out.flush()?;
        Ok(())
    }

    async fn state(&mut self, state: &State) -> Result<()> {
        serde_json::to_writer(&mut self.out, &StateMessage::new(state))?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
