//! Record sinks
//!
//! A sink receives the tap's output: stream schemas, records, and state
//! checkpoints. Two implementations exist: the Singer NDJSON writer used in
//! plain sync mode, and the HTTP batch sink that ships records to the
//! import API. For a given stream, every record between two `state` calls
//! belongs to the cursor window those states bracket.

mod batch;
mod singer;
mod types;

pub use batch::{HttpBatchSink, MAX_BATCH_BYTES, MAX_OBJECTS_IN_BATCH};
pub use singer::SingerSink;
pub use types::{BatchResponse, ImportBatch, ImportMessage, Record, SchemaMessage, StateMessage};

use crate::catalog::Stream;
use crate::error::Result;
use crate::state::State;
use async_trait::async_trait;

/// Where the tap's output goes
#[async_trait]
pub trait RecordSink: Send {
    /// Announce a stream's schema before its records
    async fn schema(&mut self, stream: &Stream) -> Result<()>;

    /// Emit one record
    async fn record(&mut self, record: Record, stream: &Stream) -> Result<()>;

    /// Push out everything buffered for a stream
    async fn flush(&mut self, stream: &Stream) -> Result<()>;

    /// Emit a state checkpoint
    async fn state(&mut self, state: &State) -> Result<()>;
}
