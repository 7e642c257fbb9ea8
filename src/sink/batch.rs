//! HTTP batch sink
//!
//! Accumulates records per stream and ships them to the import API in
//! size- and count-bounded batches, persisting state checkpoints to a
//! directory as they arrive.

use super::types::{BatchResponse, ImportBatch, ImportMessage, Record};
use super::RecordSink;
use crate::catalog::Stream;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RetryPolicy};
use crate::state::State;
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use tracing::{debug, info};

/// The import API rejects batches with more rows than this
pub const MAX_OBJECTS_IN_BATCH: usize = 1000;

/// The import API rejects request bodies larger than this
pub const MAX_BATCH_BYTES: usize = 2 * 1024 * 1024;

/// Sink that POSTs accumulated records to the import API
pub struct HttpBatchSink {
    batch_size: usize,
    api_url: String,
    state_dir: PathBuf,
    client: HttpClient,
    messages: Vec<ImportMessage>,
}

impl HttpBatchSink {
    /// Create a sink for the given API and state directory
    ///
    /// `batch_size` is the buffered-record count that triggers a flush; the
    /// hard per-request caps are [`MAX_OBJECTS_IN_BATCH`] and
    /// [`MAX_BATCH_BYTES`].
    pub fn new(
        api_url: impl Into<String>,
        api_token: &str,
        state_dir: impl Into<PathBuf>,
        batch_size: usize,
    ) -> Self {
        Self {
            batch_size: batch_size.max(1),
            api_url: api_url.into(),
            state_dir: state_dir.into(),
            client: HttpClient::new(Some(api_token.to_string()), RetryPolicy::default()),
            messages: Vec::with_capacity(batch_size),
        }
    }

    /// How many records are currently buffered
    pub fn buffered(&self) -> usize {
        self.messages.len()
    }
}

#[async_trait]
impl RecordSink for HttpBatchSink {
    async fn schema(&mut self, _stream: &Stream) -> Result<()> {
        Ok(())
    }

    async fn record(&mut self, record: Record, stream: &Stream) -> Result<()> {
        self.messages.push(ImportMessage::from_record(record));
        if self.messages.len() >= self.batch_size {
            self.flush(stream).await?;
        }
        Ok(())
    }

    async fn flush(&mut self, stream: &Stream) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }

        let batches = split_batches(&self.messages, stream);
        info!(
            "flushing [{}] messages for stream {:?} in [{}] batches",
            self.messages.len(),
            stream.name,
            batches.len()
        );

        let url = format!("{}/v2/import/batch", self.api_url);
        for batch in &batches {
            let body = serde_json::to_value(batch)?;
            let response = self
                .client
                .post_json(&url, &body)
                .await
                .map_err(|e| Error::sink(format!("server request failed: {e}")))?;

            if response.status().as_u16() > 203 {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::sink(format!("server request failed with {body}")));
            }

            let reply: BatchResponse = response
                .json()
                .await
                .map_err(|e| Error::sink(format!("server reply is not valid JSON: {e}")))?;
            debug!(
                "server response status: {:?}, message: {:?}",
                reply.status, reply.message
            );
        }

        self.messages.clear();
        Ok(())
    }

    async fn state(&mut self, state: &State) -> Result<()> {
        let contents = serde_json::to_vec(state)?;
        let path = self
            .state_dir
            .join(format!("state-{}.json", Utc::now().timestamp_millis()));
        info!("saving state to path: {}", path.display());

        std::fs::write(&path, contents)
            .map_err(|e| Error::sink(format!("unable to save state: {e}")))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644))
                .map_err(|e| Error::sink(format!("unable to set state file mode: {e}")))?;
        }

        Ok(())
    }
}

/// Split buffered messages into batches the import API will accept
///
/// Greedy halving: start each batch with every unallocated message and halve
/// its row count until both the serialized size and the row count fit. A
/// single message larger than the byte cap still ships alone rather than
/// halving to an empty batch.
pub(crate) fn split_batches<'a>(
    messages: &'a [ImportMessage],
    stream: &'a Stream,
) -> Vec<ImportBatch<'a>> {
    let mut batches = Vec::new();
    let mut allocated = 0;

    while allocated < messages.len() {
        let mut batch = ImportBatch::new(stream, &messages[allocated..]);

        while batch.size_of() > MAX_BATCH_BYTES || batch.messages.len() > MAX_OBJECTS_IN_BATCH {
            if batch.messages.len() <= 1 {
                break;
            }
            batch.messages = &batch.messages[..batch.messages.len() / 2];
        }

        allocated += batch.messages.len();
        batches.push(batch);
    }

    batches
}
