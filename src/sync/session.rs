//! Per-(stream, shard) sync session
//!
//! One session syncs the rows available up to the position the upstream
//! reports at session start, then returns the advanced cursor:
//!
//! 1. Peek the upstream's current position for the shard; that position is
//!    the stop position for this session.
//! 2. Stream from the saved cursor, adopting each cursor the server sends.
//! 3. Once the stop position has been observed, a cursor past it ends the
//!    session at the stop position.
//!
//! Server timeouts are benign: the loop peeks again and keeps going from the
//! advanced cursor. A purged-binlogs error is fatal, reported against the
//! position the session started from.

use crate::catalog::Stream;
use crate::cursor;
use crate::error::{Error, Result};
use crate::state::SerializedCursor;
use crate::upstream::{
    QueryResult, SyncConnector, SyncRequest, TableCursor, TabletType, CURRENT_POSITION,
};
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tonic::{Code, Status};
use tracing::info;

/// Deadline for the position peek at session start
pub const PEEK_TIMEOUT: Duration = Duration::from_secs(45);

/// Deadline for one streaming call
pub const READ_TIMEOUT: Duration = Duration::from_secs(90);

const BINLOGS_PURGED_MESSAGE: &str =
    "Cannot replicate because the master purged required binary logs";

/// Receives the session's output
///
/// `on_row` performs value coercion and record emission; `on_cursor`
/// persists the advanced cursor. The upstream orders a response's cursor
/// before its rows, so `on_cursor` fires only after the rows beneath that
/// cursor have been handed to `on_row`.
#[async_trait]
pub trait RowHandler: Send {
    /// One row, packaged with its field list
    async fn on_row(&mut self, result: &QueryResult) -> Result<()>;

    /// The cursor advanced past the rows delivered so far
    async fn on_cursor(&mut self, cursor: &TableCursor) -> Result<()>;
}

/// Inputs for one session
pub struct ReadParams<'a> {
    /// The stream being synced
    pub stream: &'a Stream,
    /// Where to resume from
    pub cursor: TableCursor,
    /// Columns to request from the upstream
    pub columns: Vec<String>,
    /// Which tablet role serves the stream
    pub tablet_type: TabletType,
    /// Cells to restrict tablet selection to
    pub cells: Vec<String>,
}

enum SessionEnd {
    /// A cursor past the stop position was seen; the window is drained
    StopPositionPassed,
    /// The server ended the stream before the stop position
    ServerEof,
    /// The call failed with a gRPC status
    Failed(Status),
}

/// Streams one (stream, shard) from a saved cursor to the peeked stop position
pub struct ShardReader {
    connector: Arc<dyn SyncConnector>,
}

impl ShardReader {
    /// Create a reader on top of the given connector
    pub fn new(connector: Arc<dyn SyncConnector>) -> Self {
        Self { connector }
    }

    /// Sync rows available up to the upstream's current position, then return
    /// the advanced cursor. A `None` handler drops rows and cursors.
    pub async fn read<'h>(
        &self,
        params: ReadParams<'_>,
        mut handler: Option<&mut (dyn RowHandler + 'h)>,
    ) -> Result<SerializedCursor> {
        let original_position = params.cursor.position.clone();
        let mut current = params.cursor.clone();
        let preamble = format!(
            "[table: {}, shard: {}, tablet: {}]",
            params.stream.name,
            current.shard,
            params.tablet_type.as_str_name()
        );

        loop {
            info!("{preamble} peeking to see if there are any new rows");
            let stop_position = match self.peek(&params, &current).await {
                Ok(position) => position,
                Err(status) => {
                    info!("{preamble} unable to read the current position: {status}");
                    return Ok(cursor::encode(&current));
                }
            };

            if stop_position.is_empty() {
                info!("{preamble} no stop position available, not streaming");
                return Ok(cursor::encode(&current));
            }

            // the current position is the last synced one: no new rows
            if stop_position == current.position && current.last_known_pk.is_none() {
                info!("{preamble} no new rows found, exiting");
                return Ok(cursor::encode(&current));
            }

            info!(
                "{preamble} syncing rows from position {:?} up to {:?}",
                current.position, stop_position
            );

            let end = match tokio::time::timeout(
                READ_TIMEOUT,
                self.sync_once(&params, &mut current, &stop_position, handler.as_deref_mut()),
            )
            .await
            {
                Ok(end) => end?,
                Err(_elapsed) => {
                    info!("{preamble} continuing with cursor after server timeout");
                    continue;
                }
            };

            match end {
                SessionEnd::StopPositionPassed | SessionEnd::ServerEof => {
                    info!(
                        "{preamble} finished reading all rows for table {:?}",
                        params.stream.name
                    );
                    return Ok(cursor::encode(&current));
                }
                SessionEnd::Failed(status) => {
                    if status.code() == Code::Unknown
                        && status.message().contains(BINLOGS_PURGED_MESSAGE)
                    {
                        info!("{preamble} binlogs are purged, state is stale");
                        return Err(Error::StalePosition {
                            position: original_position,
                        });
                    }
                    if status.code() == Code::DeadlineExceeded {
                        info!("{preamble} continuing with cursor after server timeout");
                        continue;
                    }
                    info!(
                        "{preamble} got status [{:?}], returning with current cursor",
                        status.code()
                    );
                    return Ok(cursor::encode(&current));
                }
            }
        }
    }

    /// One streaming call from the current cursor toward the stop position
    async fn sync_once<'h>(
        &self,
        params: &ReadParams<'_>,
        current: &mut TableCursor,
        stop_position: &str,
        mut handler: Option<&mut (dyn RowHandler + 'h)>,
    ) -> Result<SessionEnd> {
        let mut request_cursor = current.clone();
        if let Some(pk) = request_cursor.last_known_pk.as_mut() {
            // the upstream interprets a cursor with a resume key as
            // "continue the table scan from this primary key"
            filter_pk_fields(pk, params.stream);
            request_cursor.position = String::new();
        }
        *current = request_cursor.clone();

        let request = SyncRequest {
            table_name: params.stream.name.clone(),
            cursor: Some(request_cursor),
            tablet_type: params.tablet_type as i32,
            columns: params.columns.clone(),
            cells: params.cells.clone(),
        };

        let mut responses = match self.connector.sync(request, READ_TIMEOUT).await {
            Ok(stream) => stream,
            Err(status) => return Ok(SessionEnd::Failed(status)),
        };

        let mut stop_seen = false;

        loop {
            let response = match responses.next().await {
                Some(Ok(response)) => response,
                Some(Err(status)) => return Ok(SessionEnd::Failed(status)),
                None => return Ok(SessionEnd::ServerEof),
            };

            if let Some(advanced) = response.cursor.clone() {
                // a cursor past the stop position means the window is
                // drained; it is not adopted, the session ends at the stop
                if stop_seen && advanced.position != stop_position {
                    return Ok(SessionEnd::StopPositionPassed);
                }
                *current = advanced;
            }
            stop_seen = stop_seen || current.position == stop_position;

            for result in &response.result {
                for row in &result.rows {
                    let row_result = QueryResult {
                        fields: result.fields.clone(),
                        rows: vec![row.clone()],
                    };
                    if let Some(h) = handler.as_mut() {
                        h.on_row(&row_result).await?;
                    }
                }
            }

            if response.cursor.is_some() {
                if let Some(h) = handler.as_mut() {
                    h.on_cursor(current).await?;
                }
            }
        }
    }

    /// Ask the upstream for the shard's current position
    ///
    /// Best effort: any failure here leaves the caller's cursor untouched.
    async fn peek(
        &self,
        params: &ReadParams<'_>,
        current: &TableCursor,
    ) -> std::result::Result<String, Status> {
        let request = SyncRequest {
            table_name: params.stream.name.clone(),
            cursor: Some(TableCursor {
                shard: current.shard.clone(),
                keyspace: current.keyspace.clone(),
                position: CURRENT_POSITION.to_string(),
                last_known_pk: None,
            }),
            tablet_type: params.tablet_type as i32,
            columns: Vec::new(),
            cells: Vec::new(),
        };

        let read_position = async {
            let mut responses = self.connector.sync(request, PEEK_TIMEOUT).await?;
            while let Some(response) = responses.next().await.transpose()? {
                if let Some(cursor) = response.cursor {
                    return Ok(cursor.position);
                }
            }
            Ok(String::new())
        };

        match tokio::time::timeout(PEEK_TIMEOUT, read_position).await {
            Ok(result) => result,
            Err(_elapsed) => Err(Status::deadline_exceeded("peek timed out")),
        }
    }
}

/// Drop resume-key fields that are not part of the stream's primary key
///
/// The resume key may carry every field of the table; the field → value
/// mapping is ordinal, and the original field order is preserved.
fn filter_pk_fields(pk: &mut QueryResult, stream: &Stream) {
    pk.fields
        .retain(|field| stream.key_properties.contains(&field.name));
}
