//! Sync driver
//!
//! Iterates the selected (stream, shard) pairs, runs one sync session per
//! pair, and emits `SCHEMA`/`RECORD`/`STATE` messages through the sink.
//! Every emitted `STATE` is a durable resume point.

mod session;

pub use session::{ReadParams, RowHandler, ShardReader, PEEK_TIMEOUT, READ_TIMEOUT};

use crate::catalog::{filter_catalog, Catalog, Stream};
use crate::coerce;
use crate::config::SourceConfig;
use crate::cursor;
use crate::error::Result;
use crate::metadata::MysqlAccess;
use crate::sink::RecordSink;
use crate::state::{self, State};
use crate::upstream::{QueryResult, TableCursor, TabletType};
use async_trait::async_trait;
use tracing::info;

/// Run a full sync of the selected catalog
///
/// The loaded state wins for streams it contains; newly selected streams
/// start from an empty cursor per shard. Returns the final state, which has
/// also been emitted through the sink.
#[allow(clippy::too_many_arguments)]
pub async fn sync(
    source: &SourceConfig,
    mysql: &dyn MysqlAccess,
    reader: &ShardReader,
    catalog: &Catalog,
    loaded_state: State,
    sink: &mut dyn RecordSink,
    tablet_type: TabletType,
) -> Result<State> {
    let filtered = filter_catalog(catalog)?;
    let shards = mysql.shard_names().await?;
    let initial = state::initialize(source, &filtered, &shards);
    let mut live = state::merge(loaded_state, &initial);

    for stream in &filtered.streams {
        sink.schema(stream).await?;

        let shard_states = if stream.incremental_sync_requested() {
            info!("stream {:?} will be synced incrementally", stream.name);
            live.stream(&stream.name).cloned().unwrap_or_default()
        } else {
            // a full-table stream always starts from the empty initial cursor
            initial.stream(&stream.name).cloned().unwrap_or_default()
        };

        for (shard, serialized) in &shard_states.shards {
            info!(
                "syncing rows from stream {:?} from shard {:?}",
                stream.name, shard
            );

            let start_cursor = match cursor::decode(serialized) {
                Ok(tc) => tc,
                Err(e) => {
                    let _ = sink.state(&live).await;
                    return Err(e);
                }
            };
            info!("stream's known position is {:?}", start_cursor.position);

            let params = ReadParams {
                stream,
                cursor: start_cursor,
                columns: stream.schema.properties.keys().cloned().collect(),
                tablet_type,
                cells: Vec::new(),
            };

            let mut emitter = StreamEmitter {
                sink: &mut *sink,
                stream,
                state: &mut live,
                shard,
                needs_flush: false,
            };

            match reader.read(params, Some(&mut emitter)).await {
                Ok(final_cursor) => {
                    sink.flush(stream).await?;
                    live.update(&stream.name, shard, final_cursor);
                    sink.state(&live).await?;
                }
                Err(e) => {
                    // restart resumes from the most advanced durable cursor
                    let _ = sink.flush(stream).await;
                    let _ = sink.state(&live).await;
                    return Err(e);
                }
            }
        }
    }

    sink.state(&live).await?;
    Ok(live)
}

/// Session handler that coerces rows into records and checkpoints cursors
struct StreamEmitter<'a> {
    sink: &'a mut dyn RecordSink,
    stream: &'a Stream,
    state: &'a mut State,
    shard: &'a str,
    needs_flush: bool,
}

#[async_trait]
impl RowHandler for StreamEmitter<'_> {
    async fn on_row(&mut self, result: &QueryResult) -> Result<()> {
        let Some(row) = result.rows.first() else {
            return Ok(());
        };
        let record = coerce::record_from_row(self.stream, &result.fields, row)?;
        self.needs_flush = true;
        self.sink.record(record, self.stream).await
    }

    async fn on_cursor(&mut self, cursor: &TableCursor) -> Result<()> {
        self.state
            .update(&self.stream.name, self.shard, cursor::encode(cursor));
        if self.needs_flush {
            self.sink.flush(self.stream).await?;
            self.needs_flush = false;
        }
        self.sink.state(self.state).await
    }
}
