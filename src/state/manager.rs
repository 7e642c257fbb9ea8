//! State loading, initialization, and merging
//!
//! A run starts from the merge of the saved state (if any) with a freshly
//! generated empty state, so newly selected streams get initial cursors
//! without disturbing the cursors of streams already in flight.

use super::types::{ShardStates, State, WrappedState};
use crate::catalog::Catalog;
use crate::config::SourceConfig;
use crate::cursor;
use crate::error::{Error, Result};
use crate::upstream::TableCursor;
use std::path::Path;

/// Load state from a file; a missing file yields an empty state
pub fn load(path: &Path) -> Result<State> {
    if !path.exists() {
        return Ok(State::new());
    }

    let contents = std::fs::read(path)
        .map_err(|e| Error::state(format!("failed to read state file: {e}")))?;
    parse(&contents)
}

/// Parse state file contents
///
/// The bare shape is tried first; when it decodes but carries zero streams,
/// the wrapped shape is tried as well and whichever yields a non-empty state
/// wins.
pub fn parse(contents: &[u8]) -> Result<State> {
    let state: State = serde_json::from_slice(contents)
        .map_err(|e| Error::state(format!("state file contents are invalid: {e}")))?;

    if state.streams.is_empty() {
        if let Ok(wrapped) = serde_json::from_slice::<WrappedState>(contents) {
            if !wrapped.value.streams.is_empty() {
                return Ok(wrapped.value);
            }
        }
    }

    Ok(state)
}

/// Write state to a file in the bare shape
pub fn write(path: &Path, state: &State) -> Result<()> {
    let contents = serde_json::to_vec(state)?;
    std::fs::write(path, contents)
        .map_err(|e| Error::state(format!("failed to write state file: {e}")))
}

/// Generate the initial state for a filtered catalog
///
/// Every selected stream gets one empty cursor per shard, with the keyspace
/// taken from the source's database name.
pub fn initialize(source: &SourceConfig, catalog: &Catalog, shards: &[String]) -> State {
    let mut shard_states = ShardStates::default();
    for shard in shards {
        let tc = TableCursor::start_of(shard, &source.database);
        shard_states
            .shards
            .insert(shard.clone(), cursor::encode(&tc));
    }

    let mut state = State::new();
    for stream in &catalog.streams {
        state
            .streams
            .insert(stream.name.clone(), shard_states.clone());
    }
    state
}

/// Merge a loaded state with the initial state
///
/// Loaded entries win for the streams they contain; streams absent from the
/// loaded state inherit the initial entry. Stale loaded entries for streams
/// no longer in the catalog are retained and ignored.
pub fn merge(loaded: State, initial: &State) -> State {
    let mut merged = loaded;
    for (stream, shard_states) in &initial.streams {
        merged
            .streams
            .entry(stream.clone())
            .or_insert_with(|| shard_states.clone());
    }
    merged
}
