//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs. Two
//! on-disk shapes are accepted on load: the bare `{"bookmarks": {...}}`
//! object and the wrapped `{"type":"STATE","value":{...}}` form some
//! producers emit. Only the bare shape is written.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything known about previous sync runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream shard cursors
    #[serde(rename = "bookmarks", default)]
    pub streams: BTreeMap<String, ShardStates>,
}

/// The cursors of one stream, one per shard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardStates {
    #[serde(default)]
    pub shards: BTreeMap<String, SerializedCursor>,
}

/// The persisted form of a table cursor: base64 of its wire encoding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedCursor {
    pub cursor: String,
}

/// The wrapped on-disk state shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WrappedState {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub value: State,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// The shard cursors for a stream, if any
    pub fn stream(&self, stream: &str) -> Option<&ShardStates> {
        self.streams.get(stream)
    }

    /// Replace the cursor for one (stream, shard)
    pub fn update(&mut self, stream: &str, shard: &str, cursor: SerializedCursor) {
        self.streams
            .entry(stream.to_string())
            .or_default()
            .shards
            .insert(shard.to_string(), cursor);
    }
}
