//! Singer and import message types

use crate::catalog::{Stream, StreamSchema};
use crate::state::State;
use crate::types::JsonObject;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A Singer RECORD message: one data point from one stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Constant `"RECORD"`
    #[serde(rename = "type")]
    pub kind: String,

    /// The stream this record belongs to
    pub stream: String,

    /// When this record was observed in the source, RFC3339 with nanoseconds
    pub time_extracted: String,

    /// The row contents
    #[serde(rename = "record")]
    pub data: JsonObject,
}

impl Record {
    /// Build a record observed now
    pub fn new(stream: &str, data: JsonObject) -> Self {
        Self {
            kind: "RECORD".to_string(),
            stream: stream.to_string(),
            time_extracted: Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
            data,
        }
    }
}

/// A Singer SCHEMA message wrapping a stream definition
#[derive(Debug, Serialize)]
pub struct SchemaMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    stream: &'a Stream,
}

impl<'a> SchemaMessage<'a> {
    pub fn new(stream: &'a Stream) -> Self {
        Self {
            kind: "SCHEMA",
            stream,
        }
    }
}

/// A Singer STATE message wrapping the current bookmarks
#[derive(Debug, Serialize)]
pub struct StateMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: &'a State,
}

impl<'a> StateMessage<'a> {
    pub fn new(state: &'a State) -> Self {
        Self {
            kind: "STATE",
            value: state,
        }
    }
}

/// One row shipped to the import API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportMessage {
    /// Constant `"upsert"`
    pub action: String,

    /// Milliseconds since the epoch at which the row was handed to the sink
    pub sequence: i64,

    /// The row contents
    pub data: JsonObject,
}

impl ImportMessage {
    /// Wrap a record for import
    pub fn from_record(record: Record) -> Self {
        Self {
            action: "upsert".to_string(),
            sequence: Utc::now().timestamp_millis(),
            data: record.data,
        }
    }
}

/// One POST body for the import API
///
/// Borrows its messages from the sink buffer so the greedy splitter can
/// re-measure candidate batches without copying rows.
#[derive(Debug, Serialize)]
pub struct ImportBatch<'a> {
    pub table_name: &'a str,
    pub schema: &'a StreamSchema,
    pub messages: &'a [ImportMessage],
    pub key_names: &'a [String],
}

impl<'a> ImportBatch<'a> {
    pub fn new(stream: &'a Stream, messages: &'a [ImportMessage]) -> Self {
        Self {
            table_name: &stream.name,
            schema: &stream.schema,
            messages,
            key_names: &stream.key_properties,
        }
    }

    /// The size of this batch once serialized
    pub fn size_of(&self) -> usize {
        serde_json::to_vec(self).map(|b| b.len()).unwrap_or(0)
    }
}

/// The import API's reply to a batch
#[derive(Debug, Clone, Deserialize)]
pub struct BatchResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}
