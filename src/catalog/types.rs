//! Catalog types
//!
//! The Singer catalog enumerates streams (tables) with their JSON schema and
//! selection metadata. These types are serialized to and from the catalog
//! file exchanged with downstream tooling.

use crate::error::{Error, Result};
use crate::types::{Inclusion, ReplicationMethod};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A Singer catalog: the set of discoverable or selected streams
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Message type marker, set on filtered catalogs
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// The streams in this catalog
    #[serde(default)]
    pub streams: Vec<Stream>,
}

/// A single table's schema, metadata, and identity in Singer terms
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stream {
    /// The name of the stream
    #[serde(rename = "stream")]
    pub name: String,

    /// The unique identifier for the stream; allowed to differ from the name
    /// so sources with duplicate stream names stay addressable
    #[serde(rename = "tap_stream_id")]
    pub id: String,

    /// The JSON schema for the stream
    pub schema: StreamSchema,

    /// The name of the backing table
    #[serde(rename = "table-name")]
    pub table_name: String,

    /// Selection metadata for the stream and each of its properties
    #[serde(default)]
    pub metadata: MetadataCollection,

    /// Properties that make up the primary key for this stream
    #[serde(default)]
    pub key_properties: Vec<String>,

    /// Properties the tap uses as bookmarks
    #[serde(rename = "bookmark_properties", default)]
    pub cursor_properties: Vec<String>,
}

impl Stream {
    /// Whether the table-level metadata requests incremental replication
    pub fn incremental_sync_requested(&self) -> bool {
        self.metadata.table_metadata(&self.name).is_ok_and(|m| {
            m.metadata.replication_method == Some(ReplicationMethod::Incremental)
        })
    }

    /// Generate discovery-time metadata entries for this stream
    ///
    /// The stream entry carries the key properties; key columns are marked
    /// `automatic`, every other column `available` with `selected` mirroring
    /// the auto-select flag. Column entries record the raw SQL type.
    pub fn generate_metadata(
        &mut self,
        keys: &[String],
        sql_types: &BTreeMap<String, String>,
        database: &str,
        auto_select: bool,
        default_incremental: bool,
    ) {
        let mut entries = Vec::with_capacity(self.schema.properties.len() + 1);

        entries.push(Metadata {
            metadata: NodeMetadata {
                selected: auto_select,
                inclusion: Some(Inclusion::Available),
                replication_method: default_incremental.then_some(ReplicationMethod::Incremental),
                table_key_properties: keys.to_vec(),
                valid_replication_keys: keys.to_vec(),
                schema_name: self.name.clone(),
                database_name: database.to_string(),
                breadcrumb: Vec::new(),
                ..NodeMetadata::default()
            },
        });

        for name in self.schema.properties.keys() {
            let is_key = keys.contains(name);
            entries.push(Metadata {
                metadata: NodeMetadata {
                    selected: auto_select && !is_key,
                    inclusion: Some(if is_key {
                        Inclusion::Automatic
                    } else {
                        Inclusion::Available
                    }),
                    sql_datatype: sql_types.get(name).cloned().unwrap_or_default(),
                    breadcrumb: vec!["properties".to_string(), name.clone()],
                    ..NodeMetadata::default()
                },
            });
        }

        self.metadata = MetadataCollection(entries);
    }
}

/// The JSON schema of a stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamSchema {
    /// JSON types of the stream object itself
    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Whether properties outside the schema are allowed
    #[serde(rename = "additionalProperties", default)]
    pub additional_properties: bool,

    /// Per-column property definitions
    #[serde(default)]
    pub properties: BTreeMap<String, StreamProperty>,
}

impl StreamSchema {
    /// A schema for a nullable object with the given properties
    pub fn object(properties: BTreeMap<String, StreamProperty>) -> Self {
        Self {
            types: vec!["null".to_string(), "object".to_string()],
            additional_properties: false,
            properties,
        }
    }
}

/// The JSON schema of a single column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamProperty {
    /// JSON types this property may take
    #[serde(rename = "type")]
    pub types: Vec<String>,

    /// Optional Singer format annotation, e.g. `date-time`
    #[serde(rename = "format", default, skip_serializing_if = "Option::is_none")]
    pub custom_format: Option<String>,
}

impl StreamProperty {
    /// A nullable property with the given JSON type
    pub fn of(json_type: &str) -> Self {
        Self {
            types: vec!["null".to_string(), json_type.to_string()],
            custom_format: None,
        }
    }

    /// A nullable property with a format annotation
    pub fn with_format(json_type: &str, format: &str) -> Self {
        Self {
            types: vec!["null".to_string(), json_type.to_string()],
            custom_format: Some(format.to_string()),
        }
    }

    pub fn is_date_time(&self) -> bool {
        self.custom_format.as_deref() == Some("date-time")
    }

    pub fn is_integer(&self) -> bool {
        self.types.iter().any(|t| t == "integer")
    }

    pub fn is_number(&self) -> bool {
        self.types.iter().any(|t| t == "number")
    }

    pub fn is_boolean(&self) -> bool {
        self.types.iter().any(|t| t == "boolean")
    }
}

/// The ordered metadata entries of a stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataCollection(pub Vec<Metadata>);

impl MetadataCollection {
    /// The stream-level entry: the one with an empty breadcrumb
    pub fn table_metadata(&self, stream: &str) -> Result<&Metadata> {
        self.0
            .iter()
            .find(|m| m.metadata.breadcrumb.is_empty())
            .ok_or_else(|| Error::MissingStreamMetadata {
                stream: stream.to_string(),
            })
    }

    /// Column name → metadata entry, for entries with a property breadcrumb
    pub fn property_map(&self) -> HashMap<&str, &Metadata> {
        self.0
            .iter()
            .filter_map(|m| match m.metadata.breadcrumb.as_slice() {
                [kind, name] if kind == "properties" => Some((name.as_str(), m)),
                _ => None,
            })
            .collect()
    }
}

/// One metadata entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub metadata: NodeMetadata,
}

/// The metadata node for a stream or one of its properties
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Whether the user selected this node for replication
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,

    /// The replication method to use for a stream
    #[serde(
        rename = "replication-method",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub replication_method: Option<ReplicationMethod>,

    /// The property used as a bookmark when replicating incrementally
    #[serde(
        rename = "replication-key",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub replication_key: String,

    /// Whether the node is emitted, selectable, or unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusion: Option<Inclusion>,

    /// Whether the node is replicated when the user expressed no opinion
    #[serde(
        rename = "selected-by-default",
        default,
        skip_serializing_if = "is_false"
    )]
    pub selected_by_default: bool,

    /// Properties that may serve as replication keys
    #[serde(
        rename = "valid-replication-keys",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub valid_replication_keys: Vec<String>,

    /// Replication method forced by the tap
    #[serde(
        rename = "forced-replication-method",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub forced_replication_method: Option<ReplicationMethod>,

    /// Key properties of the backing table
    #[serde(
        rename = "table-key-properties",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub table_key_properties: Vec<String>,

    /// The name of the stream
    #[serde(
        rename = "schema-name",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub schema_name: String,

    /// Whether the stream corresponds to a database view
    #[serde(rename = "is-view", default, skip_serializing_if = "is_false")]
    pub is_view: bool,

    /// Name of the source database
    #[serde(
        rename = "database-name",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub database_name: String,

    /// The raw SQL type of a column, as reported by the source
    #[serde(
        rename = "sql-datatype",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub sql_datatype: String,

    /// Path into the schema to the node this metadata belongs to.
    /// Empty for the stream itself, `["properties", <col>]` for a column.
    pub breadcrumb: Vec<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}
