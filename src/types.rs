//! Common types used throughout vitess-tap
//!
//! This module contains shared type definitions and type aliases used
//! across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Replication Method
// ============================================================================

/// The Singer replication method requested for a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicationMethod {
    /// Re-sync the whole table every run
    FullTable,
    /// Resume from the saved cursor
    Incremental,
    /// Follow the replication log
    LogBased,
}

// ============================================================================
// Inclusion
// ============================================================================

/// Whether a schema node is emitted, selectable, or unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inclusion {
    /// Emitted only when selected
    Available,
    /// Always emitted, regardless of selection
    Automatic,
    /// Present in the source but cannot be emitted
    Unsupported,
}

// ============================================================================
// Backoff Type
// ============================================================================

/// How the wait between HTTP retries grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replication_method_serde() {
        let method: ReplicationMethod = serde_json::from_str("\"INCREMENTAL\"").unwrap();
        assert_eq!(method, ReplicationMethod::Incremental);

        let json = serde_json::to_string(&ReplicationMethod::FullTable).unwrap();
        assert_eq!(json, "\"FULL_TABLE\"");
    }

    #[test]
    fn test_inclusion_serde() {
        let inc: Inclusion = serde_json::from_str("\"automatic\"").unwrap();
        assert_eq!(inc, Inclusion::Automatic);

        let json = serde_json::to_string(&Inclusion::Available).unwrap();
        assert_eq!(json, "\"available\"");
    }

    #[test]
    fn test_backoff_type_default() {
        assert_eq!(BackoffType::default(), BackoffType::Exponential);
    }
}
