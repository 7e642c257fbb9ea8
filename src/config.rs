//! Source configuration
//!
//! The Singer config file carries the credentials for the upstream database.
//! Everything else (tablet selection, sink choice, discovery options) comes
//! in through CLI flags.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Credentials and identity of the upstream database
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Hostname of the upstream edge; serves both the gRPC stream and the
    /// MySQL metadata endpoint
    pub host: String,

    /// Username for both endpoints
    pub username: String,

    /// Password for both endpoints
    pub password: String,

    /// The keyspace to sync
    pub database: String,
}

impl SourceConfig {
    /// Load a source config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("failed to read config file: {e}")))?;
        let config: SourceConfig = serde_json::from_str(&contents)
            .map_err(|e| Error::config(format!("config file contents are invalid: {e}")))?;

        if config.host.is_empty() {
            return Err(Error::config("config is missing 'host'"));
        }
        if config.database.is_empty() {
            return Err(Error::config("config is missing 'database'"));
        }

        Ok(config)
    }

    /// The gRPC endpoint URL for the upstream `Sync` service
    pub fn grpc_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            self.host.clone()
        } else {
            format!("https://{}", self.host)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"host":"aws.connect.psdb.cloud","username":"tap","password":"pw","database":"commerce"}}"#
        )
        .unwrap();

        let config = SourceConfig::from_file(file.path()).unwrap();
        assert_eq!(config.host, "aws.connect.psdb.cloud");
        assert_eq!(config.database, "commerce");
    }

    #[test]
    fn test_from_file_rejects_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"username":"tap"}}"#).unwrap();

        let err = SourceConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_grpc_url() {
        let config = SourceConfig {
            host: "edge.example.com".to_string(),
            ..SourceConfig::default()
        };
        assert_eq!(config.grpc_url(), "https://edge.example.com");

        let config = SourceConfig {
            host: "http://localhost:8081".to_string(),
            ..SourceConfig::default()
        };
        assert_eq!(config.grpc_url(), "http://localhost:8081");
    }
}
