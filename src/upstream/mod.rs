//! Upstream gRPC stream access
//!
//! The upstream exposes a single server-streaming `Sync` method that replays
//! rows for one table in one shard from a given cursor. This module wraps the
//! vendored generated client behind the [`SyncConnector`] trait so the sync
//! core can be exercised against scripted responses in tests.

pub mod proto;

use crate::config::SourceConfig;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;
use tonic::codec::CompressionEncoding;
use tonic::metadata::MetadataValue;
use tonic::transport::Endpoint;
use tonic::{Request, Status};

pub use proto::{
    Field, QueryResult, Row, SqlType, SyncRequest, SyncResponse, TableCursor, TabletType, Value,
};

/// The reserved cursor position asking the server to reply once with its
/// current position and end the stream.
pub const CURRENT_POSITION: &str = "current";

/// A server stream of sync responses
pub type SyncStream =
    Pin<Box<dyn Stream<Item = std::result::Result<SyncResponse, Status>> + Send>>;

/// Access to the upstream `Sync` method
///
/// One call corresponds to one gRPC invocation; the connection is opened per
/// call and closed when the returned stream is dropped.
#[async_trait]
pub trait SyncConnector: Send + Sync {
    /// Open a `Sync` stream for the given request with the given deadline
    async fn sync(
        &self,
        request: SyncRequest,
        deadline: Duration,
    ) -> std::result::Result<SyncStream, Status>;
}

/// Production connector dialing the upstream edge over TLS with basic auth
pub struct EdgeConnector {
    endpoint: String,
    username: String,
    password: String,
}

impl EdgeConnector {
    /// Create a connector for the given source
    pub fn new(source: &SourceConfig) -> Self {
        Self {
            endpoint: source.grpc_url(),
            username: source.username.clone(),
            password: source.password.clone(),
        }
    }

    fn basic_auth(&self) -> std::result::Result<MetadataValue<tonic::metadata::Ascii>, Status> {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
            .parse()
            .map_err(|_| Status::invalid_argument("credentials are not valid header values"))
    }
}

#[async_trait]
impl SyncConnector for EdgeConnector {
    async fn sync(
        &self,
        request: SyncRequest,
        deadline: Duration,
    ) -> std::result::Result<SyncStream, Status> {
        let channel = Endpoint::from_shared(self.endpoint.clone())
            .map_err(|e| Status::invalid_argument(format!("invalid upstream endpoint: {e}")))?
            .connect()
            .await
            .map_err(|e| Status::unavailable(format!("unable to dial upstream: {e}")))?;

        let mut client = proto::connect_client::ConnectClient::new(channel)
            .accept_compressed(CompressionEncoding::Gzip);

        let mut req = Request::new(request);
        req.set_timeout(deadline);
        req.metadata_mut().insert("authorization", self.basic_auth()?);

        let response = client.sync(req).await?;
        Ok(Box::pin(response.into_inner()))
    }
}

impl Value {
    /// Whether this value is a SQL NULL
    pub fn is_null(&self) -> bool {
        self.sql_type() == SqlType::NullType
    }

    /// Whether the persisted SQL type is floating point
    pub fn is_float(&self) -> bool {
        matches!(self.sql_type(), SqlType::Float32 | SqlType::Float64)
    }

    /// The SQL type of this value
    pub fn sql_type(&self) -> SqlType {
        SqlType::try_from(self.r#type).unwrap_or(SqlType::NullType)
    }

    /// The raw bytes as UTF-8, lossily
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }

    /// Build a typed value from a string representation
    pub fn from_str_value(sql_type: SqlType, value: &str) -> Self {
        Self {
            r#type: sql_type as i32,
            value: value.as_bytes().to_vec(),
        }
    }

    /// Build a SQL NULL value
    pub fn null() -> Self {
        Self {
            r#type: SqlType::NullType as i32,
            value: Vec::new(),
        }
    }
}

impl TableCursor {
    /// Cursor for the start of a shard: empty position, no resume key
    pub fn start_of(shard: &str, keyspace: &str) -> Self {
        Self {
            shard: shard.to_string(),
            keyspace: keyspace.to_string(),
            position: String::new(),
            last_known_pk: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_helpers() {
        let v = Value::from_str_value(SqlType::Float64, "3.14");
        assert!(v.is_float());
        assert!(!v.is_null());
        assert_eq!(v.as_text(), "3.14");

        let n = Value::null();
        assert!(n.is_null());
        assert!(!n.is_float());
    }

    #[test]
    fn test_start_of_cursor() {
        let tc = TableCursor::start_of("-", "commerce");
        assert_eq!(tc.shard, "-");
        assert_eq!(tc.keyspace, "commerce");
        assert!(tc.position.is_empty());
        assert!(tc.last_known_pk.is_none());
    }
}
