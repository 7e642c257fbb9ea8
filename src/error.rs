//! Error types for vitess-tap
//!
//! This module defines the error hierarchy for the whole tap.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for vitess-tap
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Startup Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Stream '{stream}' has no table-level metadata entry")]
    MissingStreamMetadata { stream: String },

    #[error("State error: {message}")]
    State { message: String },

    // ============================================================================
    // Discovery Errors
    // ============================================================================
    #[error("Metadata error: {message}")]
    Metadata { message: String },

    #[error("MySQL error: {0}")]
    Mysql(#[from] mysql_async::Error),

    // ============================================================================
    // Sync Errors
    // ============================================================================
    #[error("Unable to decode cursor: {message}")]
    CursorDecode { message: String },

    #[error(
        "state for this sync operation [{position}] is stale, \
         please restart a full sync to get the latest state"
    )]
    StalePosition { position: String },

    #[error("Unable to coerce value: {message}")]
    Coercion { message: String },

    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("gRPC error: {0}")]
    Grpc(#[from] tonic::Status),

    // ============================================================================
    // Sink Errors
    // ============================================================================
    #[error("Sink error: {message}")]
    Sink { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Create a metadata error
    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata {
            message: message.into(),
        }
    }

    /// Create a cursor decode error
    pub fn cursor_decode(message: impl Into<String>) -> Self {
        Self::CursorDecode {
            message: message.into(),
        }
    }

    /// Create a coercion error
    pub fn coercion(message: impl Into<String>) -> Self {
        Self::Coercion {
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Check if this error is retryable at the HTTP layer
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Errors that abort a sync run even when a cursor was already advanced
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::StalePosition { .. }
                | Error::CursorDecode { .. }
                | Error::Sink { .. }
                | Error::MaxRetriesExceeded { .. }
        )
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for vitess-tap
pub type Result<T> = std::result::Result<T, Error>;
