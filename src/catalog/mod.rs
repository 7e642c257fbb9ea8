//! Catalog model and selection filter
//!
//! Types for the Singer catalog document plus the projection applied before
//! a sync run.

mod filter;
mod types;

pub use filter::{filter_catalog, validate_catalog};
pub use types::{
    Catalog, Metadata, MetadataCollection, NodeMetadata, Stream, StreamProperty, StreamSchema,
};
