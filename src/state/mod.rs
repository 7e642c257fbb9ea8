//! State management
//!
//! Persistence model for sync progress: stream → shard → serialized cursor.

mod manager;
mod types;

pub use manager::{initialize, load, merge, parse, write};
pub use types::{SerializedCursor, ShardStates, State, WrappedState};

#[cfg(test)]
mod manager_tests;
