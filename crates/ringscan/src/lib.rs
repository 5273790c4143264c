//! ## Crate layout
//! - `core`: schema, filter model, partition-key planning, tokens, config,
//!   observability, and plan serialization.
//! - `bridge`: Cassandra-compatible literal encoding and partitioner hashes.
//!
//! The `prelude` module carries the vocabulary a host-engine connector
//! needs to plan one token-targeted scan.

pub use ringscan_bridge as bridge;
pub use ringscan_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::error::InternalError as Error;

///
/// Connector Prelude
///

pub mod prelude {
    pub use crate::bridge::{CqlBridge, CqlDataLayer};
    pub use crate::core::prelude::*;
}
