//! Core planning for token-targeted Cassandra scans: table schema, the host
//! engine's filter model, partition-key extraction, token resolution, and
//! the per-scan planner that turns pushed filters into partition-key filters.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod data_layer;
pub mod error;
pub mod filter;
pub mod obs;
pub mod plan;
pub mod schema;
pub mod serialize;
pub mod token;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, serializers, or config are re-exported here.
///

pub mod prelude {
    pub use crate::{
        data_layer::DataLayer,
        filter::{Filter, Literal},
        plan::{ScanPlan, ScanPlanner},
        schema::{ColumnKind, CqlField, CqlTable, CqlType},
        token::{PartitionKeyFilter, Partitioner, Token, TokenResolver},
    };
}
