//! Cassandra-compatible token resolution for `ringscan-core`: CQL literal
//! encoding, partition-key serialization, and the Murmur3 and Random
//! partitioner hashes.

mod bridge;
mod encode;
mod murmur3;
mod partitioner;

pub use bridge::{CqlBridge, CqlDataLayer};
pub use encode::{MAX_COMPONENT_LEN, compose_key, encode_literal};
pub use murmur3::hash3_x64_128;
pub use partitioner::token_for;
