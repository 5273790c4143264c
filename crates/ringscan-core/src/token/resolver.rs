use crate::{
    error::InternalError,
    schema::CqlTable,
    token::{Partitioner, Token},
};
use thiserror::Error as ThisError;

///
/// TokenResolver
///
/// Capability that encodes a complete partition-key tuple per the column
/// types and hashes it onto the ring. Implementations must be local
/// computation only; the planner calls them synchronously.
///

pub trait TokenResolver {
    /// `key` holds one textual literal per partition-key column, in
    /// declared key order.
    fn resolve(
        &self,
        table: &CqlTable,
        partitioner: Partitioner,
        key: &[String],
    ) -> Result<ResolvedKey, ResolveError>;
}

///
/// ResolvedKey
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedKey {
    pub key: Vec<u8>,
    pub token: Token,
}

impl ResolvedKey {
    #[must_use]
    pub const fn new(key: Vec<u8>, token: Token) -> Self {
        Self { key, token }
    }
}

///
/// ResolveError
///

#[derive(Debug, ThisError)]
pub enum ResolveError {
    #[error("{0}")]
    Encoding(#[from] KeyEncodingError),

    #[error("partition key arity mismatch: expected {expected} values, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("{0}")]
    Internal(Box<InternalError>),
}

impl From<InternalError> for ResolveError {
    fn from(err: InternalError) -> Self {
        Self::Internal(Box::new(err))
    }
}

///
/// KeyEncodingError
///
/// A pinned literal could not be converted to its column's native encoding.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("cannot encode value '{value}' for partition key column '{column}': {reason}")]
pub struct KeyEncodingError {
    pub column: String,
    pub value: String,
    pub reason: KeyEncodingReason,
}

impl KeyEncodingError {
    #[must_use]
    pub fn new(column: impl Into<String>, value: impl Into<String>, reason: KeyEncodingReason) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            reason,
        }
    }
}

///
/// KeyEncodingReason
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum KeyEncodingReason {
    #[error("not a valid {cql_type} literal")]
    InvalidLiteral { cql_type: String },

    #[error("out of range for {cql_type}")]
    OutOfRange { cql_type: String },

    #[error("type {cql_type} cannot be used in a partition key filter")]
    UnsupportedType { cql_type: String },

    #[error("component of {len} bytes exceeds the composite key limit of {max}")]
    ComponentTooLarge { len: usize, max: usize },
}
