//! Scan planning: partition-key extraction, key combination, token
//! resolution, and pushdown negotiation with the host engine.
//!
//! Determinism: given the same table, pushed filters, and resolver, the
//! planner produces identical partition-key filters in ring order.

mod combine;
mod extract;
mod planner;
mod scan;

pub use combine::{cartesian_product, combination_count};
pub use extract::{ColumnValues, extract_partition_key_values};
pub use planner::{PlannerState, ScanPlanner};
pub use scan::ScanPlan;

use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    token::{KeyEncodingError, ResolveError},
};
use thiserror::Error as ThisError;

///
/// PlanError
///

#[derive(Debug, ThisError)]
pub enum PlanError {
    #[error("{0}")]
    KeyEncoding(#[from] KeyEncodingError),

    #[error("partition key arity mismatch: expected {expected} values, found {found}")]
    KeyArity { expected: usize, found: usize },

    #[error("partition key combinations exceed limit: {requested} > {limit}")]
    CardinalityExceeded { requested: u128, limit: u64 },

    #[error("unknown column '{column}' in projection of {keyspace}.{table}")]
    UnknownColumn {
        keyspace: String,
        table: String,
        column: String,
    },

    #[error("{0}")]
    Resolver(Box<InternalError>),
}

impl PlanError {
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::KeyEncoding(_) | Self::UnknownColumn { .. } => ErrorClass::InvalidInput,
            Self::KeyArity { .. } => ErrorClass::InvariantViolation,
            Self::CardinalityExceeded { .. } => ErrorClass::LimitExceeded,
            Self::Resolver(inner) => inner.class,
        }
    }

    /// Offending column and literal, when the plan failed on key encoding.
    #[must_use]
    pub fn key_encoding(&self) -> Option<&KeyEncodingError> {
        match self {
            Self::KeyEncoding(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResolveError> for PlanError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Encoding(inner) => Self::KeyEncoding(inner),
            ResolveError::Arity { expected, found } => Self::KeyArity { expected, found },
            ResolveError::Internal(inner) => Self::Resolver(inner),
        }
    }
}

impl From<PlanError> for InternalError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::KeyEncoding(inner) => Self::from(inner),
            PlanError::Resolver(inner) => *inner,
            PlanError::KeyArity { .. } => Self::planner_invariant(err.to_string()),
            other => Self::new(other.class(), ErrorOrigin::Planner, other.to_string()),
        }
    }
}
