//! Table schema descriptor consumed by the planner.
//!
//! The planner only needs the ordered partition-key columns and column
//! existence checks; everything else is carried for the executor.

mod types;

pub use types::CqlType;

use crate::error::InternalError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error as ThisError;

///
/// SchemaError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("table {keyspace}.{table} declares no partition key columns")]
    NoPartitionKey { keyspace: String, table: String },

    #[error("duplicate column '{column}' in table {keyspace}.{table}")]
    DuplicateColumn {
        keyspace: String,
        table: String,
        column: String,
    },

    #[error("duplicate {kind} position {position} in table {keyspace}.{table}")]
    DuplicatePosition {
        keyspace: String,
        table: String,
        kind: ColumnKind,
        position: usize,
    },
}

impl From<SchemaError> for InternalError {
    fn from(err: SchemaError) -> Self {
        Self::schema_invalid(err.to_string())
    }
}

///
/// ColumnKind
///

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
    derive_more::Display,
)]
pub enum ColumnKind {
    #[display("partition key")]
    PartitionKey,
    #[display("clustering key")]
    ClusteringKey,
    #[display("static column")]
    Static,
    #[display("value column")]
    Value,
}

///
/// CqlField
///
/// One column of a table. `position` orders columns within their kind, so
/// the partition key `(b, a)` declares `b` at 0 and `a` at 1.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CqlField {
    pub name: String,
    pub kind: ColumnKind,
    pub position: usize,
    pub cql_type: CqlType,
}

impl CqlField {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ColumnKind, position: usize, cql_type: CqlType) -> Self {
        Self {
            name: name.into(),
            kind,
            position,
            cql_type,
        }
    }

    #[must_use]
    pub fn partition_key(name: impl Into<String>, position: usize, cql_type: CqlType) -> Self {
        Self::new(name, ColumnKind::PartitionKey, position, cql_type)
    }

    #[must_use]
    pub fn clustering_key(name: impl Into<String>, position: usize, cql_type: CqlType) -> Self {
        Self::new(name, ColumnKind::ClusteringKey, position, cql_type)
    }

    #[must_use]
    pub fn static_column(name: impl Into<String>, position: usize, cql_type: CqlType) -> Self {
        Self::new(name, ColumnKind::Static, position, cql_type)
    }

    #[must_use]
    pub fn value(name: impl Into<String>, position: usize, cql_type: CqlType) -> Self {
        Self::new(name, ColumnKind::Value, position, cql_type)
    }

    #[must_use]
    pub const fn is_partition_key(&self) -> bool {
        matches!(self.kind, ColumnKind::PartitionKey)
    }
}

///
/// CqlTable
///
/// Fields are held in `SELECT *` order: partition keys, clustering keys,
/// static columns, then value columns, each group by declared position.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CqlTable {
    keyspace: String,
    table: String,
    fields: Vec<CqlField>,
}

impl CqlTable {
    pub fn new(
        keyspace: impl Into<String>,
        table: impl Into<String>,
        mut fields: Vec<CqlField>,
    ) -> Result<Self, SchemaError> {
        let keyspace = keyspace.into();
        let table = table.into();

        let mut names = BTreeSet::new();
        let mut positions = BTreeSet::new();
        for field in &fields {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    keyspace,
                    table,
                    column: field.name.clone(),
                });
            }
            // value columns are unordered in CQL, only keys need distinct slots
            if matches!(field.kind, ColumnKind::PartitionKey | ColumnKind::ClusteringKey)
                && !positions.insert((field.kind, field.position))
            {
                return Err(SchemaError::DuplicatePosition {
                    keyspace,
                    table,
                    kind: field.kind,
                    position: field.position,
                });
            }
        }

        if !fields.iter().any(CqlField::is_partition_key) {
            return Err(SchemaError::NoPartitionKey { keyspace, table });
        }

        fields.sort_by(|left, right| {
            (left.kind, left.position, &left.name).cmp(&(right.kind, right.position, &right.name))
        });

        Ok(Self {
            keyspace,
            table,
            fields,
        })
    }

    #[must_use]
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// All columns in `SELECT *` order.
    #[must_use]
    pub fn columns(&self) -> &[CqlField] {
        &self.fields
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&CqlField> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Partition key columns in declared key order.
    pub fn partition_keys(&self) -> impl Iterator<Item = &CqlField> {
        self.fields.iter().filter(|field| field.is_partition_key())
    }

    #[must_use]
    pub fn partition_key_names(&self) -> Vec<&str> {
        self.partition_keys().map(|field| field.name.as_str()).collect()
    }

    #[must_use]
    pub fn num_partition_keys(&self) -> usize {
        self.partition_keys().count()
    }

    pub fn clustering_keys(&self) -> impl Iterator<Item = &CqlField> {
        self.fields
            .iter()
            .filter(|field| field.kind == ColumnKind::ClusteringKey)
    }

    #[must_use]
    pub fn is_partition_key(&self, name: &str) -> bool {
        self.column(name).is_some_and(CqlField::is_partition_key)
    }
}

///
/// TESTS
///
