//! Deterministic data layer and resolver for planner tests.

use crate::{
    data_layer::DataLayer,
    filter::Filter,
    schema::{CqlField, CqlTable, CqlType},
    token::{
        KeyEncodingError, KeyEncodingReason, Partitioner, ResolveError, ResolvedKey, Token,
        TokenResolver,
    },
};
use std::{cell::Cell, collections::BTreeSet};

///
/// FakeResolver
///
/// Joins literals with 0x00 and hashes with FNV-1a into a Murmur3-sized
/// token. Integer columns reject non-numeric literals so encoding failures
/// can be exercised without a real bridge.
///

#[derive(Default)]
pub(crate) struct FakeResolver {
    calls: Cell<usize>,
}

impl FakeResolver {
    pub(crate) fn calls(&self) -> usize {
        self.calls.get()
    }

    pub(crate) fn key_for(values: &[&str]) -> Vec<u8> {
        values.join("\0").into_bytes()
    }

    pub(crate) fn token_for(key: &[u8]) -> Token {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in key {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }

        Token::from(i64::from_ne_bytes(hash.to_ne_bytes()))
    }
}

impl TokenResolver for FakeResolver {
    fn resolve(
        &self,
        table: &CqlTable,
        _partitioner: Partitioner,
        key: &[String],
    ) -> Result<ResolvedKey, ResolveError> {
        self.calls.set(self.calls.get() + 1);

        let columns: Vec<&CqlField> = table.partition_keys().collect();
        if columns.len() != key.len() {
            return Err(ResolveError::Arity {
                expected: columns.len(),
                found: key.len(),
            });
        }
        let mut parts = Vec::with_capacity(key.len());
        for (field, value) in columns.iter().zip(key) {
            // normalize integers so "01" and "1" collide like the real encoding
            let part = if field.cql_type == CqlType::Int {
                value
                    .parse::<i32>()
                    .map_err(|_| {
                        KeyEncodingError::new(
                            field.name.clone(),
                            value.clone(),
                            KeyEncodingReason::InvalidLiteral {
                                cql_type: field.cql_type.to_string(),
                            },
                        )
                    })?
                    .to_string()
            } else {
                value.clone()
            };
            parts.push(part);
        }

        let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
        let key = Self::key_for(&refs);
        let token = Self::token_for(&key);

        Ok(ResolvedKey::new(key, token))
    }
}

///
/// FakeDataLayer
///

pub(crate) struct FakeDataLayer {
    pub(crate) table: CqlTable,
    pub(crate) resolver: FakeResolver,
    pub(crate) partitions: usize,
    /// Columns the row scanner can evaluate arbitrary filters on.
    pub(crate) executor_columns: BTreeSet<String>,
}

impl FakeDataLayer {
    /// `(pk1 text, pk2 text)` partition key, `ck int` clustering key, `v int`.
    pub(crate) fn two_text_keys() -> Self {
        Self::with_table(
            CqlTable::new(
                "ks",
                "tbl",
                vec![
                    CqlField::partition_key("pk1", 0, CqlType::Text),
                    CqlField::partition_key("pk2", 1, CqlType::Text),
                    CqlField::clustering_key("ck", 0, CqlType::Int),
                    CqlField::value("v", 0, CqlType::Int),
                ],
            )
            .expect("valid test table"),
        )
    }

    /// Single `id int` partition key with a text value column.
    pub(crate) fn int_key() -> Self {
        Self::with_table(
            CqlTable::new(
                "ks",
                "users",
                vec![
                    CqlField::partition_key("id", 0, CqlType::Int),
                    CqlField::value("name", 0, CqlType::Text),
                ],
            )
            .expect("valid test table"),
        )
    }

    pub(crate) fn with_table(table: CqlTable) -> Self {
        Self {
            table,
            resolver: FakeResolver::default(),
            partitions: 8,
            executor_columns: BTreeSet::new(),
        }
    }

    pub(crate) fn with_executor_columns(mut self, columns: &[&str]) -> Self {
        self.executor_columns = columns.iter().map(ToString::to_string).collect();
        self
    }
}

impl DataLayer for FakeDataLayer {
    fn table(&self) -> &CqlTable {
        &self.table
    }

    fn partitioner(&self) -> Partitioner {
        Partitioner::Murmur3
    }

    fn resolver(&self) -> &dyn TokenResolver {
        &self.resolver
    }

    fn partition_count(&self) -> usize {
        self.partitions
    }

    fn supports_filter(&self, filter: &Filter) -> bool {
        let references = filter.references();
        !references.is_empty()
            && references
                .iter()
                .all(|column| self.executor_columns.contains(*column))
    }
}
